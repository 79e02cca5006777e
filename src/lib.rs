//! Composable parser trees for command line arguments.
//!
//! A tree of parsers (flags, key/value options, sub-commands, variadic
//! collectors) is driven over a process argument list. Each parser reports
//! how many tokens it consumed; the traversal engine advances the cursor and
//! restarts the child scan after every match, so earlier-registered parsers
//! always get first refusal at each position.
//!
//! ```no_run
//! use std::sync::Arc;
//! use argtree::{ArgTree, Flag};
//!
//! let verbose = Arc::new(Flag::new().long("verbose").short('v').description("verbose output"));
//! let tree = ArgTree::with_description("usage: demo [flags]").child(verbose.clone());
//! let args: Vec<String> = std::env::args().collect();
//! tree.parse(&args)?;
//! if verbose.value().is_some() {
//!     eprintln!("verbose mode");
//! }
//! # Ok::<(), argtree::ParseError>(())
//! ```
//!
//! Parsers are shared via [`Arc`]: the tree owns one handle, the caller keeps
//! another to read accumulated values after parsing. All per-parser state
//! sits behind a single mutex per instance, and user callbacks are invoked
//! strictly after that lock is released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

mod command;
mod error;
mod flag;
mod help;
mod multi_flag;
mod node;
mod option;
mod tree;
mod value;
mod var_args;

pub use command::Command;
pub use error::ParseError;
pub use flag::{Flag, UnexpectedFlagHandler};
pub use help::{render_table, Help};
pub use multi_flag::MultiFlag;
pub use node::{Children, ParserNode};
pub use option::{DoubleOption, IntOption, OptionParser, StringOption, UnexpectedOptionHandler};
pub use tree::ArgTree;
pub use value::ValueParser;
pub use var_args::{UnexpectedArgHandler, VarArgs};

/// One step of the path from the tree root down to a matching parser.
///
/// The path names the tree nodes (commands and grouped-flag expanders) a
/// match occurred under, so a callback can tell a `--help` parsed under
/// sub-command `foo` apart from one parsed at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A sub-command, identified by its primary name.
    Command(String),
    /// A grouped short-flag expander, identified by its short prefix.
    MultiFlag(char),
}

/// Callback fired when a parser matched, without a typed value.
pub type OnParsed = Arc<dyn Fn(&[PathSegment]) + Send + Sync>;

/// Callback fired with the freshly parsed value and the current parse path.
pub type OnValueParsed<T> = Arc<dyn Fn(&T, &[PathSegment]) + Send + Sync>;

/// Fallible conversion from a raw token to a typed value.
///
/// The second argument is the index of the token being converted.
pub type ValueConverter<T> = Arc<dyn Fn(&str, usize) -> Result<T, ParseError> + Send + Sync>;

/// Action run by a node when it has no further input to parse.
pub type DefaultAction = Arc<dyn Fn() + Send + Sync>;

/// Anything that can try to consume tokens from an argument list.
///
/// `parse` reports the number of tokens consumed starting at `index`;
/// 0 means "no match, try the next sibling". Matching parsers record their
/// value and fire their callback before returning.
pub trait Parser: Send + Sync {
    /// Attempt to consume tokens at `index`.
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError>;

    /// `(argument label, description)` pairs for help rendering.
    ///
    /// Parsers without a description contribute nothing.
    fn descriptions(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Downcast hook used by [`MultiFlag`] to find flag-typed children.
    fn as_flag(&self) -> Option<&Flag> {
        None
    }
}

/// Lock a mutex, recovering the data if a panicking callback poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

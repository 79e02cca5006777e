//! The root of a parser tree.

use std::sync::{Arc, Mutex};

use crate::help::{install_help, HelpSignal, HelpSource, OutStream};
use crate::node::{parse_tree, Children, ParserNode};
use crate::{lock, DefaultAction, ParseError, Parser, PathSegment};

/// Root node driving a parser tree over a process argument list.
///
/// [`ArgTree::parse`] skips the program name at index 0, runs the traversal
/// engine over the children and reports the total number of consumed tokens,
/// program name included. With nothing to parse beyond the program name the
/// tree runs its default action instead; the help conveniences install a
/// print action there, so a bare invocation shows the usage text.
pub struct ArgTree {
    children: Children,
    default_action: Mutex<Option<DefaultAction>>,
    out: OutStream,
    help: HelpSignal,
}

impl ArgTree {
    pub fn new() -> Self {
        Self {
            children: Children::new(),
            default_action: Mutex::new(None),
            out: OutStream::default(),
            help: HelpSignal::default(),
        }
    }

    pub fn with_children(parsers: Vec<Arc<dyn Parser>>) -> Self {
        let tree = Self::new();
        for parser in parsers {
            tree.children.append(parser);
        }
        tree
    }

    /// A tree printing `text` verbatim for `--help`/`-h` and on a bare
    /// invocation.
    pub fn with_help_text(text: impl Into<String>) -> Self {
        let tree = Self::new();
        let action = install_help(
            HelpSource::Text(text.into()),
            &tree.children,
            &tree.out,
            &tree.help,
        );
        *lock(&tree.default_action) = Some(action);
        tree
    }

    /// Like [`ArgTree::with_help_text`], but the body is generated from the
    /// child descriptions below `header` at print time, so parsers added
    /// later still show up.
    pub fn with_description(header: impl Into<String>) -> Self {
        let tree = Self::new();
        let action = install_help(
            HelpSource::Generated(header.into()),
            &tree.children,
            &tree.out,
            &tree.help,
        );
        *lock(&tree.default_action) = Some(action);
        tree
    }

    pub fn child(self, parser: Arc<dyn Parser>) -> Self {
        self.children.append(parser);
        self
    }

    /// Callback fired right after help was printed, e.g. to exit the process.
    pub fn on_help_printed(self, on_printed: impl Fn() + Send + Sync + 'static) -> Self {
        self.help.set_on_printed(Some(Arc::new(on_printed)));
        self
    }

    /// Whether help was printed during the last parse.
    pub fn help_requested(&self) -> bool {
        self.help.requested()
    }

    /// Redirect help output; defaults to stdout.
    pub fn set_write_to_out_stream(&self, write: impl Fn(&str) + Send + Sync + 'static) {
        self.out.set(Arc::new(write));
    }

    /// Parse a full argument list as produced by [`std::env::args`].
    ///
    /// The token at index 0 is taken for the program name and counts as
    /// consumed without being offered to any parser.
    pub fn parse(&self, arguments: &[String]) -> Result<usize, ParseError> {
        if arguments.is_empty() {
            if let Some(action) = self.default_action() {
                action();
            }
            return Ok(0);
        }
        Ok(Parser::parse(self, arguments, 1, &[])? + 1)
    }

    /// Parse the current process's command line.
    pub fn parse_command_line(&self) -> Result<usize, ParseError> {
        let arguments: Vec<String> = std::env::args().collect();
        self.parse(&arguments)
    }
}

impl Default for ArgTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for ArgTree {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        if index >= arguments.len() {
            tracing::debug!(index, "nothing to parse, running default action");
            if let Some(action) = self.default_action() {
                action();
            }
            return Ok(0);
        }
        parse_tree(arguments, index, path, &self.children.snapshot())
    }
}

impl ParserNode for ArgTree {
    fn children(&self) -> &Children {
        &self.children
    }

    fn default_action(&self) -> Option<DefaultAction> {
        lock(&self.default_action).clone()
    }

    fn set_default_action(&self, action: Option<DefaultAction>) {
        *lock(&self.default_action) = action;
    }
}

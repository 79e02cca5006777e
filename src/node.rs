//! Tree nodes: the ordered child container and the traversal engine.

use std::ops::Range;
use std::sync::{Arc, Mutex, Weak};

use crate::{lock, DefaultAction, ParseError, Parser, PathSegment};

/// Ordered, shared list of child parsers.
///
/// Insertion order determines match priority. The container is cheaply
/// clonable; all clones refer to the same list. Index arguments follow the
/// usual `Vec` semantics: an out-of-range index is a programming error and
/// panics rather than producing a parse error.
#[derive(Clone, Default)]
pub struct Children {
    inner: Arc<Mutex<Vec<Arc<dyn Parser>>>>,
}

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, parser: Arc<dyn Parser>) {
        lock(&self.inner).push(parser);
    }

    pub fn insert(&self, index: usize, parser: Arc<dyn Parser>) {
        lock(&self.inner).insert(index, parser);
    }

    pub fn insert_all(&self, index: usize, parsers: Vec<Arc<dyn Parser>>) {
        let mut children = lock(&self.inner);
        for (offset, parser) in parsers.into_iter().enumerate() {
            children.insert(index + offset, parser);
        }
    }

    pub fn remove(&self, index: usize) -> Arc<dyn Parser> {
        lock(&self.inner).remove(index)
    }

    pub fn remove_range(&self, range: Range<usize>) {
        lock(&self.inner).drain(range);
    }

    pub fn remove_first(&self) -> Arc<dyn Parser> {
        lock(&self.inner).remove(0)
    }

    pub fn remove_first_n(&self, n: usize) {
        lock(&self.inner).drain(..n);
    }

    pub fn remove_all(&self) {
        lock(&self.inner).clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).is_empty()
    }

    /// Copy of the current child list, used to walk the tree without
    /// holding the lock across child `parse` calls.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Parser>> {
        lock(&self.inner).clone()
    }

    /// Flattened help entries of all children, in child order.
    pub(crate) fn descriptions(&self) -> Vec<(String, String)> {
        self.snapshot()
            .iter()
            .flat_map(|child| child.descriptions())
            .collect()
    }

    pub(crate) fn downgrade(&self) -> WeakChildren {
        WeakChildren {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Weak handle onto a child list, held by generated help actions so a help
/// closure stored inside the list does not keep the list alive.
pub(crate) struct WeakChildren {
    inner: Weak<Mutex<Vec<Arc<dyn Parser>>>>,
}

impl WeakChildren {
    pub(crate) fn upgrade(&self) -> Option<Children> {
        self.inner.upgrade().map(|inner| Children { inner })
    }
}

/// A non-leaf parser: owns an ordered child list and an optional default
/// action, run when the node had no further tokens to hand to its children.
pub trait ParserNode: Parser {
    /// The node's child parsers, in match-priority order.
    fn children(&self) -> &Children;

    /// Current default action, if any.
    fn default_action(&self) -> Option<DefaultAction>;

    /// Replace the default action. `None` disables it.
    fn set_default_action(&self, action: Option<DefaultAction>);
}

/// The traversal engine shared by the root tree and command nodes.
///
/// At each cursor position children are tried in registration order; the
/// first child reporting nonzero consumption advances the cursor by that
/// amount and the scan restarts from the first child. Tokens claimed by no
/// child are skipped silently; registering an unexpected-token handler among
/// the children turns that branch into an error instead.
pub(crate) fn parse_tree(
    arguments: &[String],
    index: usize,
    path: &[PathSegment],
    children: &[Arc<dyn Parser>],
) -> Result<usize, ParseError> {
    tracing::debug!(?path, index, "walking parser tree");
    let mut i = index;
    let mut total = 0;
    'tokens: while i < arguments.len() {
        tracing::debug!(token = %arguments[i], index = i, "trying children");
        for child in children {
            let consumed = child.parse(arguments, i, path)?;
            if consumed > 0 {
                tracing::debug!(consumed, index = i, "child claimed tokens");
                i += consumed;
                total += consumed;
                continue 'tokens;
            }
        }
        // No child claimed the token; skip it.
        i += 1;
    }
    Ok(total)
}

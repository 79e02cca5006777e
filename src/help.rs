//! Generated help: the `--help`/`-h` flag and the usage table renderer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::node::{Children, WeakChildren};
use crate::{lock, DefaultAction, Flag, ParseError, Parser, PathSegment};

/// A `--help`/`-h` flag with a canned description.
///
/// The root tree conveniences and [`crate::Command::generated_help`] insert
/// one of these as the first child, wired to the node's print action.
pub struct Help {
    inner: Flag,
}

impl Help {
    pub fn new() -> Self {
        Self {
            inner: Flag::new()
                .long("help")
                .short('h')
                .description("print this help"),
        }
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.inner = self.inner.long(name);
        self
    }

    pub fn short(mut self, name: char) -> Self {
        self.inner = self.inner.short(name);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.inner = self.inner.description(text);
        self
    }

    pub fn on_parsed(mut self, on_parsed: impl Fn(&[PathSegment]) + Send + Sync + 'static) -> Self {
        self.inner = self.inner.on_parsed(on_parsed);
        self
    }

    pub fn values(&self) -> Vec<bool> {
        self.inner.values()
    }

    pub fn clear_values(&self) {
        self.inner.clear_values()
    }
}

impl Default for Help {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Help {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        self.inner.parse(arguments, index, path)
    }

    fn descriptions(&self) -> Vec<(String, String)> {
        self.inner.descriptions()
    }

    fn as_flag(&self) -> Option<&Flag> {
        Some(&self.inner)
    }
}

/// Where a node's help text comes from.
pub(crate) enum HelpSource {
    /// Verbatim text.
    Text(String),
    /// Header plus a table generated from descendant descriptions at the
    /// moment help is printed, so later child mutations are reflected.
    Generated(String),
}

/// Signal recording that help was printed, replacing the original's
/// unconditional process exit: the host observes the signal (or registers a
/// callback) and decides whether to exit.
#[derive(Clone, Default)]
pub(crate) struct HelpSignal {
    requested: Arc<AtomicBool>,
    on_printed: Arc<Mutex<Option<DefaultAction>>>,
}

impl HelpSignal {
    pub(crate) fn requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub(crate) fn set_on_printed(&self, on_printed: Option<DefaultAction>) {
        *lock(&self.on_printed) = on_printed;
    }

    fn fire(&self) {
        self.requested.store(true, Ordering::SeqCst);
        let on_printed = lock(&self.on_printed).clone();
        if let Some(on_printed) = on_printed {
            on_printed();
        }
    }
}

/// Delegate the tree writes help output through; defaults to stdout.
#[derive(Clone)]
pub(crate) struct OutStream {
    write: Arc<Mutex<Arc<dyn Fn(&str) + Send + Sync>>>,
}

impl OutStream {
    pub(crate) fn set(&self, write: Arc<dyn Fn(&str) + Send + Sync>) {
        *lock(&self.write) = write;
    }

    pub(crate) fn write(&self, text: &str) {
        let write = lock(&self.write).clone();
        write(text);
    }
}

impl Default for OutStream {
    fn default() -> Self {
        Self {
            write: Arc::new(Mutex::new(Arc::new(|text: &str| println!("{text}")))),
        }
    }
}

/// Build the print action shared by a node's generated help flag and its
/// default action.
///
/// Holds only a weak handle onto the child list: the action is itself stored
/// inside that list (via the help flag), and a strong handle would leak the
/// whole node.
pub(crate) fn help_action(
    source: HelpSource,
    children: &Children,
    out: &OutStream,
    signal: &HelpSignal,
) -> DefaultAction {
    let children: WeakChildren = children.downgrade();
    let out = out.clone();
    let signal = signal.clone();
    Arc::new(move || {
        let text = match &source {
            HelpSource::Text(text) => text.clone(),
            HelpSource::Generated(header) => {
                let mut rows = Vec::new();
                if let Some(children) = children.upgrade() {
                    for (argument, description) in children.descriptions() {
                        rows.push(vec!["   ".to_string(), argument, description]);
                    }
                }
                format!("{}\n{}", header, render_table(&rows))
            }
        };
        out.write(&text);
        signal.fire();
    })
}

/// Insert a generated help flag as the node's first child and install the
/// same print action as the node's default action.
pub(crate) fn install_help(
    source: HelpSource,
    children: &Children,
    out: &OutStream,
    signal: &HelpSignal,
) -> DefaultAction {
    let action = help_action(source, children, out, signal);
    let on_parsed = {
        let action = action.clone();
        move |_: &[PathSegment]| action()
    };
    children.insert(0, Arc::new(Help::new().on_parsed(on_parsed)));
    action
}

/// Render rows as a column-aligned text table.
///
/// Cells may span multiple lines; continuation lines are placed in aligned
/// extra rows. Columns are padded with spaces to the widest line in the
/// column, except the last column, which is never right-padded.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let col_count = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; col_count];
    let mut row_lines = vec![0usize; rows.len()];
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            for line in cell.lines() {
                widths[j] = widths[j].max(line.chars().count());
            }
            row_lines[i] = row_lines[i].max(cell.lines().count());
        }
    }
    if let Some(last) = widths.last_mut() {
        *last = 0;
    }

    let mut expanded: Vec<Vec<String>> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let base = expanded.len();
        expanded.extend(std::iter::repeat_with(|| vec![String::new(); col_count]).take(row_lines[i]));
        for (j, cell) in row.iter().enumerate() {
            for (k, line) in cell.lines().enumerate() {
                expanded[base + k][j] = line.to_string();
            }
        }
    }

    expanded
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, cell)| {
                    let len = cell.chars().count();
                    if len < widths[j] {
                        format!("{}{}", cell, " ".repeat(widths[j] - len))
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::render_table;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn columns_are_aligned() {
        let table = render_table(&rows(&[
            &["   ", "--help, -h", "print this help"],
            &["   ", "-x", "foo"],
        ]));
        assert_eq!(
            table,
            "    --help, -h print this help\n    -x         foo"
        );
    }

    #[test]
    fn last_column_is_not_padded() {
        let table = render_table(&rows(&[&["a", "b"], &["aa", "long text"]]));
        assert_eq!(table, "a  b\naa long text");
    }

    #[test]
    fn multiline_cells_occupy_aligned_rows() {
        let table = render_table(&rows(&[
            &["   ", "--bar, -b", "bar is a nice flag\nbaz also"],
            &["   ", "-x", "x"],
        ]));
        assert_eq!(
            table,
            "    --bar, -b bar is a nice flag\n              baz also\n    -x        x"
        );
    }

    #[test]
    fn empty_input_renders_empty_table() {
        assert_eq!(render_table(&[]), "");
    }
}

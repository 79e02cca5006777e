//! Sub-commands: named tree nodes that parse their own child parsers.

use std::sync::{Arc, Mutex};

use crate::help::{install_help, HelpSignal, HelpSource, OutStream};
use crate::node::{parse_tree, Children, ParserNode};
use crate::{lock, DefaultAction, OnParsed, ParseError, Parser, PathSegment, ValueParser};

/// A sub-command with its own subtree of parsers.
///
/// Matching the command name hands the remaining tokens to the command's
/// children; the engine restarts under the command until its children stop
/// consuming. A command may appear only once per parse. Repeats reaching the
/// same tree level raise [`ParseError::CommandAllowedOnlyOnce`]; a repeat
/// swallowed by the command's own subtree (say, a [`crate::VarArgs`] child)
/// is an ordinary value instead.
pub struct Command {
    name: String,
    inner: ValueParser<bool>,
    children: Children,
    default_action: Mutex<Option<DefaultAction>>,
    after_children_parsed: Mutex<Option<OnParsed>>,
    out: OutStream,
    help: HelpSignal,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let inner = ValueParser::new(vec![name.clone()], None);
        inner.set_converter(Some(Arc::new(|_, _| Ok(true))));
        Self {
            name,
            inner,
            children: Children::new(),
            default_action: Mutex::new(None),
            after_children_parsed: Mutex::new(None),
            out: OutStream::default(),
            help: HelpSignal::default(),
        }
    }

    /// Register an additional name the command answers to.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.inner.push_alias(alias.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.inner.set_description(Some(text.into()));
        self
    }

    pub fn stop_token(self, token: impl Into<String>) -> Self {
        self.inner.set_stop_token(Some(token.into()));
        self
    }

    pub fn no_stop_token(self) -> Self {
        self.inner.set_stop_token(None);
        self
    }

    /// Callback fired when the command name matched, before its children run.
    pub fn on_parsed(self, on_parsed: impl Fn(&[PathSegment]) + Send + Sync + 'static) -> Self {
        self.inner
            .set_on_parsed(Some(Arc::new(move |_: &bool, path| on_parsed(path))));
        self
    }

    /// Callback fired after the command's children finished parsing.
    pub fn on_children_parsed(
        self,
        on_parsed: impl Fn(&[PathSegment]) + Send + Sync + 'static,
    ) -> Self {
        *lock(&self.after_children_parsed) = Some(Arc::new(on_parsed));
        self
    }

    /// Action run when the command matched but its children consumed nothing.
    pub fn default_action(self, action: impl Fn() + Send + Sync + 'static) -> Self {
        *lock(&self.default_action) = Some(Arc::new(action));
        self
    }

    pub fn child(self, parser: Arc<dyn Parser>) -> Self {
        self.children.append(parser);
        self
    }

    /// Print `text` verbatim for `--help`/`-h` under this command, and when
    /// the command is given without further arguments.
    pub fn help_text(self, text: impl Into<String>) -> Self {
        let action = install_help(
            HelpSource::Text(text.into()),
            &self.children,
            &self.out,
            &self.help,
        );
        *lock(&self.default_action) = Some(action);
        self
    }

    /// Like [`Command::help_text`], but the body is generated from the child
    /// descriptions below `header` at print time.
    pub fn generated_help(self, header: impl Into<String>) -> Self {
        let action = install_help(
            HelpSource::Generated(header.into()),
            &self.children,
            &self.out,
            &self.help,
        );
        *lock(&self.default_action) = Some(action);
        self
    }

    /// Redirect help output; defaults to stdout.
    pub fn set_write_to_out_stream(&self, write: impl Fn(&str) + Send + Sync + 'static) {
        self.out.set(Arc::new(write));
    }

    /// Whether help was printed during the last parse.
    pub fn help_requested(&self) -> bool {
        self.help.requested()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        self.inner.aliases()
    }

    /// One `true` per time the command name matched.
    pub fn values(&self) -> Vec<bool> {
        self.inner.values()
    }

    pub fn value(&self) -> Option<bool> {
        self.inner.value()
    }

    pub fn clear_values(&self) {
        self.inner.clear_values()
    }
}

impl Parser for Command {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let consumed = self.inner.parse(arguments, index, path)?;
        if consumed == 0 {
            return Ok(0);
        }
        if self.inner.values_len() > 1 {
            tracing::debug!(command = %self.name, index, "repeated command");
            return Err(ParseError::CommandAllowedOnlyOnce {
                command: self.name.clone(),
                index,
            });
        }

        let mut child_path = path.to_vec();
        child_path.push(PathSegment::Command(self.name.clone()));
        let consumed_by_children = parse_tree(
            arguments,
            index + consumed,
            &child_path,
            &self.children.snapshot(),
        )?;

        let after_children_parsed = lock(&self.after_children_parsed).clone();
        if let Some(after_children_parsed) = after_children_parsed {
            after_children_parsed(&child_path);
        }
        if consumed_by_children == 0 {
            let action = lock(&self.default_action).clone();
            if let Some(action) = action {
                action();
            }
        }
        Ok(consumed + consumed_by_children)
    }

    fn descriptions(&self) -> Vec<(String, String)> {
        self.inner.descriptions()
    }
}

impl ParserNode for Command {
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

//! The base parsing primitive shared by flags, options and commands.

use std::sync::Mutex;

use crate::{lock, OnValueParsed, ParseError, Parser, PathSegment, ValueConverter};

/// Single-token parser holding accumulated typed values.
///
/// Matches any of its aliases exactly, converts the matched token through the
/// configured converter, appends the result to `values` and fires the
/// `on_parsed` callback. Specializations ([`crate::Flag`],
/// [`crate::OptionParser`], [`crate::Command`]) embed a `ValueParser` and
/// layer their own matching rules and guards on top.
///
/// All mutable state lives behind one mutex per instance; callbacks and
/// converters always run after the lock is released, so they may freely
/// inspect or mutate this or sibling parsers.
pub struct ValueParser<T> {
    aliases: Vec<String>,
    description: Option<String>,
    state: Mutex<State<T>>,
}

struct State<T> {
    values: Vec<T>,
    stop_token: Option<String>,
    converter: Option<ValueConverter<T>>,
    on_parsed: Option<OnValueParsed<T>>,
}

impl<T> ValueParser<T> {
    /// Create a parser matching `aliases`, with the default `--` stop token
    /// and no converter (matching tokens are consumed but not recorded).
    pub fn new(aliases: Vec<String>, description: Option<String>) -> Self {
        Self {
            aliases,
            description,
            state: Mutex::new(State {
                values: Vec::new(),
                stop_token: Some("--".to_string()),
                converter: None,
                on_parsed: None,
            }),
        }
    }

    /// Alias strings this parser matches, in priority order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub(crate) fn set_aliases(&mut self, aliases: Vec<String>) {
        self.aliases = aliases;
    }

    pub(crate) fn push_alias(&mut self, alias: String) {
        self.aliases.push(alias);
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Token that halts this parser's own matching, `--` by default.
    pub fn stop_token(&self) -> Option<String> {
        lock(&self.state).stop_token.clone()
    }

    pub fn set_stop_token(&self, token: Option<String>) {
        lock(&self.state).stop_token = token;
    }

    pub(crate) fn is_stop_token(&self, arg: &str) -> bool {
        lock(&self.state).stop_token.as_deref() == Some(arg)
    }

    pub fn set_converter(&self, converter: Option<ValueConverter<T>>) {
        lock(&self.state).converter = converter;
    }

    pub fn set_on_parsed(&self, on_parsed: Option<OnValueParsed<T>>) {
        lock(&self.state).on_parsed = on_parsed;
    }

    /// Number of successful matches recorded so far.
    pub fn values_len(&self) -> usize {
        lock(&self.state).values.len()
    }

    /// Drop all accumulated values, e.g. to reuse the tree for a new parse.
    pub fn clear_values(&self) {
        lock(&self.state).values.clear();
    }
}

impl<T: Clone> ValueParser<T> {
    /// Snapshot of the accumulated values, one per successful match.
    pub fn values(&self) -> Vec<T> {
        lock(&self.state).values.clone()
    }

    /// The parsed value if exactly one was recorded, `None` otherwise.
    pub fn value(&self) -> Option<T> {
        let state = lock(&self.state);
        if state.values.len() == 1 {
            state.values.first().cloned()
        } else {
            None
        }
    }

    /// Convert `raw` at `index`, record the result and fire the callback.
    ///
    /// Without a converter this is a no-op; the match still counts as
    /// consumed by the caller. The lock is dropped before the converter and
    /// again before the callback run.
    pub(crate) fn convert_and_record(
        &self,
        raw: &str,
        index: usize,
        path: &[PathSegment],
    ) -> Result<(), ParseError> {
        let converter = lock(&self.state).converter.clone();
        let Some(converter) = converter else {
            return Ok(());
        };
        let value = converter(raw, index)?;
        let on_parsed = {
            let mut state = lock(&self.state);
            state.values.push(value.clone());
            state.on_parsed.clone()
        };
        if let Some(on_parsed) = on_parsed {
            on_parsed(&value, path);
        }
        Ok(())
    }
}

impl<T: Clone + Send + 'static> Parser for ValueParser<T> {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let arg = &arguments[index];
        if self.is_stop_token(arg) {
            tracing::debug!(token = %arg, "hit stop token");
            return Ok(0);
        }
        for alias in &self.aliases {
            if arg == alias {
                tracing::debug!(alias = %alias, index, "alias matched");
                self.convert_and_record(arg, index, path)?;
                return Ok(1);
            }
        }
        Ok(0)
    }

    fn descriptions(&self) -> Vec<(String, String)> {
        match &self.description {
            Some(description) => vec![(self.aliases.join(", "), description.clone())],
            None => Vec::new(),
        }
    }
}

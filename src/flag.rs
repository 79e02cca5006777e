//! Boolean flags such as `-v` or `--verbose`.

use std::sync::Arc;

use crate::{ParseError, Parser, PathSegment, ValueParser};

/// A boolean flag keyed by long/short name aliases.
///
/// Aliases are derived from `long_prefix + long_name` (default `--`) and
/// `short_prefix + short_name` (default `-`). Parsing a flag a second time is
/// an error unless `multi_allowed` is set.
pub struct Flag {
    inner: ValueParser<bool>,
    long_name: Option<String>,
    short_name: Option<char>,
    long_prefix: String,
    short_prefix: char,
    multi_allowed: bool,
}

impl Flag {
    pub fn new() -> Self {
        let inner = ValueParser::new(Vec::new(), None);
        inner.set_converter(Some(Arc::new(|_, _| Ok(true))));
        Self {
            inner,
            long_name: None,
            short_name: None,
            long_prefix: "--".to_string(),
            short_prefix: '-',
            multi_allowed: false,
        }
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long_name = Some(name.into());
        self.rebuild_aliases();
        self
    }

    pub fn short(mut self, name: char) -> Self {
        self.short_name = Some(name);
        self.rebuild_aliases();
        self
    }

    pub fn long_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.long_prefix = prefix.into();
        self.rebuild_aliases();
        self
    }

    pub fn short_prefix(mut self, prefix: char) -> Self {
        self.short_prefix = prefix;
        self.rebuild_aliases();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.inner.set_description(Some(text.into()));
        self
    }

    /// Allow the flag to be passed more than once.
    pub fn multi_allowed(mut self, allowed: bool) -> Self {
        self.multi_allowed = allowed;
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

    /// Callback fired once per match with the current parse path.
    pub fn on_parsed(self, on_parsed: impl Fn(&[PathSegment]) + Send + Sync + 'static) -> Self {
        self.inner
            .set_on_parsed(Some(Arc::new(move |_: &bool, path| on_parsed(path))));
        self
    }

    fn rebuild_aliases(&mut self) {
        let mut aliases = Vec::new();
        if let Some(long_name) = &self.long_name {
            aliases.push(format!("{}{}", self.long_prefix, long_name));
        }
        if let Some(short_name) = self.short_name {
            aliases.push(format!("{}{}", self.short_prefix, short_name));
        }
        self.inner.set_aliases(aliases);
    }

    pub fn aliases(&self) -> &[String] {
        self.inner.aliases()
    }

    /// One `true` per successful match.
    pub fn values(&self) -> Vec<bool> {
        self.inner.values()
    }

    /// `Some(true)` if the flag matched exactly once.
    pub fn value(&self) -> Option<bool> {
        self.inner.value()
    }

    pub fn clear_values(&self) {
        self.inner.clear_values()
    }

    pub fn set_stop_token(&self, token: Option<String>) {
        self.inner.set_stop_token(token)
    }

    pub(crate) fn display_name(&self) -> String {
        self.inner.aliases().join(", ")
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Flag {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let consumed = self.inner.parse(arguments, index, path)?;
        if !self.multi_allowed && self.inner.values_len() > 1 {
            return Err(ParseError::FlagAllowedOnlyOnce {
                flag: self.display_name(),
                index,
            });
        }
        Ok(consumed)
    }

    fn descriptions(&self) -> Vec<(String, String)> {
        self.inner.descriptions()
    }

    fn as_flag(&self) -> Option<&Flag> {
        Some(self)
    }
}

/// Turns any token carrying a flag prefix into an [`ParseError::UnexpectedFlag`].
///
/// Registered after the expected flags, this converts the engine's silent
/// skip of unmatched `-x`/`--xx` tokens into a hard error. Tokens after the
/// stop token are left for a variadic collector.
pub struct UnexpectedFlagHandler {
    long_prefix: Option<String>,
    short_prefix: Option<String>,
    stop_token: Option<String>,
}

impl UnexpectedFlagHandler {
    pub fn new() -> Self {
        Self {
            long_prefix: Some("--".to_string()),
            short_prefix: Some("-".to_string()),
            stop_token: Some("--".to_string()),
        }
    }

    pub fn long_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.long_prefix = Some(prefix.into());
        self
    }

    pub fn short_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.short_prefix = Some(prefix.into());
        self
    }

    pub fn stop_token(mut self, token: impl Into<String>) -> Self {
        self.stop_token = Some(token.into());
        self
    }
}

impl Default for UnexpectedFlagHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for UnexpectedFlagHandler {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        _path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let arg = &arguments[index];
        if self.stop_token.as_deref() == Some(arg.as_str()) {
            return Ok(0);
        }
        let prefixed = |prefix: &Option<String>| {
            prefix
                .as_deref()
                .is_some_and(|prefix| arg.starts_with(prefix))
        };
        if prefixed(&self.long_prefix) || prefixed(&self.short_prefix) {
            tracing::debug!(token = %arg, index, "unexpected flag");
            return Err(ParseError::UnexpectedFlag {
                flag: arg.clone(),
                index,
            });
        }
        Ok(0)
    }
}

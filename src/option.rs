//! Key/value options: `--key value` and `--key=value`.

use std::sync::Arc;

use crate::{OnValueParsed, ParseError, Parser, PathSegment, ValueConverter, ValueParser};

/// A key/value option producing typed values.
///
/// Two syntaxes per alias, tried in registration order:
/// an exact alias consumes the *following* token as the value (2 tokens),
/// `alias=value` carries the value in the same token (1 token). A second
/// match is an error unless `multi_allowed` is set.
///
/// Use [`StringOption`], [`IntOption`] or [`DoubleOption`] for the built-in
/// value types, or [`OptionParser::with_converter`] for custom conversions.
pub struct OptionParser<T> {
    inner: ValueParser<T>,
    long_name: Option<String>,
    short_name: Option<char>,
    long_prefix: String,
    short_prefix: char,
    multi_allowed: bool,
}

/// Option over raw string values.
pub type StringOption = OptionParser<String>;
/// Option over integer values; non-numeric input raises
/// [`ParseError::ValueNotIntConvertible`].
pub type IntOption = OptionParser<i64>;
/// Option over floating point values; non-numeric input raises
/// [`ParseError::ValueNotDoubleConvertible`].
pub type DoubleOption = OptionParser<f64>;

impl<T: Clone + Send + 'static> OptionParser<T> {
    /// Create an option with a custom value converter.
    pub fn with_converter(converter: ValueConverter<T>) -> Self {
        let inner = ValueParser::new(Vec::new(), None);
        inner.set_converter(Some(converter));
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

    /// Allow the option to be passed more than once.
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

    /// Callback fired once per match with the parsed value and parse path.
    pub fn on_parsed(self, on_parsed: impl Fn(&T, &[PathSegment]) + Send + Sync + 'static) -> Self {
        self.inner.set_on_parsed(Some(Arc::new(on_parsed)));
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

    /// Snapshot of the accumulated values, one per successful match.
    pub fn values(&self) -> Vec<T> {
        self.inner.values()
    }

    /// The parsed value if exactly one was recorded, `None` otherwise.
    pub fn value(&self) -> Option<T> {
        self.inner.value()
    }

    pub fn clear_values(&self) {
        self.inner.clear_values()
    }

    pub fn set_converter(&self, converter: Option<ValueConverter<T>>) {
        self.inner.set_converter(converter)
    }

    pub fn set_stop_token(&self, token: Option<String>) {
        self.inner.set_stop_token(token)
    }

    fn display_name(&self) -> String {
        self.inner.aliases().join(", ")
    }

    fn check_multi(&self, index: usize) -> Result<(), ParseError> {
        if !self.multi_allowed && self.inner.values_len() > 0 {
            tracing::debug!(option = %self.display_name(), index, "repeated non-multi option");
            return Err(ParseError::OptionAllowedOnlyOnce {
                option: self.display_name(),
                index,
            });
        }
        Ok(())
    }

    fn record(&self, raw: &str, index: usize, path: &[PathSegment]) -> Result<(), ParseError> {
        self.inner
            .convert_and_record(raw, index, path)
            .map_err(|e| e.with_option_name(&self.display_name()))
    }
}

impl OptionParser<String> {
    /// String-valued option; the raw token is the value.
    pub fn new() -> Self {
        Self::with_converter(Arc::new(|raw, _| Ok(raw.to_string())))
    }
}

impl Default for OptionParser<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionParser<i64> {
    pub fn new() -> Self {
        Self::with_converter(Arc::new(|raw, index| {
            raw.parse::<i64>()
                .map_err(|_| ParseError::ValueNotIntConvertible {
                    option: String::new(),
                    index,
                    value: raw.to_string(),
                })
        }))
    }
}

impl Default for OptionParser<i64> {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionParser<f64> {
    pub fn new() -> Self {
        Self::with_converter(Arc::new(|raw, index| {
            raw.parse::<f64>()
                .map_err(|_| ParseError::ValueNotDoubleConvertible {
                    option: String::new(),
                    index,
                    value: raw.to_string(),
                })
        }))
    }
}

impl Default for OptionParser<f64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Parser for OptionParser<T> {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let arg = &arguments[index];
        if self.inner.is_stop_token(arg) {
            tracing::debug!(token = %arg, "hit stop token");
            return Ok(0);
        }
        for alias in self.inner.aliases() {
            if arg == alias {
                self.check_multi(index)?;
                if index + 1 >= arguments.len() {
                    tracing::debug!(key = %arg, index, "no value token follows option key");
                    return Err(ParseError::MissingValueForOption {
                        option: self.display_name(),
                        index,
                        key: arg.clone(),
                    });
                }
                self.record(&arguments[index + 1], index + 1, path)?;
                return Ok(2);
            }
            if let Some(value) = arg
                .strip_prefix(alias.as_str())
                .and_then(|rest| rest.strip_prefix('='))
            {
                self.check_multi(index)?;
                self.record(value, index, path)?;
                return Ok(1);
            }
        }
        Ok(0)
    }

    fn descriptions(&self) -> Vec<(String, String)> {
        self.inner.descriptions()
    }
}

/// Turns any token carrying an option prefix into an
/// [`ParseError::UnexpectedOption`]; see [`crate::UnexpectedFlagHandler`]
/// for the matching flag variant.
pub struct UnexpectedOptionHandler {
    long_prefix: Option<String>,
    short_prefix: Option<String>,
    stop_token: Option<String>,
}

impl UnexpectedOptionHandler {
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

impl Default for UnexpectedOptionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for UnexpectedOptionHandler {
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
            tracing::debug!(token = %arg, index, "unexpected option");
            return Err(ParseError::UnexpectedOption {
                option: arg.clone(),
                index,
            });
        }
        Ok(0)
    }
}

//! Variadic argument collectors and the unexpected-argument handler.

use std::sync::Mutex;

use crate::{lock, ParseError, Parser, PathSegment};

/// Collects every token it is offered.
///
/// Registered last, it claims whatever the preceding siblings refused. On its
/// stop token (`--` by default) it claims the token and the entire remaining
/// tail in one step, so tokens after the stop token bypass all other parsers.
pub struct VarArgs {
    values: Mutex<Vec<String>>,
    stop_token: Mutex<Option<String>>,
}

impl VarArgs {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
            stop_token: Mutex::new(Some("--".to_string())),
        }
    }

    pub fn stop_token(self, token: impl Into<String>) -> Self {
        *lock(&self.stop_token) = Some(token.into());
        self
    }

    pub fn no_stop_token(self) -> Self {
        *lock(&self.stop_token) = None;
        self
    }

    pub fn set_stop_token(&self, token: Option<String>) {
        *lock(&self.stop_token) = token;
    }

    /// Snapshot of the collected tokens, in input order. The stop token
    /// itself is not collected.
    pub fn values(&self) -> Vec<String> {
        lock(&self.values).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.values).is_empty()
    }

    pub fn clear_values(&self) {
        lock(&self.values).clear();
    }
}

impl Default for VarArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for VarArgs {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        _path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let arg = &arguments[index];
        if lock(&self.stop_token).as_deref() == Some(arg.as_str()) {
            tracing::debug!(token = %arg, index, "collecting tail after stop token");
            lock(&self.values).extend(arguments[index + 1..].iter().cloned());
            return Ok(arguments.len() - index);
        }
        lock(&self.values).push(arg.clone());
        Ok(1)
    }
}

/// Turns any token that reaches it into an [`ParseError::UnexpectedArg`].
///
/// Registered after the expected parsers, this converts the engine's silent
/// skip of unclaimed plain tokens into a hard error. The stop token is let
/// through so a variadic collector later in the list can take the tail.
pub struct UnexpectedArgHandler {
    stop_token: Option<String>,
}

impl UnexpectedArgHandler {
    pub fn new() -> Self {
        Self {
            stop_token: Some("--".to_string()),
        }
    }

    pub fn stop_token(mut self, token: impl Into<String>) -> Self {
        self.stop_token = Some(token.into());
        self
    }
}

impl Default for UnexpectedArgHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for UnexpectedArgHandler {
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
        tracing::debug!(token = %arg, index, "unexpected argument");
        Err(ParseError::UnexpectedArg {
            argument: arg.clone(),
            index,
        })
    }
}

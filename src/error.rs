//! Typed parse errors.
//!
//! Every variant carries the index of the token that triggered it, so callers
//! can point the user at the exact argument. Errors abort the in-progress
//! parse; values accumulated before the failure are kept (no rollback).

use thiserror::Error;

/// Errors raised while walking a parser tree over an argument list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A command matched a second time at the same tree level.
    #[error("command '{command}' is allowed only once (argument {index})")]
    CommandAllowedOnlyOnce { command: String, index: usize },

    /// A flag without `multi_allowed` matched a second time.
    #[error("flag '{flag}' is allowed only once (argument {index})")]
    FlagAllowedOnlyOnce { flag: String, index: usize },

    /// An option without `multi_allowed` matched a second time.
    #[error("option '{option}' is allowed only once (argument {index})")]
    OptionAllowedOnlyOnce { option: String, index: usize },

    /// An option key was the last token, so no value could follow it.
    #[error("missing value for option '{key}' (argument {index})")]
    MissingValueForOption {
        option: String,
        index: usize,
        key: String,
    },

    /// An option value could not be parsed as an integer.
    #[error("value '{value}' for option '{option}' is not an integer (argument {index})")]
    ValueNotIntConvertible {
        option: String,
        index: usize,
        value: String,
    },

    /// An option value could not be parsed as a floating point number.
    #[error("value '{value}' for option '{option}' is not a number (argument {index})")]
    ValueNotDoubleConvertible {
        option: String,
        index: usize,
        value: String,
    },

    /// A token looked like a flag but no parser claimed it.
    #[error("unexpected flag '{flag}' (argument {index})")]
    UnexpectedFlag { flag: String, index: usize },

    /// A token looked like an option but no parser claimed it.
    #[error("unexpected option '{option}' (argument {index})")]
    UnexpectedOption { option: String, index: usize },

    /// A plain token reached an unexpected-argument handler.
    #[error("unexpected argument '{argument}' (argument {index})")]
    UnexpectedArg { argument: String, index: usize },
}

impl ParseError {
    /// Fill in the owning option's name on conversion errors.
    ///
    /// Value converters run without knowledge of which option invoked them,
    /// so the numeric converters leave `option` empty and the match site
    /// completes it.
    pub(crate) fn with_option_name(mut self, name: &str) -> Self {
        match &mut self {
            Self::ValueNotIntConvertible { option, .. }
            | Self::ValueNotDoubleConvertible { option, .. }
                if option.is_empty() =>
            {
                *option = name.to_string();
            }
            _ => {}
        }
        self
    }
}

use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned while loading or validating configuration.
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("invalid value for {var}: '{value}': {source}")]
    IntParseError {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parse error.
        source: ParseIntError,
    },

    /// A value parsed but is outside the accepted range.
    #[error("invalid value for {var}: '{value}': {reason}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A required setting is missing.
    #[error("missing required setting: {var}")]
    MissingRequired {
        /// Variable name.
        var: &'static str,
    },
}

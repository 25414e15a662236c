use thiserror::Error;

/// Errors raised while reading instrumentation settings.
///
/// Settings resolved from the environment never fail the caller; these
/// errors are reported through internal logging and the default is used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The value is not a recognised boolean.
    #[error("invalid boolean {value:?} for setting {key}")]
    InvalidBoolean {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// The environment variable is set but is not valid unicode.
    #[error("value of setting {key} is not valid unicode")]
    NotUnicode {
        /// Setting name.
        key: String,
    },
}

//! Reading instrumentation settings from the environment.
//!
//! Settings are named like their system-property counterparts, upper-cased
//! with `.` and `-` replaced by `_`: the property
//! `otel.instrumentation.logback-appender.experimental-log-attributes` is read
//! from `OTEL_INSTRUMENTATION_LOGBACK_APPENDER_EXPERIMENTAL_LOG_ATTRIBUTES`.
//!
//! Values are read once, when a component is built. Invalid values fall back
//! to the default and are reported through internal logging.
use crate::error::ConfigError;
use opentelemetry::otel_warn;
use std::env::{self, VarError};

/// Prefix shared by every instrumentation setting.
pub const SETTING_PREFIX: &str = "OTEL_INSTRUMENTATION";

/// Builds the environment variable name of `setting` for the instrumentation
/// identified by `instrumentation`.
///
/// ```
/// use opentelemetry_instrumentation_api::config::setting_key;
///
/// assert_eq!(
///     setting_key("logback-appender", "experimental.capture-mdc-attributes"),
///     "OTEL_INSTRUMENTATION_LOGBACK_APPENDER_EXPERIMENTAL_CAPTURE_MDC_ATTRIBUTES"
/// );
/// ```
pub fn setting_key(instrumentation: &str, setting: &str) -> String {
    let mut key = String::with_capacity(
        SETTING_PREFIX.len() + instrumentation.len() + setting.len() + 2,
    );
    key.push_str(SETTING_PREFIX);
    for part in [instrumentation, setting] {
        key.push('_');
        key.extend(part.chars().map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        }));
    }
    key
}

/// Parses a boolean setting. Accepts `true` and `false` in any case.
pub fn parse_bool_setting(key: &str, value: &str) -> Result<bool, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidBoolean {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parses a comma separated list. Entries are trimmed and empty entries
/// dropped.
pub fn parse_list_setting(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_env(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
            key: key.to_string(),
        }),
    }
}

fn report(err: &ConfigError) {
    otel_warn!(
        name: "InstrumentationConfig.InvalidSetting",
        reason = format!("{err}")
    );
}

/// Reads a boolean setting, returning `default` when it is unset or invalid.
pub fn bool_from_env(key: &str, default: bool) -> bool {
    match read_env(key).and_then(|value| value.map(|v| parse_bool_setting(key, &v)).transpose()) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            report(&err);
            default
        }
    }
}

/// Reads a list setting, returning `None` when it is unset or unreadable.
pub fn list_from_env(key: &str) -> Option<Vec<String>> {
    match read_env(key) {
        Ok(value) => value.as_deref().map(parse_list_setting),
        Err(err) => {
            report(&err);
            None
        }
    }
}

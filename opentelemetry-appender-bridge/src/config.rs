//! Per-framework capture settings.
use crate::frameworks::Framework;
use opentelemetry_instrumentation_api::config::{bool_from_env, list_from_env, setting_key};

/// Thread name and id attributes.
pub const EXPERIMENTAL_LOG_ATTRIBUTES: &str = "experimental-log-attributes";
/// Allow-list of diagnostic context keys, or `*` for all of them.
pub const CAPTURE_MDC_ATTRIBUTES: &str = "experimental.capture-mdc-attributes";
/// Marker name attribute.
pub const CAPTURE_MARKER_ATTRIBUTE: &str = "experimental.capture-marker-attribute";
/// Call site attributes.
pub const CAPTURE_CODE_ATTRIBUTES: &str = "experimental.capture-code-attributes";
/// Map message entries as attributes.
pub const CAPTURE_MAP_MESSAGE_ATTRIBUTES: &str = "experimental.capture-map-message-attributes";
/// Logger context properties as attributes.
pub const CAPTURE_LOGGER_CONTEXT_ATTRIBUTES: &str =
    "experimental.capture-logger-context-attributes";

const CAPTURE_ALL: &str = "*";

/// Immutable capture settings of one framework bridge.
///
/// The default captures only what is never gated: body, time, severity and
/// exception attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    capture_experimental_attributes: bool,
    capture_context_data_attributes: Vec<String>,
    capture_all_context_data_attributes: bool,
    capture_marker_attribute: bool,
    capture_code_attributes: bool,
    capture_map_message_attributes: bool,
    capture_logger_context_attributes: bool,
}

impl BridgeConfig {
    /// Returns a builder with every setting off.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Resolves the settings of `framework` from the environment.
    pub fn from_env(framework: Framework) -> Self {
        BridgeConfigBuilder::from_env(framework).build()
    }

    /// Whether thread name and id are captured.
    pub fn capture_experimental_attributes(&self) -> bool {
        self.capture_experimental_attributes
    }

    /// Allow-listed diagnostic context keys.
    pub fn capture_context_data_attributes(&self) -> &[String] {
        &self.capture_context_data_attributes
    }

    /// Whether every diagnostic context entry is captured.
    pub fn capture_all_context_data_attributes(&self) -> bool {
        self.capture_all_context_data_attributes
    }

    /// Whether the marker name is captured.
    pub fn capture_marker_attribute(&self) -> bool {
        self.capture_marker_attribute
    }

    /// Whether call site attributes are captured.
    pub fn capture_code_attributes(&self) -> bool {
        self.capture_code_attributes
    }

    /// Whether map message entries are captured.
    pub fn capture_map_message_attributes(&self) -> bool {
        self.capture_map_message_attributes
    }

    /// Whether logger context properties are captured.
    pub fn capture_logger_context_attributes(&self) -> bool {
        self.capture_logger_context_attributes
    }
}

/// Builder for [`BridgeConfig`].
///
/// [`BridgeConfigBuilder::from_env`] starts from the environment; the
/// `with_*` methods override it.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfigBuilder {
    capture_experimental_attributes: bool,
    capture_context_data_attributes: Vec<String>,
    capture_marker_attribute: bool,
    capture_code_attributes: bool,
    capture_map_message_attributes: bool,
    capture_logger_context_attributes: bool,
}

impl BridgeConfigBuilder {
    /// Creates a builder initialized from the environment variables of
    /// `framework`:
    /// * `OTEL_INSTRUMENTATION_<NAME>_EXPERIMENTAL_LOG_ATTRIBUTES`
    /// * `OTEL_INSTRUMENTATION_<NAME>_EXPERIMENTAL_CAPTURE_MDC_ATTRIBUTES`
    /// * `OTEL_INSTRUMENTATION_<NAME>_EXPERIMENTAL_CAPTURE_MARKER_ATTRIBUTE`
    /// * `OTEL_INSTRUMENTATION_<NAME>_EXPERIMENTAL_CAPTURE_CODE_ATTRIBUTES`
    /// * `OTEL_INSTRUMENTATION_<NAME>_EXPERIMENTAL_CAPTURE_MAP_MESSAGE_ATTRIBUTES`
    /// * `OTEL_INSTRUMENTATION_<NAME>_EXPERIMENTAL_CAPTURE_LOGGER_CONTEXT_ATTRIBUTES`
    ///
    /// where `<NAME>` is `JAVA_UTIL_LOGGING`, `LOG4J_APPENDER` or
    /// `LOGBACK_APPENDER`.
    pub fn from_env(framework: Framework) -> Self {
        let name = framework.instrumentation_name();
        let flag = |setting: &str| bool_from_env(&setting_key(name, setting), false);
        BridgeConfigBuilder {
            capture_experimental_attributes: flag(EXPERIMENTAL_LOG_ATTRIBUTES),
            capture_context_data_attributes: list_from_env(&setting_key(
                name,
                CAPTURE_MDC_ATTRIBUTES,
            ))
            .unwrap_or_default(),
            capture_marker_attribute: flag(CAPTURE_MARKER_ATTRIBUTE),
            capture_code_attributes: flag(CAPTURE_CODE_ATTRIBUTES),
            capture_map_message_attributes: flag(CAPTURE_MAP_MESSAGE_ATTRIBUTES),
            capture_logger_context_attributes: flag(CAPTURE_LOGGER_CONTEXT_ATTRIBUTES),
        }
    }

    /// Capture thread name and id.
    pub fn with_experimental_attributes(mut self, enabled: bool) -> Self {
        self.capture_experimental_attributes = enabled;
        self
    }

    /// Diagnostic context keys to capture. A single `*` captures every key.
    pub fn with_context_data_attributes<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capture_context_data_attributes = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Capture the marker name.
    pub fn with_marker_attribute(mut self, enabled: bool) -> Self {
        self.capture_marker_attribute = enabled;
        self
    }

    /// Capture call site attributes.
    pub fn with_code_attributes(mut self, enabled: bool) -> Self {
        self.capture_code_attributes = enabled;
        self
    }

    /// Capture map message entries.
    pub fn with_map_message_attributes(mut self, enabled: bool) -> Self {
        self.capture_map_message_attributes = enabled;
        self
    }

    /// Capture logger context properties.
    pub fn with_logger_context_attributes(mut self, enabled: bool) -> Self {
        self.capture_logger_context_attributes = enabled;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> BridgeConfig {
        let capture_all_context_data_attributes =
            matches!(self.capture_context_data_attributes.as_slice(), [only] if only == CAPTURE_ALL);
        BridgeConfig {
            capture_experimental_attributes: self.capture_experimental_attributes,
            capture_context_data_attributes: self.capture_context_data_attributes,
            capture_all_context_data_attributes,
            capture_marker_attribute: self.capture_marker_attribute,
            capture_code_attributes: self.capture_code_attributes,
            capture_map_message_attributes: self.capture_map_message_attributes,
            capture_logger_context_attributes: self.capture_logger_context_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGBACK_MDC: &str = "OTEL_INSTRUMENTATION_LOGBACK_APPENDER_EXPERIMENTAL_CAPTURE_MDC_ATTRIBUTES";
    const LOGBACK_THREADS: &str = "OTEL_INSTRUMENTATION_LOGBACK_APPENDER_EXPERIMENTAL_LOG_ATTRIBUTES";
    const LOGBACK_MARKER: &str =
        "OTEL_INSTRUMENTATION_LOGBACK_APPENDER_EXPERIMENTAL_CAPTURE_MARKER_ATTRIBUTE";
    const JUL_THREADS: &str = "OTEL_INSTRUMENTATION_JAVA_UTIL_LOGGING_EXPERIMENTAL_LOG_ATTRIBUTES";

    #[test]
    fn default_config_captures_nothing_optional() {
        let config = BridgeConfig::default();
        assert!(!config.capture_experimental_attributes());
        assert!(config.capture_context_data_attributes().is_empty());
        assert!(!config.capture_all_context_data_attributes());
        assert!(!config.capture_marker_attribute());
        assert!(!config.capture_code_attributes());
        assert!(!config.capture_map_message_attributes());
        assert!(!config.capture_logger_context_attributes());
    }

    #[test]
    fn config_from_env_uses_framework_prefix() {
        let env_vars = vec![
            (LOGBACK_MDC, Some("requestId, userId")),
            (LOGBACK_THREADS, Some("true")),
            (LOGBACK_MARKER, Some("TRUE")),
            (JUL_THREADS, None),
        ];
        temp_env::with_vars(env_vars, || {
            let logback = BridgeConfig::from_env(Framework::Logback);
            assert!(logback.capture_experimental_attributes());
            assert!(logback.capture_marker_attribute());
            assert_eq!(
                logback.capture_context_data_attributes(),
                ["requestId".to_string(), "userId".to_string()]
            );
            assert!(!logback.capture_all_context_data_attributes());

            let jul = BridgeConfig::from_env(Framework::JavaUtilLogging);
            assert_eq!(jul, BridgeConfig::default());
        });
    }

    #[test]
    fn code_based_config_overrides_env_vars() {
        temp_env::with_vars(vec![(LOGBACK_THREADS, Some("true"))], || {
            let config = BridgeConfigBuilder::from_env(Framework::Logback)
                .with_experimental_attributes(false)
                .build();
            assert!(!config.capture_experimental_attributes());
        });
    }

    #[test]
    fn invalid_env_value_falls_back_to_default() {
        temp_env::with_vars(vec![(LOGBACK_THREADS, Some("on"))], || {
            assert!(!BridgeConfig::from_env(Framework::Logback).capture_experimental_attributes());
        });
    }

    #[test]
    fn wildcard_only_when_it_is_the_sole_entry() {
        let all = BridgeConfig::builder()
            .with_context_data_attributes(["*"])
            .build();
        assert!(all.capture_all_context_data_attributes());

        let mixed = BridgeConfig::builder()
            .with_context_data_attributes(["*", "requestId"])
            .build();
        assert!(!mixed.capture_all_context_data_attributes());
    }
}

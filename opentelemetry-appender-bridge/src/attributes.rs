//! Collection of record attributes from a [`LogEvent`].
use crate::config::BridgeConfig;
use crate::event::{ContextData, LogEvent, MapMessage, Message};
use crate::frameworks::Framework;
use crate::keys::{
    KeyCache, CODE_FILEPATH, CODE_FUNCTION, CODE_LINENO, CODE_NAMESPACE, EXCEPTION_MESSAGE,
    EXCEPTION_STACKTRACE, EXCEPTION_TYPE, SPECIAL_MAP_MESSAGE_ATTRIBUTE, THREAD_ID, THREAD_NAME,
};
use crate::record::StructuredRecord;
use opentelemetry::logs::AnyValue;
use opentelemetry::Key;
use opentelemetry_instrumentation_api::ThreadInfo;

/// Record attributes in insertion order. Keys are unique; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    entries: Vec<(Key, AnyValue)>,
}

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an attribute. The last write for a key wins.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<AnyValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no attribute.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &AnyValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl IntoIterator for AttributeMap {
    type Item = (Key, AnyValue);
    type IntoIter = std::vec::IntoIter<(Key, AnyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Maps the events of one framework to [`StructuredRecord`]s.
///
/// The mapper owns the framework's configuration and the key caches of its
/// attribute namespaces. It is shared by every thread capturing events of
/// that framework.
#[derive(Debug)]
pub struct EventMapper {
    framework: Framework,
    config: BridgeConfig,
    context_keys: KeyCache,
    map_message_keys: KeyCache,
}

impl EventMapper {
    /// Creates the mapper of `framework`.
    pub fn new(framework: Framework, config: BridgeConfig) -> Self {
        let context_keys = match framework.context_data_namespace() {
            Some(namespace) => KeyCache::new(namespace),
            None => KeyCache::verbatim(),
        };
        EventMapper {
            framework,
            config,
            context_keys,
            map_message_keys: KeyCache::new(framework.map_message_namespace()),
        }
    }

    /// The framework this mapper handles.
    pub fn framework(&self) -> Framework {
        self.framework
    }

    /// The capture settings in effect.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Maps `event` to a record. The trace context is left for the emitter.
    pub fn map<E: LogEvent>(&self, event: &E) -> StructuredRecord {
        let mut attributes = AttributeMap::new();
        let body = match event.message() {
            Some(Message::Text(text)) => Some(text.into_owned()),
            Some(Message::Map(message)) => self.capture_map_message(message, &mut attributes),
            None => None,
        };
        self.collect_into(event, &mut attributes);

        let level = event.level();
        StructuredRecord {
            body,
            timestamp: event.timestamp(),
            severity: level.and_then(|level| self.framework.severity_ladder().map_level(level)),
            severity_text: level.map(|level| level.name()),
            attributes,
            trace_context: None,
        }
    }

    /// Collects the attributes of `event`.
    pub fn collect<E: LogEvent>(&self, event: &E) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        if let Some(Message::Map(message)) = event.message() {
            self.capture_map_message(message, &mut attributes);
        }
        self.collect_into(event, &mut attributes);
        attributes
    }

    fn collect_into<E: LogEvent>(&self, event: &E, attributes: &mut AttributeMap) {
        if let Some(throwable) = event.throwable() {
            attributes.insert(EXCEPTION_TYPE, throwable.type_name().to_string());
            if let Some(message) = throwable.message() {
                attributes.insert(EXCEPTION_MESSAGE, message.to_string());
            }
            attributes.insert(EXCEPTION_STACKTRACE, throwable.stack_trace().to_string());
        }

        if let Some(context) = event.context_data() {
            self.capture_context_data(context, attributes);
        }

        if self.config.capture_experimental_attributes() {
            let thread = event.thread().unwrap_or_else(ThreadInfo::current);
            if let Some(name) = thread.name {
                attributes.insert(THREAD_NAME, name);
            }
            if let Some(id) = thread.id.and_then(|id| i64::try_from(id).ok()) {
                attributes.insert(THREAD_ID, id);
            }
        }

        if self.config.capture_code_attributes() {
            if let Some(frame) = event.caller() {
                if let Some(file_name) = &frame.file_name {
                    attributes.insert(CODE_FILEPATH, file_name.clone());
                }
                attributes.insert(CODE_NAMESPACE, frame.class_name.clone());
                attributes.insert(CODE_FUNCTION, frame.method_name.clone());
                if frame.line_number > 0 {
                    attributes.insert(CODE_LINENO, i64::from(frame.line_number));
                }
            }
        }

        if self.config.capture_marker_attribute() {
            if let (Some(key), Some(marker)) = (self.framework.marker_key(), event.marker()) {
                attributes.insert(key, marker.to_string());
            }
        }

        if self.config.capture_logger_context_attributes() {
            if let Some(properties) = event.logger_context_properties() {
                properties.for_each_entry(&mut |key, value| {
                    attributes.insert(Key::from(key.to_string()), value.to_string());
                });
            }
        }
    }

    fn capture_context_data(&self, context: &dyn ContextData, attributes: &mut AttributeMap) {
        if self.config.capture_all_context_data_attributes() {
            context.for_each_entry(&mut |key, value| {
                attributes.insert(self.context_keys.namespaced_key(key), value.to_string());
            });
            return;
        }
        for key in self.config.capture_context_data_attributes() {
            if let Some(value) = context.value(key) {
                attributes.insert(self.context_keys.namespaced_key(key), value.to_string());
            }
        }
    }

    /// Returns the body of a map message and captures its entries.
    ///
    /// Without a format, the `message` entry becomes the body and is not
    /// captured as an attribute. Empty bodies are dropped.
    fn capture_map_message(
        &self,
        message: &MapMessage,
        attributes: &mut AttributeMap,
    ) -> Option<String> {
        let promote = message.format().map_or(true, str::is_empty);
        let body = if promote {
            message.get(SPECIAL_MAP_MESSAGE_ATTRIBUTE)
        } else {
            message.format()
        };

        if self.config.capture_map_message_attributes() {
            for (key, value) in message.data() {
                if promote && key == SPECIAL_MAP_MESSAGE_ATTRIBUTE {
                    continue;
                }
                attributes.insert(self.map_message_keys.namespaced_key(key), value.clone());
            }
        }

        body.filter(|body| !body.is_empty()).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CallerFrame, Throwable};
    use crate::frameworks::{jul, log4j1, log4j2, logback};
    use opentelemetry::logs::Severity;
    use std::collections::HashMap;

    fn string(value: &AnyValue) -> &str {
        match value {
            AnyValue::String(s) => s.as_str(),
            other => panic!("expected a string, got {other:?}"),
        }
    }

    fn all_flags_on() -> BridgeConfig {
        BridgeConfig::builder()
            .with_experimental_attributes(true)
            .with_context_data_attributes(["*"])
            .with_marker_attribute(true)
            .with_code_attributes(true)
            .with_map_message_attributes(true)
            .with_logger_context_attributes(true)
            .build()
    }

    #[test]
    fn attribute_map_last_write_wins() {
        let mut map = AttributeMap::new();
        map.insert("a", "1");
        map.insert("b", "2");
        map.insert("a", "3");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a").map(string), Some("3"));
        let keys: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn flags_off_keep_only_exception_attributes() {
        let mapper = EventMapper::new(Framework::Logback, BridgeConfig::default());
        let event = logback::LoggingEvent::new("app", logback::levels::ERROR, "boom")
            .with_throwable(Throwable::new("java.io.IOException", None, "java.io.IOException\n\tat A.b"))
            .with_mdc("requestId", "abc")
            .with_marker("AUDIT")
            .with_logger_context_property("service", "checkout")
            .with_caller_frame(CallerFrame {
                file_name: Some("A.java".into()),
                class_name: "A".into(),
                method_name: "b".into(),
                line_number: 3,
            });

        let attributes = mapper.collect(&event);
        let keys: Vec<&str> = attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["exception.type", "exception.stacktrace"]);
    }

    #[test]
    fn no_throwable_and_flags_off_yields_no_attributes() {
        let mapper = EventMapper::new(Framework::JavaUtilLogging, BridgeConfig::default());
        let record = jul::LogRecord::new(jul::levels::INFO, "hello");
        assert!(mapper.collect(&record).is_empty());
    }

    #[test]
    fn wildcard_captures_every_context_entry() {
        let config = BridgeConfig::builder()
            .with_context_data_attributes(["*"])
            .build();
        let mapper = EventMapper::new(Framework::Log4j1, config);
        let mdc: HashMap<String, String> = (0..7)
            .map(|i| (format!("key{i}"), format!("value{i}")))
            .collect();
        let event = log4j1::LoggingEvent::new("app", log4j1::levels::INFO, "hi").with_mdc(mdc);

        let attributes = mapper.collect(&event);
        assert_eq!(attributes.len(), 7);
        for i in 0..7 {
            let value = attributes.get(&format!("log4j.mdc.key{i}")).map(string);
            assert_eq!(value, Some(format!("value{i}").as_str()));
        }
    }

    #[test]
    fn allow_list_skips_missing_keys() {
        let config = BridgeConfig::builder()
            .with_context_data_attributes(["requestId", "absent"])
            .build();
        let mapper = EventMapper::new(Framework::Logback, config);
        let event = logback::LoggingEvent::new("app", logback::levels::INFO, "hi")
            .with_mdc("requestId", "abc")
            .with_mdc("other", "x");

        let attributes = mapper.collect(&event);
        assert_eq!(attributes.len(), 1);
        assert_eq!(
            attributes.get("logback.mdc.requestId").map(string),
            Some("abc")
        );
    }

    #[test]
    fn log4j2_context_data_keys_are_verbatim() {
        let config = BridgeConfig::builder()
            .with_context_data_attributes(["tenant"])
            .build();
        let mapper = EventMapper::new(Framework::Log4j2, config);
        let event = log4j2::LogEvent::new(
            "app",
            log4j2::levels::INFO,
            log4j2::Message::Formatted("hi".into()),
        )
        .with_context_data("tenant", "acme");

        assert_eq!(mapper.collect(&event).get("tenant").map(string), Some("acme"));
    }

    #[test]
    fn map_message_without_format_promotes_message_entry() {
        let config = BridgeConfig::builder()
            .with_map_message_attributes(true)
            .build();
        let mapper = EventMapper::new(Framework::Log4j2, config);
        let message = MapMessage::new().with("message", "hello").with("user", "bob");
        let event = log4j2::LogEvent::new(
            "app",
            log4j2::levels::INFO,
            log4j2::Message::Map(message),
        );

        let record = mapper.map(&event);
        assert_eq!(record.body.as_deref(), Some("hello"));
        assert_eq!(record.attributes.len(), 1);
        assert_eq!(
            record.attributes.get("log4j.map_message.user").map(string),
            Some("bob")
        );
        assert!(record.attributes.get("log4j.map_message.message").is_none());
    }

    #[test]
    fn map_message_with_format_keeps_message_entry() {
        let config = BridgeConfig::builder()
            .with_map_message_attributes(true)
            .build();
        let mapper = EventMapper::new(Framework::Log4j2, config);
        let message = MapMessage::new()
            .with_format("user event")
            .with("message", "hello");
        let event = log4j2::LogEvent::new(
            "app",
            log4j2::levels::INFO,
            log4j2::Message::Map(message),
        );

        let record = mapper.map(&event);
        assert_eq!(record.body.as_deref(), Some("user event"));
        assert_eq!(
            record.attributes.get("log4j.map_message.message").map(string),
            Some("hello")
        );
    }

    #[test]
    fn map_message_attributes_are_gated() {
        let mapper = EventMapper::new(Framework::Log4j2, BridgeConfig::default());
        let message = MapMessage::new().with("message", "hello").with("user", "bob");
        let event = log4j2::LogEvent::new(
            "app",
            log4j2::levels::INFO,
            log4j2::Message::Map(message),
        );

        let record = mapper.map(&event);
        assert_eq!(record.body.as_deref(), Some("hello"));
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn all_flags_on_logback() {
        let mapper = EventMapper::new(Framework::Logback, all_flags_on());
        let event = logback::LoggingEvent::new("app", logback::levels::WARN, "careful")
            .with_thread("async-appender", 17)
            .with_marker("AUDIT")
            .with_logger_context_property("service", "checkout")
            .with_caller_frame(CallerFrame {
                file_name: None,
                class_name: "com.example.Cart".into(),
                method_name: "checkout".into(),
                line_number: 0,
            });

        let record = mapper.map(&event);
        assert_eq!(record.severity, Some(Severity::Warn));
        assert_eq!(record.severity_text, Some("WARN"));
        let attributes = &record.attributes;
        assert_eq!(attributes.get("thread.name").map(string), Some("async-appender"));
        assert_eq!(attributes.get("thread.id"), Some(&AnyValue::Int(17)));
        assert_eq!(attributes.get("code.namespace").map(string), Some("com.example.Cart"));
        assert_eq!(attributes.get("code.function").map(string), Some("checkout"));
        assert!(attributes.get("code.filepath").is_none());
        assert!(attributes.get("code.lineno").is_none());
        assert_eq!(attributes.get("logback.marker").map(string), Some("AUDIT"));
        assert_eq!(attributes.get("service").map(string), Some("checkout"));
    }

    #[test]
    fn capturing_thread_is_used_when_event_has_none() {
        let config = BridgeConfig::builder()
            .with_experimental_attributes(true)
            .build();
        let mapper = EventMapper::new(Framework::JavaUtilLogging, config);
        let attributes = std::thread::Builder::new()
            .name("capturing".into())
            .spawn(move || mapper.collect(&jul::LogRecord::new(jul::levels::INFO, "hi")))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(attributes.get("thread.name").map(string), Some("capturing"));
        assert!(matches!(attributes.get("thread.id"), Some(AnyValue::Int(id)) if *id > 0));
    }

    #[test]
    fn absent_level_leaves_severity_unset() {
        let mapper = EventMapper::new(Framework::JavaUtilLogging, BridgeConfig::default());
        let record = mapper.map(&jul::LogRecord::new(jul::levels::INFO, "hi").with_level(None));
        assert_eq!(record.severity, None);
        assert_eq!(record.severity_text, None);
        assert_eq!(record.body.as_deref(), Some("hi"));
    }
}

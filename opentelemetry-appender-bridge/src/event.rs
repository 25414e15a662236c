//! The capability interface every framework event exposes to the bridge.
use crate::frameworks::Framework;
use crate::severity::Level;
use opentelemetry_instrumentation_api::ThreadInfo;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::Write as _;
use std::hash::BuildHasher;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A log event captured from a logging framework.
///
/// Implementations are thin read-only views over one framework's event
/// shape. Every accessor describes data that may be absent; absent data is
/// left out of the record, never reported as an error.
pub trait LogEvent {
    /// The framework the event comes from. Selects the severity ladder,
    /// attribute namespaces and configuration.
    const FRAMEWORK: Framework;

    /// Name of the logger or category that produced the event.
    fn logger_name(&self) -> Option<&str>;

    /// The event's level.
    fn level(&self) -> Option<Level>;

    /// The event's message.
    fn message(&self) -> Option<Message<'_>>;

    /// Time the event occurred. Events without one are stamped at capture.
    fn timestamp(&self) -> Option<SystemTime> {
        None
    }

    /// Exception attached to the event.
    fn throwable(&self) -> Option<&Throwable> {
        None
    }

    /// Thread the event originated on. `None` means the capturing thread.
    fn thread(&self) -> Option<ThreadInfo> {
        None
    }

    /// Diagnostic context (MDC, thread context, context data) snapshot.
    fn context_data(&self) -> Option<&dyn ContextData> {
        None
    }

    /// Name of the marker attached to the event.
    fn marker(&self) -> Option<&str> {
        None
    }

    /// Innermost frame of the logging call site.
    fn caller(&self) -> Option<&CallerFrame> {
        None
    }

    /// Properties of the logger context the event was logged through.
    fn logger_context_properties(&self) -> Option<&dyn ContextData> {
        None
    }
}

/// The message of a [`LogEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message<'a> {
    /// A message already rendered to text.
    Text(Cow<'a, str>),
    /// A structured key/value message.
    Map(&'a MapMessage),
}

/// Read access to a diagnostic context table.
pub trait ContextData {
    /// Returns the value stored for `key`.
    fn value(&self, key: &str) -> Option<&str>;

    /// Calls `f` for every entry.
    fn for_each_entry(&self, f: &mut dyn FnMut(&str, &str));

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the table is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: BuildHasher> ContextData for HashMap<String, String, S> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, &str)) {
        for (key, value) in self {
            f(key, value);
        }
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl ContextData for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, &str)) {
        for (key, value) in self {
            f(key, value);
        }
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// An exception attached to a log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throwable {
    type_name: String,
    message: Option<String>,
    stack_trace: String,
}

impl Throwable {
    /// Creates a throwable from its parts.
    pub fn new(
        type_name: impl Into<String>,
        message: Option<String>,
        stack_trace: impl Into<String>,
    ) -> Self {
        Throwable {
            type_name: type_name.into(),
            message,
            stack_trace: stack_trace.into(),
        }
    }

    /// Captures a Rust error. The stack trace lists the error followed by
    /// its chain of sources.
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        let type_name = std::any::type_name::<E>();
        let message = err.to_string();
        let mut stack_trace = format!("{type_name}: {message}");
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(stack_trace, "\nCaused by: {cause}");
            source = cause.source();
        }
        Throwable {
            type_name: type_name.to_string(),
            message: Some(message),
            stack_trace,
        }
    }

    /// Fully qualified type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Exception message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The printed stack trace.
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }
}

/// One frame of a logging call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    /// Source file, when known.
    pub file_name: Option<String>,
    /// Declaring class or module.
    pub class_name: String,
    /// Function name.
    pub method_name: String,
    /// Line number; zero or negative when unknown.
    pub line_number: i32,
}

/// A structured message made of key/value pairs and an optional format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapMessage {
    format: Option<String>,
    data: BTreeMap<String, String>,
}

impl MapMessage {
    /// Creates an empty map message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Adds an entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds an entry, replacing any previous value of `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// The message format.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// All entries, ordered by key.
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }
}

/// Converts a framework timestamp in milliseconds since the Unix epoch.
pub fn from_epoch_millis(millis: i64) -> SystemTime {
    let offset = Duration::from_millis(millis.unsigned_abs());
    let time = if millis >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    // Out of range for this platform's clock.
    time.unwrap_or(UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Disconnected;

    impl fmt::Display for Disconnected {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("peer went away")
        }
    }

    impl Error for Disconnected {}

    #[derive(Debug)]
    struct WriteFailed(Disconnected);

    impl fmt::Display for WriteFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    impl Error for WriteFailed {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn throwable_from_error_prints_source_chain() {
        let throwable = Throwable::from_error(&WriteFailed(Disconnected));
        assert!(throwable.type_name().ends_with("WriteFailed"));
        assert_eq!(throwable.message(), Some("disk full"));
        assert!(throwable.stack_trace().contains("WriteFailed: disk full"));
        assert!(throwable
            .stack_trace()
            .ends_with("\nCaused by: peer went away"));
    }

    #[test]
    fn map_message_keeps_entries_sorted() {
        let message = MapMessage::new().with("user", "bob").with("message", "hello");
        let keys: Vec<&str> = message.data().keys().map(String::as_str).collect();
        assert_eq!(keys, ["message", "user"]);
        assert_eq!(message.get("user"), Some("bob"));
        assert_eq!(message.format(), None);
    }

    #[test]
    fn epoch_millis_convert_to_system_time() {
        assert_eq!(from_epoch_millis(0), UNIX_EPOCH);
        assert_eq!(
            from_epoch_millis(1_700_000_000_123),
            UNIX_EPOCH + Duration::from_millis(1_700_000_000_123)
        );
        assert_eq!(
            from_epoch_millis(-5_000),
            UNIX_EPOCH - Duration::from_millis(5_000)
        );
    }

    #[test]
    fn extreme_epoch_millis_do_not_panic() {
        let latest = from_epoch_millis(i64::MAX);
        let earliest = from_epoch_millis(i64::MIN);
        assert!(latest >= UNIX_EPOCH);
        assert!(earliest <= UNIX_EPOCH);
    }

    #[test]
    fn context_data_over_std_maps() {
        let mut hashed = HashMap::new();
        hashed.insert("requestId".to_string(), "abc".to_string());
        let sorted: BTreeMap<String, String> = hashed.clone().into_iter().collect();
        for table in [&hashed as &dyn ContextData, &sorted as &dyn ContextData] {
            assert_eq!(table.value("requestId"), Some("abc"));
            assert_eq!(table.value("missing"), None);
            let mut seen = Vec::new();
            table.for_each_entry(&mut |k, v| seen.push(format!("{k}={v}")));
            assert_eq!(seen, ["requestId=abc"]);
            assert_eq!(table.len(), 1);
        }
    }
}

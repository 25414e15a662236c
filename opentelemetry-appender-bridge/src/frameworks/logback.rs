//! Logback logging events.
use crate::event::{from_epoch_millis, CallerFrame, ContextData, LogEvent, Message, Throwable};
use crate::frameworks::Framework;
use crate::severity::{Level, LevelOrder, SeverityLadder};
use opentelemetry::logs::Severity;
use opentelemetry_instrumentation_api::ThreadInfo;
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::SystemTime;

/// The Logback levels. Logback has no custom levels.
pub mod levels {
    use crate::severity::Level;

    pub const OFF: Level = Level::new("OFF", i32::MAX);
    pub const ERROR: Level = Level::new("ERROR", 40_000);
    pub const WARN: Level = Level::new("WARN", 30_000);
    pub const INFO: Level = Level::new("INFO", 20_000);
    pub const DEBUG: Level = Level::new("DEBUG", 10_000);
    pub const TRACE: Level = Level::new("TRACE", 5_000);
    pub const ALL: Level = Level::new("ALL", i32::MIN);
}

pub static SEVERITY_LADDER: SeverityLadder = SeverityLadder::new(
    LevelOrder::Ascending,
    &[
        (5_000, Severity::Trace),
        (10_000, Severity::Debug),
        (20_000, Severity::Info),
        (30_000, Severity::Warn),
        (40_000, Severity::Error),
    ],
    None,
    Some(i32::MAX),
);

/// Snapshot of a Logback `ILoggingEvent`.
///
/// Appenders may be asynchronous, so the event records the thread that
/// created it rather than the one that captures it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingEvent {
    logger_name: Option<String>,
    level: Option<Level>,
    formatted_message: Option<String>,
    timestamp_millis: i64,
    throwable: Option<Throwable>,
    mdc: HashMap<String, String>,
    thread: ThreadInfo,
    caller_data: Vec<CallerFrame>,
    marker: Option<String>,
    logger_context_properties: HashMap<String, String>,
}

impl LoggingEvent {
    /// Creates an event on the current thread, stamped with the current time.
    pub fn new(logger_name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        let timestamp_millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default();
        LoggingEvent {
            logger_name: Some(logger_name.into()),
            level: Some(level),
            formatted_message: Some(message.into()),
            timestamp_millis,
            throwable: None,
            mdc: HashMap::new(),
            thread: ThreadInfo::current(),
            caller_data: Vec::new(),
            marker: None,
            logger_context_properties: HashMap::new(),
        }
    }

    /// Replaces the level. `None` leaves the severity unset.
    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    /// Sets the event time in milliseconds since the Unix epoch.
    pub fn with_timestamp_millis(mut self, millis: i64) -> Self {
        self.timestamp_millis = millis;
        self
    }

    /// Attaches an exception.
    pub fn with_throwable(mut self, throwable: Throwable) -> Self {
        self.throwable = Some(throwable);
        self
    }

    /// Adds an MDC entry.
    pub fn with_mdc(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.mdc.insert(key.into(), value.into());
        self
    }

    /// Sets the originating thread. A negative id means the id is unknown.
    pub fn with_thread(mut self, name: impl Into<String>, id: i64) -> Self {
        self.thread = ThreadInfo {
            name: Some(name.into()),
            id: u64::try_from(id).ok(),
        };
        self
    }

    /// Appends a caller frame, innermost first.
    pub fn with_caller_frame(mut self, frame: CallerFrame) -> Self {
        self.caller_data.push(frame);
        self
    }

    /// Sets the marker name.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Adds a property of the logger context.
    pub fn with_logger_context_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.logger_context_properties
            .insert(key.into(), value.into());
        self
    }
}

impl LogEvent for LoggingEvent {
    const FRAMEWORK: Framework = Framework::Logback;

    fn logger_name(&self) -> Option<&str> {
        self.logger_name.as_deref()
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn message(&self) -> Option<Message<'_>> {
        self.formatted_message
            .as_deref()
            .map(|m| Message::Text(Cow::Borrowed(m)))
    }

    fn timestamp(&self) -> Option<SystemTime> {
        Some(from_epoch_millis(self.timestamp_millis))
    }

    fn throwable(&self) -> Option<&Throwable> {
        self.throwable.as_ref()
    }

    fn thread(&self) -> Option<ThreadInfo> {
        Some(self.thread.clone())
    }

    fn context_data(&self) -> Option<&dyn ContextData> {
        Some(&self.mdc)
    }

    fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    fn caller(&self) -> Option<&CallerFrame> {
        self.caller_data.first()
    }

    fn logger_context_properties(&self) -> Option<&dyn ContextData> {
        Some(&self.logger_context_properties)
    }
}

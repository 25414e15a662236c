//! Log4j 2 log events.
//!
//! Log4j 2 orders levels the other way round: the smaller the integer, the
//! more severe the level. Custom levels map like the closest standard level
//! at or above them in severity.
use crate::event::{self, ContextData, MapMessage, Throwable};
use crate::frameworks::Framework;
use crate::severity::{Level, LevelOrder, SeverityLadder};
use opentelemetry::logs::Severity;
use opentelemetry_instrumentation_api::ThreadInfo;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::SystemTime;

/// The standard Log4j 2 levels.
pub mod levels {
    use crate::severity::Level;

    pub const OFF: Level = Level::new("OFF", 0);
    pub const FATAL: Level = Level::new("FATAL", 100);
    pub const ERROR: Level = Level::new("ERROR", 200);
    pub const WARN: Level = Level::new("WARN", 300);
    pub const INFO: Level = Level::new("INFO", 400);
    pub const DEBUG: Level = Level::new("DEBUG", 500);
    pub const TRACE: Level = Level::new("TRACE", 600);
    pub const ALL: Level = Level::new("ALL", i32::MAX);
}

/// Anything more severe than `FATAL` is `OFF`, which leaves the severity
/// unset.
pub static SEVERITY_LADDER: SeverityLadder = SeverityLadder::new(
    LevelOrder::Descending,
    &[
        (600, Severity::Trace),
        (500, Severity::Debug),
        (400, Severity::Info),
        (300, Severity::Warn),
        (200, Severity::Error),
        (100, Severity::Fatal),
    ],
    None,
    None,
);

/// The message of a Log4j 2 event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Any message other than a map message, already formatted.
    Formatted(String),
    /// A `MapMessage` or one of its subclasses.
    Map(MapMessage),
}

/// Snapshot of a Log4j 2 `LogEvent` handed to an appender.
///
/// Appenders may run on a different thread than the logging call, so the
/// event carries the originating thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    logger_name: Option<String>,
    level: Option<Level>,
    marker: Option<String>,
    message: Option<Message>,
    thrown: Option<Throwable>,
    context_data: BTreeMap<String, String>,
    thread: ThreadInfo,
    timestamp: Option<SystemTime>,
}

impl LogEvent {
    /// Creates an event originating on the current thread.
    pub fn new(logger_name: impl Into<String>, level: Level, message: Message) -> Self {
        LogEvent {
            logger_name: Some(logger_name.into()),
            level: Some(level),
            marker: None,
            message: Some(message),
            thrown: None,
            context_data: BTreeMap::new(),
            thread: ThreadInfo::current(),
            timestamp: None,
        }
    }

    /// Replaces the level. `None` leaves the severity unset.
    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    /// Replaces the message. `None` leaves the body unset.
    pub fn with_message(mut self, message: Option<Message>) -> Self {
        self.message = message;
        self
    }

    /// Sets the marker name.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Attaches an exception.
    pub fn with_thrown(mut self, thrown: Throwable) -> Self {
        self.thrown = Some(thrown);
        self
    }

    /// Adds an entry to the event's context data.
    pub fn with_context_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_data.insert(key.into(), value.into());
        self
    }

    /// Sets the thread the event originated on.
    pub fn with_thread(mut self, name: impl Into<String>, id: u64) -> Self {
        self.thread = ThreadInfo {
            name: Some(name.into()),
            id: Some(id),
        };
        self
    }

    /// Sets the event time.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl event::LogEvent for LogEvent {
    const FRAMEWORK: Framework = Framework::Log4j2;

    fn logger_name(&self) -> Option<&str> {
        self.logger_name.as_deref()
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn message(&self) -> Option<event::Message<'_>> {
        self.message.as_ref().map(|message| match message {
            Message::Formatted(text) => event::Message::Text(Cow::Borrowed(text)),
            Message::Map(map) => event::Message::Map(map),
        })
    }

    fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    fn throwable(&self) -> Option<&Throwable> {
        self.thrown.as_ref()
    }

    fn thread(&self) -> Option<ThreadInfo> {
        Some(self.thread.clone())
    }

    fn context_data(&self) -> Option<&dyn ContextData> {
        Some(&self.context_data)
    }

    fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}

//! Log4j 1.2 logging calls.
use crate::event::{ContextData, LogEvent, Message, Throwable};
use crate::frameworks::Framework;
use crate::severity::{Level, LevelOrder, SeverityLadder};
use opentelemetry::logs::Severity;
use std::borrow::Cow;
use std::collections::HashMap;

/// The standard Log4j 1.2 priorities.
pub mod levels {
    use crate::severity::Level;

    pub const OFF: Level = Level::new("OFF", i32::MAX);
    pub const FATAL: Level = Level::new("FATAL", 50_000);
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
    Some(Severity::Fatal),
    Some(i32::MAX),
);

/// A Log4j 1.2 `Category.log` call: the category, priority, message and
/// throwable passed by the application, plus the MDC of the calling thread.
///
/// Log4j 1.2 calls carry neither a time nor a thread, so the record is
/// stamped at capture with the capturing thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingEvent {
    category: Option<String>,
    priority: Option<Level>,
    message: Option<String>,
    throwable: Option<Throwable>,
    mdc: Option<HashMap<String, String>>,
}

impl LoggingEvent {
    /// Creates an event for a call on `category`.
    pub fn new(category: impl Into<String>, priority: Level, message: impl Into<String>) -> Self {
        LoggingEvent {
            category: Some(category.into()),
            priority: Some(priority),
            message: Some(message.into()),
            throwable: None,
            mdc: None,
        }
    }

    /// Replaces the priority. `None` leaves the severity unset.
    pub fn with_priority(mut self, priority: Option<Level>) -> Self {
        self.priority = priority;
        self
    }

    /// Replaces the message. `None` leaves the body unset.
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    /// Attaches an exception.
    pub fn with_throwable(mut self, throwable: Throwable) -> Self {
        self.throwable = Some(throwable);
        self
    }

    /// Attaches the MDC of the calling thread.
    pub fn with_mdc(mut self, mdc: HashMap<String, String>) -> Self {
        self.mdc = Some(mdc);
        self
    }
}

impl LogEvent for LoggingEvent {
    const FRAMEWORK: Framework = Framework::Log4j1;

    fn logger_name(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn level(&self) -> Option<Level> {
        self.priority
    }

    fn message(&self) -> Option<Message<'_>> {
        self.message.as_deref().map(|m| Message::Text(Cow::Borrowed(m)))
    }

    fn throwable(&self) -> Option<&Throwable> {
        self.throwable.as_ref()
    }

    fn context_data(&self) -> Option<&dyn ContextData> {
        self.mdc.as_ref().map(|mdc| mdc as &dyn ContextData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_map_to_severity() {
        let cases = [
            (levels::ALL, Some(Severity::Trace)),
            (levels::TRACE, Some(Severity::Trace)),
            (levels::DEBUG, Some(Severity::Debug)),
            (levels::INFO, Some(Severity::Info)),
            (levels::WARN, Some(Severity::Warn)),
            (levels::ERROR, Some(Severity::Error)),
            (levels::FATAL, Some(Severity::Fatal)),
            (levels::OFF, None),
        ];
        for (level, expected) in cases {
            assert_eq!(SEVERITY_LADDER.map_level(level), expected, "{level:?}");
        }
    }

    #[test]
    fn event_has_no_timestamp_or_thread() {
        let event = LoggingEvent::new("app", levels::INFO, "hello");
        assert!(event.timestamp().is_none());
        assert!(event.thread().is_none());
        assert!(event.context_data().is_none());
    }
}

//! Adapters for the event shapes of each supported logging framework.
//!
//! Each adapter is an owned snapshot of the framework's event implementing
//! [`LogEvent`](crate::LogEvent), plus the framework's level constants and
//! severity ladder.
pub mod jul;
pub mod log4j1;
pub mod log4j2;
pub mod logback;

use crate::severity::SeverityLadder;

/// The logging frameworks the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    /// `java.util.logging`.
    JavaUtilLogging,
    /// Log4j 1.2.
    Log4j1,
    /// Log4j 2.17 and later.
    Log4j2,
    /// Logback.
    Logback,
}

impl Framework {
    /// Every supported framework.
    pub const ALL: [Framework; 4] = [
        Framework::JavaUtilLogging,
        Framework::Log4j1,
        Framework::Log4j2,
        Framework::Logback,
    ];

    /// Name of the instrumentation, used to derive setting names.
    pub const fn instrumentation_name(self) -> &'static str {
        match self {
            Framework::JavaUtilLogging => "java-util-logging",
            Framework::Log4j1 | Framework::Log4j2 => "log4j-appender",
            Framework::Logback => "logback-appender",
        }
    }

    /// The framework's level to severity ladder.
    pub fn severity_ladder(self) -> &'static SeverityLadder {
        match self {
            Framework::JavaUtilLogging => &jul::SEVERITY_LADDER,
            Framework::Log4j1 => &log4j1::SEVERITY_LADDER,
            Framework::Log4j2 => &log4j2::SEVERITY_LADDER,
            Framework::Logback => &logback::SEVERITY_LADDER,
        }
    }

    /// Namespace of diagnostic context attributes. `None` keeps keys as they
    /// are.
    pub const fn context_data_namespace(self) -> Option<&'static str> {
        match self {
            Framework::Log4j1 => Some("log4j.mdc"),
            Framework::Logback => Some("logback.mdc"),
            Framework::JavaUtilLogging | Framework::Log4j2 => None,
        }
    }

    /// Namespace of map message attributes.
    pub const fn map_message_namespace(self) -> &'static str {
        "log4j.map_message"
    }

    /// Attribute key of the event marker, for frameworks with markers.
    pub const fn marker_key(self) -> Option<&'static str> {
        match self {
            Framework::Log4j2 => Some("log4j.marker"),
            Framework::Logback => Some("logback.marker"),
            Framework::JavaUtilLogging | Framework::Log4j1 => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Framework::JavaUtilLogging => 0,
            Framework::Log4j1 => 1,
            Framework::Log4j2 => 2,
            Framework::Logback => 3,
        }
    }
}

//! `java.util.logging` records.
use crate::event::{from_epoch_millis, LogEvent, Message, Throwable};
use crate::frameworks::Framework;
use crate::severity::{Level, LevelOrder, SeverityLadder};
use opentelemetry::logs::Severity;
use std::borrow::Cow;
use std::time::SystemTime;

/// The standard `java.util.logging` levels.
pub mod levels {
    use crate::severity::Level;

    pub const OFF: Level = Level::new("OFF", i32::MAX);
    pub const SEVERE: Level = Level::new("SEVERE", 1000);
    pub const WARNING: Level = Level::new("WARNING", 900);
    pub const INFO: Level = Level::new("INFO", 800);
    pub const CONFIG: Level = Level::new("CONFIG", 700);
    pub const FINE: Level = Level::new("FINE", 500);
    pub const FINER: Level = Level::new("FINER", 400);
    pub const FINEST: Level = Level::new("FINEST", 300);
    pub const ALL: Level = Level::new("ALL", i32::MIN);
}

/// Custom levels between two standard ones map like the next standard level
/// above them; anything past `SEVERE` is fatal.
pub static SEVERITY_LADDER: SeverityLadder = SeverityLadder::new(
    LevelOrder::Ascending,
    &[
        (300, Severity::Trace),
        (400, Severity::Debug),
        (500, Severity::Debug2),
        (700, Severity::Debug3),
        (800, Severity::Info),
        (900, Severity::Warn),
        (1000, Severity::Error),
    ],
    Some(Severity::Fatal),
    Some(i32::MAX),
);

/// Snapshot of a `java.util.logging.LogRecord`.
///
/// The record carries no thread of its own: thread attributes describe the
/// capturing thread.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    logger_name: Option<String>,
    level: Option<Level>,
    message: Option<String>,
    parameters: Vec<String>,
    millis: i64,
    thrown: Option<Throwable>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default();
        LogRecord {
            logger_name: None,
            level: Some(level),
            message: Some(message.into()),
            parameters: Vec::new(),
            millis,
            thrown: None,
        }
    }

    /// Sets the name of the logger the record was logged through.
    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = Some(name.into());
        self
    }

    /// Replaces the level. `None` leaves the severity unset.
    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    /// Replaces the raw message. `None` leaves the body unset.
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    /// Sets the message parameters, already converted to strings.
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the event time in milliseconds since the Unix epoch.
    pub fn with_millis(mut self, millis: i64) -> Self {
        self.millis = millis;
        self
    }

    /// Attaches an exception.
    pub fn with_thrown(mut self, thrown: Throwable) -> Self {
        self.thrown = Some(thrown);
        self
    }

    /// Event time in milliseconds since the Unix epoch.
    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// The message parameters.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

impl LogEvent for LogRecord {
    const FRAMEWORK: Framework = Framework::JavaUtilLogging;

    fn logger_name(&self) -> Option<&str> {
        self.logger_name.as_deref()
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn message(&self) -> Option<Message<'_>> {
        self.message
            .as_deref()
            .map(|pattern| Message::Text(format_message(pattern, &self.parameters)))
    }

    fn timestamp(&self) -> Option<SystemTime> {
        Some(from_epoch_millis(self.millis))
    }

    fn throwable(&self) -> Option<&Throwable> {
        self.thrown.as_ref()
    }
}

/// Substitutes `{N}` placeholders in `pattern` with `parameters[N]`.
///
/// The pattern is returned unchanged when there are no parameters, when no
/// `{` is followed by a digit, or when the pattern is malformed. Text inside
/// single quotes is literal and `''` is a single quote. Format styles such as
/// `{0,number}` are accepted and ignored. Placeholders without a parameter
/// are kept as `{N}`.
pub fn format_message<'a>(pattern: &'a str, parameters: &[String]) -> Cow<'a, str> {
    if parameters.is_empty() || !has_placeholder(pattern) {
        return Cow::Borrowed(pattern);
    }
    match substitute(pattern, parameters) {
        Some(formatted) => Cow::Owned(formatted),
        None => Cow::Borrowed(pattern),
    }
}

fn has_placeholder(pattern: &str) -> bool {
    pattern
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b'{' && pair[1].is_ascii_digit())
}

fn substitute(pattern: &str, parameters: &[String]) -> Option<String> {
    let mut out = String::with_capacity(pattern.len() + parameters.len() * 8);
    let mut chars = pattern.chars().peekable();
    let mut quoted = false;
    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let mut argument = String::new();
                let mut depth = 1;
                for c in chars.by_ref() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    argument.push(c);
                }
                if depth != 0 {
                    return None;
                }
                let index = argument.split(',').next().unwrap_or_default().trim();
                let index: usize = index.parse().ok()?;
                match parameters.get(index) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(&index.to_string());
                        out.push('}');
                    }
                }
            }
            _ => out.push(c),
        }
    }
    Some(out)
}

//! Mapping of framework log levels onto OpenTelemetry [`Severity`].
//!
//! Every framework orders its levels by an integer. A [`SeverityLadder`]
//! walks that framework's breakpoints from the least to the most severe and
//! returns the severity of the first breakpoint the level falls under. The
//! algorithm is shared; only the breakpoints and the direction of the integer
//! scale differ between frameworks.
use opentelemetry::logs::Severity;
use std::fmt;

/// A framework log level: its display name and its integer value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level {
    name: &'static str,
    value: i32,
}

impl Level {
    /// Creates a level. Custom levels are allowed by every framework that
    /// orders levels by integer.
    pub const fn new(name: &'static str, value: i32) -> Self {
        Level { name, value }
    }

    /// The level's label, reported as the record's severity text.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The level's integer value on the framework's scale.
    pub const fn value(&self) -> i32 {
        self.value
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Direction of a framework's integer level scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOrder {
    /// Larger values are more severe (java.util.logging, Log4j 1.2, Logback).
    Ascending,
    /// Smaller values are more severe (Log4j 2).
    Descending,
}

/// Ordered threshold table mapping a level value to a [`Severity`].
#[derive(Debug)]
pub struct SeverityLadder {
    order: LevelOrder,
    steps: &'static [(i32, Severity)],
    beyond: Option<Severity>,
    off: Option<i32>,
}

impl SeverityLadder {
    /// Creates a ladder. `steps` lists `(bound, severity)` pairs from the
    /// least to the most severe; a level falls under a step when it is at or
    /// below the bound on the framework's scale. Levels past the last step map
    /// to `beyond`. The `off` value, if any, never maps to a severity.
    pub const fn new(
        order: LevelOrder,
        steps: &'static [(i32, Severity)],
        beyond: Option<Severity>,
        off: Option<i32>,
    ) -> Self {
        SeverityLadder {
            order,
            steps,
            beyond,
            off,
        }
    }

    /// Maps a level value. `None` means "severity unset".
    pub fn map(&self, value: i32) -> Option<Severity> {
        if self.off == Some(value) {
            return None;
        }
        self.steps
            .iter()
            .find(|(bound, _)| match self.order {
                LevelOrder::Ascending => value <= *bound,
                LevelOrder::Descending => value >= *bound,
            })
            .map(|(_, severity)| *severity)
            .or(self.beyond)
    }

    /// Maps a level.
    pub fn map_level(&self, level: Level) -> Option<Severity> {
        self.map(level.value())
    }
}

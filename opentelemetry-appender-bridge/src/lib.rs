//! # OpenTelemetry-Appender-Bridge
//!
//! This crate bridges log events of the JVM logging frameworks
//! (`java.util.logging`, Log4j 1.2, Log4j 2 and Logback) to OpenTelemetry logs.
//! Host integrations hand it an owned snapshot of each framework event; the
//! bridge maps it to an OpenTelemetry `LogRecord` and emits it through a
//! [`LoggerProvider`](opentelemetry::logs::LoggerProvider).
//!
//! ## Features
//!
//! - One mapping algorithm for every framework, written against the small
//!   [`LogEvent`] capability trait. Each framework contributes an adapter in
//!   [`frameworks`] with its level constants and severity ladder.
//! - Optional attributes (thread, diagnostic context, marker, call site, map
//!   message entries, logger context) gated by a per-framework
//!   [`BridgeConfig`] resolved once when the bridge is built.
//! - Suppression of duplicate records when one captured framework delegates
//!   to another on the same thread.
//! - Automatically attaches the active OpenTelemetry trace context
//!   (`TraceId`, `SpanId`, `TraceFlags`) to logs.
//! - Fail-safe emission: a panicking processor or exporter never reaches the
//!   logging call site.
//!
//! ## Getting Started
//!
//! ```rust
//! use opentelemetry_appender_bridge::frameworks::jul::{levels, LogRecord};
//! use opentelemetry_appender_bridge::AppenderBridge;
//! use opentelemetry_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider};
//!
//! let exporter = InMemoryLogExporter::default();
//! let provider = SdkLoggerProvider::builder()
//!     .with_simple_exporter(exporter.clone())
//!     .build();
//! let bridge = AppenderBridge::new(&provider);
//!
//! let record = LogRecord::new(levels::WARNING, "{0} is full")
//!     .with_logger_name("storage")
//!     .with_parameters(["/var"]);
//! bridge.capture(&record);
//!
//! assert_eq!(exporter.get_emitted_logs().unwrap().len(), 1);
//! ```
//!
//! ## Mapping details
//!
//! | Framework event        | OpenTelemetry           | Notes |
//! |------------------------|-------------------------|-------|
//! | logger / category name | `InstrumentationScope`  | Empty or absent names become `ROOT` |
//! | formatted message      | `Body`                  | Map messages without a format use their `message` entry |
//! | event time             | `Timestamp`             | Capture time for frameworks without one |
//! | level                  | `Severity`, `SeverityText` | `OFF` leaves the severity unset |
//! | throwable              | `exception.type`, `exception.message`, `exception.stacktrace` | Always captured |
//! | thread                 | `thread.name`, `thread.id` | `experimental-log-attributes` |
//! | MDC / context data     | `log4j.mdc.*`, `logback.mdc.*`, verbatim for Log4j 2 | `experimental.capture-mdc-attributes` |
//! | marker                 | `log4j.marker`, `logback.marker` | `experimental.capture-marker-attribute` |
//! | caller data            | `code.filepath`, `code.namespace`, `code.function`, `code.lineno` | `experimental.capture-code-attributes` |
//! | map message entries    | `log4j.map_message.*`   | `experimental.capture-map-message-attributes` |
//! | logger context         | verbatim keys           | `experimental.capture-logger-context-attributes` |
//!
//! ### Severity
//!
//! | Severity | `java.util.logging` | Log4j 1.2 | Log4j 2 | Logback |
//! |----------|---------------------|-----------|---------|---------|
//! | `Trace`  | `FINEST` and below  | `TRACE` and below | `TRACE`, `ALL` | `TRACE`, `ALL` |
//! | `Debug`  | `FINER`             | `DEBUG`   | `DEBUG` | `DEBUG` |
//! | `Debug2` | `FINE`              |           |         |         |
//! | `Debug3` | `CONFIG`            |           |         |         |
//! | `Info`   | `INFO`              | `INFO`    | `INFO`  | `INFO`  |
//! | `Warn`   | `WARNING`           | `WARN`    | `WARN`  | `WARN`  |
//! | `Error`  | `SEVERE`            | `ERROR`   | `ERROR` | `ERROR` |
//! | `Fatal`  | above `SEVERE`      | above `ERROR` | `FATAL` |     |
//!
//! ## Feature Flags
//!
//! - `spec_unstable_logs_enabled`: ask the logger whether a severity is
//!   enabled before mapping the event.
//! - `internal-logs` (default): report internal failures through the
//!   OpenTelemetry internal logging macros.
pub mod attributes;
mod bridge;
pub mod config;
pub mod emitter;
pub mod event;
pub mod frameworks;
pub mod keys;
mod record;
pub mod severity;

pub use attributes::{AttributeMap, EventMapper};
pub use bridge::{AppenderBridge, AppenderBridgeBuilder, LOG_RECORD};
pub use config::{BridgeConfig, BridgeConfigBuilder};
pub use emitter::{RecordEmitter, ROOT_LOGGER_NAME};
pub use event::{CallerFrame, ContextData, LogEvent, MapMessage, Message, Throwable};
pub use frameworks::Framework;
pub use keys::KeyCache;
pub use record::StructuredRecord;
pub use severity::{Level, LevelOrder, SeverityLadder};

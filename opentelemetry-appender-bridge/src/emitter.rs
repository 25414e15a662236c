//! Hands [`StructuredRecord`]s to OpenTelemetry loggers.
use crate::record::StructuredRecord;
use opentelemetry::logs::{AnyValue, LogRecord, Logger, LoggerProvider, Severity};
use opentelemetry::otel_warn;
use opentelemetry::trace::{SpanContext, TraceContextExt};
use opentelemetry::Context;
use opentelemetry_instrumentation_api::cache::{BoundedCache, DEFAULT_CAPACITY};
use opentelemetry_instrumentation_api::fail_safe::catch_panic;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Logger name used for events of unnamed (root) loggers.
pub const ROOT_LOGGER_NAME: &str = "ROOT";

/// Emits records through one [`Logger`] per framework logger name.
///
/// Loggers are created on first use and memoized in a bounded cache. An
/// evicted logger is simply created again.
pub struct RecordEmitter<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    provider: P,
    loggers: BoundedCache<String, Arc<L>>,
}

impl<P, L> RecordEmitter<P, L>
where
    P: LoggerProvider<Logger = L> + Clone + Send + Sync,
    L: Logger + Send + Sync,
{
    /// Creates an emitter over `provider`.
    pub fn new(provider: &P) -> Self {
        RecordEmitter {
            provider: provider.clone(),
            loggers: BoundedCache::new(DEFAULT_CAPACITY),
        }
    }

    /// Whether the logger of `logger_name` accepts records of `severity`.
    ///
    /// Records without a severity are always accepted.
    #[cfg(feature = "spec_unstable_logs_enabled")]
    pub fn enabled(&self, logger_name: Option<&str>, severity: Option<Severity>) -> bool {
        let Some(severity) = severity else {
            return true;
        };
        let name = normalize_logger_name(logger_name);
        catch_panic(|| self.logger(name).event_enabled(severity, name, None)).unwrap_or(false)
    }

    /// Whether the logger of `logger_name` accepts records of `severity`.
    ///
    /// Always true unless the `spec_unstable_logs_enabled` feature is on.
    #[cfg(not(feature = "spec_unstable_logs_enabled"))]
    pub fn enabled(&self, _logger_name: Option<&str>, _severity: Option<Severity>) -> bool {
        true
    }

    /// Emits `record` through the logger of `logger_name`. Empty or absent
    /// names use [`ROOT_LOGGER_NAME`].
    ///
    /// Never panics: a failing logger is reported through internal logging
    /// and the record is dropped.
    pub fn emit(&self, record: StructuredRecord, logger_name: Option<&str>) {
        let name = normalize_logger_name(logger_name);
        if let Err(reason) = catch_panic(|| self.emit_to(name, record)) {
            otel_warn!(
                name: "AppenderBridge.EmitPanicked",
                logger_name = name,
                reason = reason.as_str(),
            );
        }
    }

    /// Number of memoized loggers.
    pub fn cached_loggers(&self) -> usize {
        self.loggers.len()
    }

    fn emit_to(&self, name: &str, record: StructuredRecord) {
        let logger = self.logger(name);
        let mut log_record = logger.create_log_record();

        if let Some(body) = record.body {
            log_record.set_body(AnyValue::from(body));
        }
        log_record.set_timestamp(record.timestamp.unwrap_or_else(SystemTime::now));
        if let Some(severity) = record.severity {
            log_record.set_severity_number(severity);
        }
        if let Some(text) = record.severity_text {
            log_record.set_severity_text(text);
        }
        if !record.attributes.is_empty() {
            log_record.add_attributes(record.attributes);
        }

        let span_context = record
            .trace_context
            .filter(SpanContext::is_valid)
            .or_else(active_span_context);
        if let Some(span_context) = span_context {
            log_record.set_trace_context(
                span_context.trace_id(),
                span_context.span_id(),
                Some(span_context.trace_flags()),
            );
        }

        logger.emit(log_record);
    }

    fn logger(&self, name: &str) -> Arc<L> {
        self.loggers
            .get_or_insert_with(name, || Arc::new(self.provider.logger(name.to_string())))
    }
}

impl<P, L> fmt::Debug for RecordEmitter<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordEmitter")
            .field("cached_loggers", &self.loggers.len())
            .finish_non_exhaustive()
    }
}

/// Returns `name`, or [`ROOT_LOGGER_NAME`] when it is empty or absent.
pub fn normalize_logger_name(name: Option<&str>) -> &str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => ROOT_LOGGER_NAME,
    }
}

fn active_span_context() -> Option<SpanContext> {
    Context::map_current(|cx| {
        let span = cx.span();
        let span_context = span.span_context();
        span_context.is_valid().then(|| span_context.clone())
    })
}

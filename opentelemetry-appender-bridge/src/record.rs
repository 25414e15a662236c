use crate::attributes::AttributeMap;
use opentelemetry::logs::Severity;
use opentelemetry::trace::SpanContext;
use std::time::SystemTime;

/// A framework-neutral log record, ready to be handed to a [`Logger`].
///
/// [`Logger`]: opentelemetry::logs::Logger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRecord {
    /// The rendered message.
    pub body: Option<String>,
    /// Time of the event. Records without one are stamped at emission.
    pub timestamp: Option<SystemTime>,
    /// Canonical severity. `None` leaves the severity unset.
    pub severity: Option<Severity>,
    /// The framework's own label for the level.
    pub severity_text: Option<&'static str>,
    /// Record attributes.
    pub attributes: AttributeMap,
    /// Span to correlate with. `None` uses the span active at emission.
    pub trace_context: Option<SpanContext>,
}

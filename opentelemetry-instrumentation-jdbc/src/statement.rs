//! Hooks called by prepared statement wrappers.
use crate::side_table::{render, ParameterSideTable};
use crate::value::ParameterValue;
use opentelemetry::trace::get_active_span;
use opentelemetry::{otel_debug, otel_warn, KeyValue};
use opentelemetry_instrumentation_api::call_depth::{CallDepth, CallDepthKind};
use opentelemetry_instrumentation_api::fail_safe::catch_panic;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call depth kind of parameter setters. A setter that delegates to another
/// setter of the same statement records its value once.
pub const PARAMETER_BIND: CallDepthKind = "opentelemetry.jdbc.parameter-bind";

/// Span attribute holding the rendered parameter list.
pub const DB_STATEMENT_VALUES: &str = "db.statement.values";

static NEXT_STATEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a live prepared statement.
///
/// Two statements with the same SQL text are still different statements:
/// allocate one id per statement object and keep it for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(u64);

impl StatementId {
    /// Allocates a new, process-unique id.
    pub fn next() -> Self {
        StatementId(NEXT_STATEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "statement-{}", self.0)
    }
}

/// Records bound parameters and attaches them to the span active when the
/// statement executes.
#[derive(Debug, Default)]
pub struct StatementInstrumentation {
    side_table: ParameterSideTable,
}

impl StatementInstrumentation {
    /// Creates an instrumentation tracking up to 100 live statements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instrumentation over `side_table`.
    pub fn with_side_table(side_table: ParameterSideTable) -> Self {
        StatementInstrumentation { side_table }
    }

    /// The table of pending parameters.
    pub fn side_table(&self) -> &ParameterSideTable {
        &self.side_table
    }

    /// Records a parameter bind. Position 0 is not a valid parameter
    /// position and is ignored.
    pub fn on_bind(&self, statement: StatementId, index: u32, value: impl Into<ParameterValue>) {
        self.bind_with(statement, index, value, || ());
    }

    /// Records a parameter bind, then runs the setter `body`. Binds made by
    /// `body` on this thread are not recorded again.
    pub fn bind_with<R>(
        &self,
        statement: StatementId,
        index: u32,
        value: impl Into<ParameterValue>,
        body: impl FnOnce() -> R,
    ) -> R {
        let guard = CallDepth::enter(PARAMETER_BIND);
        if guard.is_outermost() {
            self.record(statement, index, value.into());
        }
        body()
    }

    /// Consumes the parameters of `statement`. When a valid span is active
    /// and parameters were bound, attaches them to it as
    /// [`DB_STATEMENT_VALUES`] and returns the rendered list.
    ///
    /// The pending parameters are dropped in every case.
    pub fn on_execute(&self, statement: StatementId) -> Option<String> {
        let parameters = self.side_table.take(statement)?;
        if parameters.is_empty() {
            return None;
        }
        let rendered = render(&parameters);
        let attached = catch_panic(|| {
            get_active_span(|span| {
                if !span.span_context().is_valid() {
                    return false;
                }
                span.set_attribute(KeyValue::new(DB_STATEMENT_VALUES, rendered.clone()));
                true
            })
        });
        match attached {
            Ok(true) => Some(rendered),
            Ok(false) => None,
            Err(reason) => {
                otel_warn!(
                    name: "StatementInstrumentation.ExecutePanicked",
                    statement = statement.to_string(),
                    reason = reason.as_str(),
                );
                None
            }
        }
    }

    fn record(&self, statement: StatementId, index: u32, value: ParameterValue) {
        if index == 0 {
            otel_debug!(
                name: "ParameterSideTable.InvalidIndex",
                statement = statement.to_string(),
            );
            return;
        }
        self.side_table.put(statement, index, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_instrumentation_api::call_depth;

    #[test]
    fn statement_ids_are_unique() {
        let a = StatementId::next();
        let b = StatementId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn index_zero_is_ignored() {
        let instrumentation = StatementInstrumentation::new();
        let statement = StatementId::next();
        instrumentation.on_bind(statement, 0, "x");
        assert!(instrumentation.side_table().get(statement).is_none());
    }

    #[test]
    fn delegating_setter_records_once() {
        let instrumentation = StatementInstrumentation::new();
        let statement = StatementId::next();

        // setObject(1, 42) delegating to setInt(1, 42), which delegates to setLong.
        instrumentation.bind_with(statement, 1, ParameterValue::Other("42".into()), || {
            instrumentation.bind_with(statement, 1, 42, || {
                instrumentation.on_bind(statement, 1, 42_i64);
            })
        });

        let parameters = instrumentation.side_table().get(statement).unwrap();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[&1], ParameterValue::Other("42".into()));
        assert_eq!(call_depth::current(PARAMETER_BIND), 0);
    }

    #[test]
    fn execute_without_span_clears_entry() {
        let instrumentation = StatementInstrumentation::new();
        let statement = StatementId::next();
        instrumentation.on_bind(statement, 1, "x");

        assert_eq!(instrumentation.on_execute(statement), None);
        assert!(instrumentation.side_table().get(statement).is_none());
    }

    #[test]
    fn execute_without_binds_is_a_no_op() {
        let instrumentation = StatementInstrumentation::new();
        assert_eq!(instrumentation.on_execute(StatementId::next()), None);
    }
}

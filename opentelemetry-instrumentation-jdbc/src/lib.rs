//! # OpenTelemetry JDBC Parameter Instrumentation
//!
//! Captures the values bound to prepared statement parameters and attaches
//! them, rendered as one string, to the span active when the statement runs.
//!
//! A statement wrapper calls [`StatementInstrumentation::on_bind`] (or
//! [`StatementInstrumentation::bind_with`] around its setter) for every
//! parameter, and [`StatementInstrumentation::on_execute`] before running the
//! statement:
//!
//! ```
//! use opentelemetry_instrumentation_jdbc::{StatementId, StatementInstrumentation};
//!
//! let instrumentation = StatementInstrumentation::new();
//! let statement = StatementId::next();
//!
//! instrumentation.on_bind(statement, 1, "alice");
//! instrumentation.on_bind(statement, 2, 42);
//!
//! // Without an active span nothing is attached, but the pending values are
//! // still released.
//! assert_eq!(instrumentation.on_execute(statement), None);
//! assert!(instrumentation.side_table().is_empty());
//! ```
//!
//! The rendered list orders values by position, single-quotes text and uses
//! the display form of everything else, e.g. `[42,'alice',true]`.
pub mod side_table;
pub mod statement;
pub mod value;

pub use side_table::{render, BoundParameters, ParameterSideTable};
pub use statement::{StatementId, StatementInstrumentation, DB_STATEMENT_VALUES, PARAMETER_BIND};
pub use value::ParameterValue;

//! # OpenTelemetry Instrumentation API
//!
//! Building blocks shared by the OpenTelemetry logging bridges and the
//! database instrumentation in this workspace:
//!
//! - [`call_depth`]: per-thread, per-kind call depth guards that keep nested
//!   instrumented calls from producing duplicate telemetry.
//! - [`cache`]: a size-bounded, thread-safe LRU map.
//! - [`thread`]: numeric ids and names of capturing threads.
//! - [`config`]: settings read once from the environment.
//! - [`fail_safe`]: the panic boundary around telemetry sinks.
//!
//! Nothing in this crate spawns threads or blocks: every operation runs inline
//! on the calling application thread.
pub mod cache;
pub mod call_depth;
pub mod config;
pub mod error;
pub mod fail_safe;
pub mod thread;

pub use cache::BoundedCache;
pub use call_depth::{CallDepth, CallDepthKind};
pub use error::ConfigError;
pub use thread::ThreadInfo;

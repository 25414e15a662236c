//! Per-thread call depth tracking.
//!
//! Instrumented entry points frequently call into each other: a logging facade
//! hands its event to a second framework that is captured as well, or a
//! high-level statement setter delegates to a lower-level one on the same
//! statement. Only the outermost call may produce telemetry. A [`CallDepth`]
//! guard counts how many instrumented calls of one [`CallDepthKind`] are on the
//! current thread's stack and releases its slot when dropped, including during
//! unwinding.
//!
//! ```
//! use opentelemetry_instrumentation_api::call_depth::{self, CallDepth};
//!
//! const KIND: call_depth::CallDepthKind = "example";
//!
//! fn instrumented(nested: bool) -> usize {
//!     let guard = CallDepth::enter(KIND);
//!     let mut emitted = usize::from(guard.is_outermost());
//!     if nested {
//!         emitted += instrumented(false);
//!     }
//!     emitted
//! }
//!
//! assert_eq!(instrumented(true), 1);
//! assert_eq!(call_depth::current(KIND), 0);
//! ```
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Logical tag naming an independent call depth counter.
///
/// Counters are keyed by tag rather than by type so that unrelated
/// instrumentations sharing a thread never interfere with each other.
pub type CallDepthKind = &'static str;

thread_local! {
    static CALL_DEPTHS: RefCell<HashMap<CallDepthKind, usize>> = RefCell::new(HashMap::new());
}

/// Increments the counter of `kind` on the current thread and returns the
/// depth observed before the increment.
///
/// Every call must be paired with exactly one [`decrement`]. Prefer
/// [`CallDepth::enter`], which pairs them automatically.
pub fn increment(kind: CallDepthKind) -> usize {
    CALL_DEPTHS
        .try_with(|depths| {
            let mut depths = depths.borrow_mut();
            let depth = depths.entry(kind).or_insert(0);
            let before = *depth;
            *depth += 1;
            before
        })
        // Thread-local storage is gone during thread teardown; report a nested
        // call so nothing is captured from destructors.
        .unwrap_or(1)
}

/// Decrements the counter of `kind` on the current thread and returns the
/// remaining depth. The counter saturates at zero.
pub fn decrement(kind: CallDepthKind) -> usize {
    CALL_DEPTHS
        .try_with(|depths| {
            let mut depths = depths.borrow_mut();
            match depths.get_mut(kind) {
                Some(depth) if *depth > 1 => {
                    *depth -= 1;
                    *depth
                }
                Some(_) => {
                    depths.remove(kind);
                    0
                }
                None => 0,
            }
        })
        .unwrap_or(0)
}

/// Returns the current depth of `kind` on this thread.
pub fn current(kind: CallDepthKind) -> usize {
    CALL_DEPTHS
        .try_with(|depths| depths.borrow().get(kind).copied().unwrap_or(0))
        .unwrap_or(0)
}

/// A scoped slot in a per-thread call depth counter.
///
/// Created by [`CallDepth::enter`]; dropping it releases the slot.
#[derive(Debug)]
#[must_use = "dropping the guard immediately releases the call depth slot"]
pub struct CallDepth {
    kind: CallDepthKind,
    depth: usize,
    // Ensure this type is !Send as it relies on thread locals
    _marker: PhantomData<*const ()>,
}

impl CallDepth {
    /// Enters one level of `kind` on the current thread.
    pub fn enter(kind: CallDepthKind) -> Self {
        CallDepth {
            kind,
            depth: increment(kind),
            _marker: PhantomData,
        }
    }

    /// The depth observed before this guard was entered.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this guard belongs to the outermost instrumented call.
    pub fn is_outermost(&self) -> bool {
        self.depth == 0
    }

    /// The counter this guard belongs to.
    pub fn kind(&self) -> CallDepthKind {
        self.kind
    }
}

impl Drop for CallDepth {
    fn drop(&mut self) {
        decrement(self.kind);
    }
}

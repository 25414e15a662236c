//! Identity of the thread an event was captured on.
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Returns a process-unique, non-zero numeric id for the current thread.
///
/// Ids are assigned lazily in the order threads first ask for one and are
/// never reused.
pub fn current_thread_id() -> u64 {
    THREAD_ID.try_with(|id| *id).unwrap_or(0)
}

/// Name and numeric id of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreadInfo {
    /// Thread name, if the thread has one.
    pub name: Option<String>,
    /// Numeric thread id, if known.
    pub id: Option<u64>,
}

impl ThreadInfo {
    /// Describes the calling thread.
    pub fn current() -> Self {
        ThreadInfo {
            name: std::thread::current().name().map(str::to_owned),
            id: Some(current_thread_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn ids_are_stable_per_thread_and_distinct_across_threads() {
        let here = current_thread_id();
        assert_ne!(here, 0);
        assert_eq!(here, current_thread_id());
        let there = thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn current_reports_thread_name() {
        let info = thread::Builder::new()
            .name("worker-7".into())
            .spawn(ThreadInfo::current)
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(info.name.as_deref(), Some("worker-7"));
        assert!(info.id.is_some());
    }
}

//! Attribute keys written by the bridge.
use opentelemetry::Key;
use opentelemetry_instrumentation_api::cache::{BoundedCache, DEFAULT_CAPACITY};
use std::sync::Arc;

pub use opentelemetry_semantic_conventions::attribute::{
    EXCEPTION_MESSAGE, EXCEPTION_STACKTRACE, EXCEPTION_TYPE, THREAD_ID, THREAD_NAME,
};

/// Source file of the logging call site.
pub const CODE_FILEPATH: &str = "code.filepath";
/// Class or module of the logging call site.
pub const CODE_NAMESPACE: &str = "code.namespace";
/// Function of the logging call site.
pub const CODE_FUNCTION: &str = "code.function";
/// Line of the logging call site.
pub const CODE_LINENO: &str = "code.lineno";

/// Map message entry promoted to the body when the message has no format.
pub(crate) const SPECIAL_MAP_MESSAGE_ATTRIBUTE: &str = "message";

/// Memoizes `namespace + "." + raw` as an attribute [`Key`].
///
/// Results are identical to building the key on every call; the cache only
/// saves the allocation on hot paths. Keys are reference counted, so a hit
/// costs one atomic increment. Safe to share between threads: a race between
/// two misses computes the same key twice, which is harmless.
#[derive(Debug)]
pub struct KeyCache {
    namespace: Option<&'static str>,
    keys: BoundedCache<String, Key>,
}

impl KeyCache {
    /// Creates a cache prefixing keys with `namespace`.
    pub fn new(namespace: &'static str) -> Self {
        Self::with_capacity(Some(namespace), DEFAULT_CAPACITY)
    }

    /// Creates a cache that keeps raw keys as they are.
    pub fn verbatim() -> Self {
        Self::with_capacity(None, 0)
    }

    /// Creates a cache holding at most `capacity` keys.
    pub fn with_capacity(namespace: Option<&'static str>, capacity: usize) -> Self {
        KeyCache {
            namespace,
            keys: BoundedCache::new(capacity),
        }
    }

    /// The namespace prepended to raw keys, if any.
    pub fn namespace(&self) -> Option<&'static str> {
        self.namespace
    }

    /// Returns the namespaced attribute key for `raw`.
    pub fn namespaced_key(&self, raw: &str) -> Key {
        match self.namespace {
            Some(namespace) => self
                .keys
                .get_or_insert_with(raw, || Self::compute(namespace, raw)),
            None => Key::from(raw.to_string()),
        }
    }

    fn compute(namespace: &str, raw: &str) -> Key {
        let mut key = String::with_capacity(namespace.len() + 1 + raw.len());
        key.push_str(namespace);
        key.push('.');
        key.push_str(raw);
        Key::from(Arc::<str>::from(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_raw_keys() {
        let cache = KeyCache::new("log4j.mdc");
        assert_eq!(cache.namespaced_key("foo").as_str(), "log4j.mdc.foo");
        assert_eq!(cache.namespace(), Some("log4j.mdc"));
    }

    #[test]
    fn repeated_lookups_return_identical_keys() {
        let cache = KeyCache::new("logback.mdc");
        let first = cache.namespaced_key("requestId");
        let second = cache.namespaced_key("requestId");
        assert_eq!(first, second);
    }

    #[test]
    fn eviction_does_not_change_results() {
        let cache = KeyCache::with_capacity(Some("ns"), 2);
        let expected: Vec<String> = (0..10).map(|i| format!("ns.k{i}")).collect();
        for round in 0..3 {
            for (i, want) in expected.iter().enumerate() {
                let key = cache.namespaced_key(&format!("k{i}"));
                assert_eq!(key.as_str(), want, "round {round}");
            }
        }
    }

    #[test]
    fn verbatim_keeps_raw_key() {
        let cache = KeyCache::verbatim();
        assert_eq!(cache.namespaced_key("tenant").as_str(), "tenant");
        assert_eq!(cache.namespace(), None);
    }
}

//! Bound parameters of live prepared statements.
use crate::statement::StatementId;
use crate::value::ParameterValue;
use opentelemetry_instrumentation_api::cache::{BoundedCache, DEFAULT_CAPACITY};
use std::collections::BTreeMap;

/// Parameters of one statement, ordered by their 1-based position.
pub type BoundParameters = BTreeMap<u32, ParameterValue>;

/// Size-bounded map from statement to the parameters bound so far.
///
/// Entries are created on the first bind of a statement and removed when the
/// statement executes. When more statements are live than the table holds,
/// the least recently used statement loses its pending parameters: capture is
/// best effort and never affects the statement itself.
#[derive(Debug)]
pub struct ParameterSideTable {
    statements: BoundedCache<StatementId, BoundParameters>,
}

impl Default for ParameterSideTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSideTable {
    /// Creates a table tracking up to 100 statements.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a table tracking up to `capacity` statements.
    pub fn with_capacity(capacity: usize) -> Self {
        ParameterSideTable {
            statements: BoundedCache::new(capacity),
        }
    }

    /// Records `value` at `index` for `statement`, replacing any value bound
    /// there before.
    pub fn put(&self, statement: StatementId, index: u32, value: ParameterValue) {
        self.statements.update(statement, |parameters| {
            parameters.insert(index, value);
        });
    }

    /// Returns a copy of the parameters bound to `statement`.
    pub fn get(&self, statement: StatementId) -> Option<BoundParameters> {
        self.statements.get(&statement)
    }

    /// Removes and returns the parameters bound to `statement`.
    pub fn take(&self, statement: StatementId) -> Option<BoundParameters> {
        self.statements.remove(&statement)
    }

    /// Forgets the parameters bound to `statement`.
    pub fn clear(&self, statement: StatementId) {
        self.statements.remove(&statement);
    }

    /// Number of statements with pending parameters.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether no statement has pending parameters.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Maximum number of statements tracked at once.
    pub fn capacity(&self) -> usize {
        self.statements.capacity()
    }
}

/// Renders parameters as `[v1,v2,...]` in ascending position order. Text
/// values are single-quoted; everything else uses its display form.
pub fn render(parameters: &BoundParameters) -> String {
    let mut out = String::with_capacity(2 + parameters.len() * 8);
    out.push('[');
    for (i, value) in parameters.values().enumerate() {
        if i > 0 {
            out.push(',');
        }
        value.write_rendered(&mut out);
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn renders_in_index_order() {
        let table = ParameterSideTable::new();
        let statement = StatementId::next();
        table.put(statement, 2, "x".into());
        table.put(statement, 1, 5.into());
        table.put(statement, 3, true.into());

        let parameters = table.get(statement).unwrap();
        assert_eq!(render(&parameters), "[5,'x',true]");
    }

    #[test]
    fn rebinding_replaces_value() {
        let table = ParameterSideTable::new();
        let statement = StatementId::next();
        table.put(statement, 1, "old".into());
        table.put(statement, 1, "new".into());
        assert_eq!(render(&table.get(statement).unwrap()), "['new']");
    }

    #[test]
    fn statements_are_independent() {
        let table = ParameterSideTable::new();
        let first = StatementId::next();
        let second = StatementId::next();
        table.put(first, 1, 1.into());
        table.put(second, 1, 2.into());
        assert_eq!(table.len(), 2);

        table.clear(first);
        assert!(table.get(first).is_none());
        assert_eq!(render(&table.get(second).unwrap()), "[2]");
    }

    #[test]
    fn take_removes_entry() {
        let table = ParameterSideTable::new();
        let statement = StatementId::next();
        table.put(statement, 1, ParameterValue::Null);
        assert_eq!(render(&table.take(statement).unwrap()), "[null]");
        assert!(table.take(statement).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn least_recently_used_statement_is_dropped() {
        let table = ParameterSideTable::with_capacity(2);
        let statements: Vec<StatementId> = (0..3).map(|_| StatementId::next()).collect();
        for statement in &statements {
            table.put(*statement, 1, 1.into());
        }
        assert_eq!(table.len(), 2);
        assert!(table.get(statements[0]).is_none());
        assert!(table.get(statements[2]).is_some());
    }

    #[test]
    fn empty_list_renders_brackets() {
        assert_eq!(render(&BoundParameters::new()), "[]");
    }

    #[test]
    fn concurrent_binds_on_distinct_statements() {
        let table = Arc::new(ParameterSideTable::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    let statement = StatementId::next();
                    for index in 1..=10_u32 {
                        table.put(statement, index, index.into());
                    }
                    table.take(statement).map(|p| p.len())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(10));
        }
        assert!(table.is_empty());
    }
}

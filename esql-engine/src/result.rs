//! Result shape (C7): the engine's final, ordered output rows.

use esql_core::Value;

/// One output row: an ordered mapping from output column name (a grouping
/// column or an aggregate's canonical key) to its value, or `None` if the
/// aggregate is absent for this row (`spec.md` §6, §4.4 Phase 3).
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    values: Vec<(String, Option<Value>)>,
}

impl ResultRow {
    /// Builds a result row from its ordered `(name, value)` pairs.
    pub fn new(values: Vec<(String, Option<Value>)>) -> Self {
        Self { values }
    }

    /// The row's fields in output order.
    pub fn values(&self) -> &[(String, Option<Value>)] {
        &self.values
    }

    /// Looks up a field's value by its output column name.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

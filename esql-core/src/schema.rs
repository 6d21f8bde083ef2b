use std::collections::HashMap;

use crate::value::{LogicalType, Value};

/// An ordered table schema: `(column_name, logical_type)` pairs plus a
/// case-insensitive name-to-index map built once at construction.
///
/// `spec.md` §3: "Column names are unique, case-insensitive for lookup but
/// preserve the original casing for output."
#[derive(Clone, Debug)]
pub struct Schema {
    columns: Vec<(String, LogicalType)>,
    index_by_lower_name: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from an ordered list of `(name, type)` pairs.
    ///
    /// Column name casing is preserved for output; lookups are folded to
    /// lowercase.
    pub fn new(columns: Vec<(String, LogicalType)>) -> Self {
        let index_by_lower_name = columns
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.to_lowercase(), i))
            .collect();
        Self {
            columns,
            index_by_lower_name,
        }
    }

    /// The columns in declaration order.
    pub fn columns(&self) -> &[(String, LogicalType)] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolves a column name (case-insensitively) to its positional index.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_lower_name.get(&name.to_lowercase()).copied()
    }

    /// Resolves a column name to its declared logical type.
    pub fn type_of(&self, name: &str) -> Option<LogicalType> {
        self.index_of(name).map(|i| self.columns[i].1)
    }

    /// Returns the column's name with its originally declared casing.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.columns[i].0.as_str())
    }
}

/// A single row: values positionally aligned with a [`Schema`].
#[derive(Clone, Debug, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    /// Wraps a vector of values as a row.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// The row's values in schema column order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Looks up a value by column name through the given schema.
    pub fn get<'a>(&'a self, schema: &Schema, name: &str) -> Option<&'a Value> {
        schema.index_of(name).and_then(|i| self.0.get(i))
    }

    /// Looks up a value by positional column index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

//! # esql
//!
//! The ESQL facade: a thin [`run_query`] entry point that wires the lexer,
//! parser/validator, and MF engine together against an on-disk
//! `.tables/<name>/` directory. The `esql` binary in `src/bin/` is a
//! demonstration CLI built on top of this, not part of the validated core.

#![deny(missing_docs)]
#![deny(unused_imports)]

use std::path::Path;

pub use esql_core::{AggDescriptor, AggFunction, BoolExpr, EsqlError, LogicalType, QueryPlan, Schema, Value};
pub use esql_engine::ResultRow;

/// The crate-wide result alias.
pub type Result<T> = core::result::Result<T, EsqlError>;

/// Parses, validates, and runs `query` against `.tables/` rooted at
/// `tables_dir`, returning the final ordered result rows.
///
/// This loads the table named in the query's `FROM` clause twice over: once
/// (by name only) to read its schema before the query can be validated, and
/// implicitly again when `esql_parser::parse` re-splits the clauses to
/// build the full plan. Both passes are cheap relative to scanning rows.
pub fn run_query(query: &str, tables_dir: &Path) -> Result<Vec<ResultRow>> {
    let table_name = esql_parser::table_name(query)?;
    let (schema, rows) = esql_engine::load_table(tables_dir, &table_name)?;
    let plan = esql_parser::parse(query, &schema)?;
    esql_engine::execute(&plan, &schema, &rows)
}

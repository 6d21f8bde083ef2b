//! # esql-engine
//!
//! esql-engine is the table loader and MF (multi-feature) grouped-
//! aggregation engine: given a validated `QueryPlan` and the rows it reads
//! from `.tables/<name>/`, it produces the final, ordered result rows.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod accumulator;
mod eval;
mod mf;
mod result;
mod table;

/// Runs the MF engine: see [`mf::execute`].
pub use self::mf::execute;
/// Final, ordered output rows: see [`result::ResultRow`].
pub use self::result::ResultRow;
/// Loads a table's schema and rows from disk: see [`table::load_table`].
pub use self::table::load_table;

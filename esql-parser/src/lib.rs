//! # esql-parser
//!
//! esql-parser turns a clause-split query plus a known table [`Schema`] into
//! a fully validated [`QueryPlan`]: a recursive-descent boolean-expression
//! parser (`OR < AND < NOT`) for `WHERE`/`SUCH THAT`/`HAVING`, and the
//! semantic checks that make sure every column, group, and aggregate
//! reference in the query is meaningful before the engine ever runs.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod expr;
mod literal;
mod operand;
mod select;
mod token;
mod validate;

/// The validated output of parsing: see [`esql_core::QueryPlan`].
pub use esql_core::QueryPlan;
/// The table schema a query is validated against: see [`esql_core::Schema`].
pub use esql_core::Schema;
/// Parses and fully validates a query against a known schema.
pub use self::validate::parse;
/// Extracts a query's `FROM` table name without requiring a schema.
pub use self::validate::table_name;

//! # esql-core
//!
//! esql-core holds the shared types for ESQL: the typed value model,
//! the table schema, the validated query plan, and the error taxonomy
//! that every other `esql-*` crate builds on.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod error;
mod plan;
mod schema;
mod value;

pub use self::{
    error::EsqlError,
    plan::{
        AggDescriptor, AggFunction, AggKey, BoolExpr, CmpOp, Operand, QueryPlan,
    },
    schema::{Row, Schema},
    value::{LogicalType, Value},
};

/// Convenience alias for results produced anywhere in the ESQL pipeline.
pub type Result<T> = core::result::Result<T, EsqlError>;

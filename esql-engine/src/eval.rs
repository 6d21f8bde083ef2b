//! Pure evaluation of a [`BoolExpr`] tree against either a raw row
//! (`WHERE`/`SUCH THAT`) or an H-row's grouping key and accumulators
//! (`HAVING`).

use std::cmp::Ordering;

use esql_core::{AggKey, BoolExpr, CmpOp, Operand, Row, Schema, Value};
use indexmap::IndexMap;

use crate::accumulator::Accumulator;

fn compare(op: CmpOp, left: &Value, right: &Value) -> bool {
    match op {
        CmpOp::Eq => left == right,
        CmpOp::Ne => left != right,
        CmpOp::Lt => left.partial_cmp(right) == Some(Ordering::Less),
        CmpOp::Le => matches!(left.partial_cmp(right), Some(Ordering::Less | Ordering::Equal)),
        CmpOp::Gt => left.partial_cmp(right) == Some(Ordering::Greater),
        CmpOp::Ge => matches!(left.partial_cmp(right), Some(Ordering::Greater | Ordering::Equal)),
    }
}

/// Evaluates a `WHERE`/`SUCH THAT` tree against one input row. Leaves are
/// always plain column references by construction (`spec.md` §4.2).
pub fn eval_row(expr: &BoolExpr, schema: &Schema, row: &Row) -> bool {
    match expr {
        BoolExpr::And(children) => children.iter().all(|c| eval_row(c, schema, row)),
        BoolExpr::Or(children) => children.iter().any(|c| eval_row(c, schema, row)),
        BoolExpr::Not(child) => !eval_row(child, schema, row),
        BoolExpr::Compare { left, op, literal } => {
            let column = match left {
                Operand::Column(name) => name,
                Operand::Aggregate(_) => unreachable!("WHERE/SUCH THAT never reference aggregates"),
            };
            let value = row
                .get(schema, column)
                .expect("validator guarantees this column exists");
            compare(*op, value, literal)
        }
    }
}

/// Evaluates a `HAVING` tree against one H-row's grouping key and finalised
/// accumulators. An absent aggregate (no entry in `accumulators`) makes any
/// comparison evaluate to `false`, per `spec.md` §4.4 Phase 4.
pub fn eval_having(
    expr: &BoolExpr,
    select_columns: &[String],
    key: &[Value],
    accumulators: &IndexMap<AggKey, Accumulator>,
) -> bool {
    match expr {
        BoolExpr::And(children) => children
            .iter()
            .all(|c| eval_having(c, select_columns, key, accumulators)),
        BoolExpr::Or(children) => children
            .iter()
            .any(|c| eval_having(c, select_columns, key, accumulators)),
        BoolExpr::Not(child) => !eval_having(child, select_columns, key, accumulators),
        BoolExpr::Compare { left, op, literal } => match left {
            Operand::Column(name) => {
                let idx = select_columns
                    .iter()
                    .position(|c| c == name)
                    .expect("validator guarantees this is a grouping column");
                compare(*op, &key[idx], literal)
            }
            Operand::Aggregate(descriptor) => match accumulators.get(&descriptor.key()) {
                None => false,
                Some(acc) => compare(*op, &Value::number(acc.finalize()), literal),
            },
        },
    }
}

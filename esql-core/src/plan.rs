use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A comparison operator usable in a `Compare` leaf of a [`BoolExpr`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CmpOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        })
    }
}

/// One of the five aggregate functions ESQL supports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AggFunction {
    /// `sum`
    Sum,
    /// `avg`
    Avg,
    /// `min`
    Min,
    /// `max`
    Max,
    /// `count`
    Count,
}

impl AggFunction {
    /// Parses the lower-cased function name, if it names a known aggregate.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(AggFunction::Sum),
            "avg" => Some(AggFunction::Avg),
            "min" => Some(AggFunction::Min),
            "max" => Some(AggFunction::Max),
            "count" => Some(AggFunction::Count),
            _ => None,
        }
    }

    /// Whether this function requires a numeric operand column. Only
    /// `count` is exempt (`spec.md` §4.3).
    pub fn requires_numeric_column(self) -> bool {
        !matches!(self, AggFunction::Count)
    }
}

impl fmt::Display for AggFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggFunction::Sum => "sum",
            AggFunction::Avg => "avg",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Count => "count",
        })
    }
}

/// The canonical string key for an aggregate descriptor: `"{column}.{function}"`
/// for globals, `"{group}.{column}.{function}"` for group-specific
/// (`spec.md` §3). Used both as the output column name and as the H-row
/// accumulator lookup key.
pub type AggKey = String;

/// A single declared aggregate, either global or scoped to one `OVER` group.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AggDescriptor {
    /// An aggregate with no group, computed over all WHERE-filtered rows.
    Global {
        /// The target column.
        column: String,
        /// The aggregate function.
        function: AggFunction,
    },
    /// An aggregate scoped to one `OVER` group, computed only over rows
    /// satisfying that group's `SUCH THAT` clause.
    GroupScoped {
        /// The group identifier this aggregate is scoped to.
        group: String,
        /// The target column.
        column: String,
        /// The aggregate function.
        function: AggFunction,
    },
}

impl AggDescriptor {
    /// The canonical aggregate key, used as the output column name and the
    /// H-row accumulator map key.
    pub fn key(&self) -> AggKey {
        match self {
            AggDescriptor::Global { column, function } => format!("{column}.{function}"),
            AggDescriptor::GroupScoped {
                group,
                column,
                function,
            } => format!("{group}.{column}.{function}"),
        }
    }

    /// The target column this aggregate reads values from.
    pub fn column(&self) -> &str {
        match self {
            AggDescriptor::Global { column, .. } => column,
            AggDescriptor::GroupScoped { column, .. } => column,
        }
    }

    /// The aggregate function.
    pub fn function(&self) -> AggFunction {
        match self {
            AggDescriptor::Global { function, .. } => *function,
            AggDescriptor::GroupScoped { function, .. } => *function,
        }
    }

    /// The group this aggregate is scoped to, if any.
    pub fn group(&self) -> Option<&str> {
        match self {
            AggDescriptor::Global { .. } => None,
            AggDescriptor::GroupScoped { group, .. } => Some(group),
        }
    }
}

/// The left-hand operand of a `Compare` leaf: a plain column reference, or
/// (in a `HAVING` tree) a reference to a declared aggregate.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operand {
    /// A bare column name.
    Column(String),
    /// An aggregate reference, written in dot form in the source query.
    Aggregate(AggDescriptor),
}

/// A boolean expression tree used for `WHERE`, `SUCH THAT`, and `HAVING`
/// (`spec.md` §3).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoolExpr {
    /// All children must hold.
    And(Vec<BoolExpr>),
    /// At least one child must hold.
    Or(Vec<BoolExpr>),
    /// The child must not hold.
    Not(Box<BoolExpr>),
    /// A single comparison leaf.
    Compare {
        /// The left-hand operand.
        left: Operand,
        /// The comparison operator.
        op: CmpOp,
        /// The right-hand literal, already parsed to the operand's type.
        literal: Value,
    },
}

/// The fully validated output of the parser: an expression tree per boolean
/// clause plus descriptors for each aggregate (`spec.md` §3).
#[derive(Clone, Debug)]
pub struct QueryPlan {
    /// The table this query reads from.
    pub table_name: String,
    /// The ordered list of grouping column names.
    pub select_columns: Vec<String>,
    /// The ordered list of aggregate descriptors appearing in `SELECT`.
    pub select_aggregates: Vec<AggDescriptor>,
    /// The group identifiers declared in `OVER`, in declaration order.
    pub groups: Vec<String>,
    /// The optional `WHERE` expression tree over raw columns.
    pub where_expr: Option<BoolExpr>,
    /// `group_id -> boolean expression tree`, one entry per declared group.
    pub such_that_exprs: HashMap<String, BoolExpr>,
    /// The optional `HAVING` expression tree.
    pub having_expr: Option<BoolExpr>,
    /// `0 <= order_by_depth <= select_columns.len()`.
    pub order_by_depth: usize,
}

impl QueryPlan {
    /// The full set of aggregate descriptors referenced anywhere in the
    /// plan: the union of `SELECT` aggregates and `HAVING` aggregate leaves
    /// (`spec.md` §4.3).
    pub fn descriptor_set(&self) -> Vec<AggDescriptor> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for d in &self.select_aggregates {
            if seen.insert(d.key()) {
                out.push(d.clone());
            }
        }
        if let Some(having) = &self.having_expr {
            collect_aggregate_leaves(having, &mut seen, &mut out);
        }
        out
    }
}

fn collect_aggregate_leaves(
    expr: &BoolExpr,
    seen: &mut std::collections::HashSet<AggKey>,
    out: &mut Vec<AggDescriptor>,
) {
    match expr {
        BoolExpr::And(children) | BoolExpr::Or(children) => {
            for child in children {
                collect_aggregate_leaves(child, seen, out);
            }
        }
        BoolExpr::Not(child) => collect_aggregate_leaves(child, seen, out),
        BoolExpr::Compare { left, .. } => {
            if let Operand::Aggregate(descriptor) = left {
                if seen.insert(descriptor.key()) {
                    out.push(descriptor.clone());
                }
            }
        }
    }
}

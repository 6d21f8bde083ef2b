use core::fmt;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The logical type of a schema column.
///
/// `spec.md` §3: every column has exactly one of these four types. `Number`
/// is 64-bit float semantics with the usual arithmetic comparisons; `String`
/// and `Boolean` admit only equality; `Date` and `Number` admit ordering.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogicalType {
    /// 64-bit float semantics.
    Number,
    /// UTF-8 text, compared only by equality.
    String,
    /// A calendar day, ISO `YYYY-MM-DD`.
    Date,
    /// A boolean.
    Boolean,
}

impl LogicalType {
    /// Whether values of this type admit `<`, `<=`, `>`, `>=` in addition to
    /// `=`/`!=`.
    pub fn admits_ordering(self) -> bool {
        matches!(self, LogicalType::Number | LogicalType::Date)
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalType::Number => "number",
            LogicalType::String => "string",
            LogicalType::Date => "date",
            LogicalType::Boolean => "boolean",
        })
    }
}

/// A typed value stored in a row or produced as a literal.
///
/// Numbers carry an [`OrderedFloat`] rather than a bare `f64` so that a
/// tuple of `Value`s can be used as a grouping key (`spec.md` §3's H-row):
/// `f64` alone is not `Eq`/`Hash`, and the spec requires an ordered tuple
/// key, not a value set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A number, compared and ordered as an IEEE-754 double.
    Number(OrderedFloat<f64>),
    /// UTF-8 text.
    Str(String),
    /// A calendar day.
    Date(NaiveDate),
    /// A boolean.
    Boolean(bool),
}

impl Value {
    /// Returns this value's logical type.
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Value::Number(_) => LogicalType::Number,
            Value::Str(_) => LogicalType::String,
            Value::Date(_) => LogicalType::Date,
            Value::Boolean(_) => LogicalType::Boolean,
        }
    }

    /// Returns the underlying number, if this value is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.0),
            _ => None,
        }
    }

    /// Convenience constructor for a number value.
    pub fn number(n: f64) -> Self {
        Value::Number(OrderedFloat(n))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n.0),
            Value::Str(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Ordering for `ORDER BY` tuple comparison (`spec.md` §4.4 Phase 6), which
/// sorts a grouping column of any logical type. This is deliberately wider
/// than [`LogicalType::admits_ordering`], which only gates the `<`/`<=`/`>`/
/// `>=` comparison *operators* available inside `WHERE`/`SUCH THAT`/`HAVING`
/// expressions — string and boolean columns still sort, they just can't be
/// range-compared in a predicate.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

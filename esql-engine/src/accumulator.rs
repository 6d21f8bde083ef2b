//! Tagged aggregate accumulator (`spec.md` §9's redesign note, §4.4).
//!
//! One variant per aggregate function, rather than a runtime-typed
//! scalar/`(sum, count)` switch. The *Uninitialised* state in `spec.md`'s
//! accumulator state machine is represented by the absence of an entry in
//! an [`crate::mf::HRow`]'s accumulator map, not by a variant here: an
//! `Accumulator` only exists once it has seen at least one row.

use esql_core::AggFunction;

/// A single aggregate's running state, already *Active* (first update applied).
#[derive(Clone, Debug)]
pub enum Accumulator {
    /// Running sum.
    Sum(f64),
    /// Running count of rows touching this aggregate.
    Count(u64),
    /// Running minimum.
    Min(f64),
    /// Running maximum.
    Max(f64),
    /// Running `(sum, count)` pair, collapsed to a scalar at finalisation.
    Avg {
        /// Running sum.
        sum: f64,
        /// Running count.
        count: u64,
    },
}

impl Accumulator {
    /// Initialises an accumulator from the first row it sees. `value` is the
    /// target column's numeric value; `count` ignores it entirely.
    pub fn new(function: AggFunction, value: Option<f64>) -> Self {
        match function {
            AggFunction::Sum => Accumulator::Sum(value.unwrap_or(0.0)),
            AggFunction::Count => Accumulator::Count(1),
            AggFunction::Min => Accumulator::Min(value.unwrap_or(0.0)),
            AggFunction::Max => Accumulator::Max(value.unwrap_or(0.0)),
            AggFunction::Avg => Accumulator::Avg {
                sum: value.unwrap_or(0.0),
                count: 1,
            },
        }
    }

    /// Folds in one more row's value.
    pub fn update(&mut self, value: Option<f64>) {
        match self {
            Accumulator::Sum(s) => *s += value.unwrap_or(0.0),
            Accumulator::Count(c) => *c += 1,
            Accumulator::Min(m) => {
                if let Some(v) = value {
                    if v < *m {
                        *m = v;
                    }
                }
            }
            Accumulator::Max(m) => {
                if let Some(v) = value {
                    if v > *m {
                        *m = v;
                    }
                }
            }
            Accumulator::Avg { sum, count } => {
                if let Some(v) = value {
                    *sum += v;
                }
                *count += 1;
            }
        }
    }

    /// The displayed value. `avg` rounds `sum / count` to two decimals; all
    /// other functions return their running value verbatim. An existing
    /// accumulator always has `count >= 1`, so this never needs to represent
    /// *absent* — absence is the caller's responsibility to check before
    /// looking the accumulator up at all.
    pub fn finalize(&self) -> f64 {
        match self {
            Accumulator::Sum(s) => *s,
            Accumulator::Count(c) => *c as f64,
            Accumulator::Min(m) => *m,
            Accumulator::Max(m) => *m,
            Accumulator::Avg { sum, count } => ((sum / *count as f64) * 100.0).round() / 100.0,
        }
    }
}

//! The MF (multi-feature) grouped-aggregation engine (`spec.md` §4.4).
//!
//! Six phases: `WHERE` filter, a global build pass, one filtered pass per
//! declared group, `avg` finalisation, `HAVING` filter, projection, and a
//! stable `ORDER BY`.

use indexmap::IndexMap;
use log::{debug, warn};

use esql_core::{AggKey, EsqlError, QueryPlan, Row, Schema, Value};

use crate::accumulator::Accumulator;
use crate::eval::{eval_having, eval_row};
use crate::result::ResultRow;

/// One entry in the grouping hash table: the grouping-column values that
/// define this group, plus its aggregate accumulators keyed by canonical
/// [`AggKey`]. Insertion-ordered so two runs over the same input produce
/// byte-identical output when `ORDER BY` is absent (`spec.md` §5).
pub struct HRow {
    key: Vec<Value>,
    accumulators: IndexMap<AggKey, Accumulator>,
}

impl HRow {
    fn new(key: Vec<Value>) -> Self {
        Self {
            key,
            accumulators: IndexMap::new(),
        }
    }

    fn touch(&mut self, agg_key: AggKey, function: esql_core::AggFunction, value: Option<f64>) {
        match self.accumulators.get_mut(&agg_key) {
            Some(acc) => acc.update(value),
            None => {
                self.accumulators.insert(agg_key, Accumulator::new(function, value));
            }
        }
    }
}

fn grouping_key(plan: &QueryPlan, schema: &Schema, row: &Row) -> Vec<Value> {
    plan.select_columns
        .iter()
        .map(|c| {
            row.get(schema, c)
                .cloned()
                .expect("validator guarantees every select column exists")
        })
        .collect()
}

fn numeric_value(schema: &Schema, row: &Row, column: &str) -> Option<f64> {
    row.get(schema, column).and_then(Value::as_number)
}

/// Runs the full pipeline, producing the final ordered result rows.
pub fn execute(plan: &QueryPlan, schema: &Schema, rows: &[Row]) -> Result<Vec<ResultRow>, EsqlError> {
    debug!("phase 0: WHERE filter over {} rows", rows.len());
    let filtered: Vec<&Row> = match &plan.where_expr {
        Some(expr) => rows.iter().filter(|row| eval_row(expr, schema, row)).collect(),
        None => rows.iter().collect(),
    };
    debug!("phase 0 done: {} rows retained", filtered.len());

    let descriptors = plan.descriptor_set();
    let global_descriptors: Vec<_> = descriptors.iter().filter(|d| d.group().is_none()).collect();

    debug!("phase 1: global build pass");
    let mut table: IndexMap<Vec<Value>, HRow> = IndexMap::new();
    for row in &filtered {
        let key = grouping_key(plan, schema, row);
        let hrow = table.entry(key.clone()).or_insert_with(|| HRow::new(key));
        for descriptor in &global_descriptors {
            let value = numeric_value(schema, row, descriptor.column());
            hrow.touch(descriptor.key(), descriptor.function(), value);
        }
    }
    debug!("phase 1 done: {} H-rows", table.len());

    debug!("phase 2: group passes over {} groups", plan.groups.len());
    for group in &plan.groups {
        let such_that = plan
            .such_that_exprs
            .get(group)
            .expect("validator guarantees every group has a SUCH THAT clause");
        let group_descriptors: Vec<_> = descriptors
            .iter()
            .filter(|d| d.group() == Some(group.as_str()))
            .collect();

        let mut matched = 0usize;
        for row in &filtered {
            if !eval_row(such_that, schema, row) {
                continue;
            }
            matched += 1;
            let key = grouping_key(plan, schema, row);
            let hrow = table
                .get_mut(&key)
                .expect("phase 1 and phase 2 scan identical row sets");
            for descriptor in &group_descriptors {
                let value = numeric_value(schema, row, descriptor.column());
                hrow.touch(descriptor.key(), descriptor.function(), value);
            }
        }
        if matched == 0 {
            warn!("group '{group}' matched zero rows; its aggregates are absent");
        }
    }
    debug!("phase 2 done");

    debug!("phase 4: HAVING filter");
    let surviving: Vec<HRow> = table
        .into_values()
        .filter(|hrow| match &plan.having_expr {
            Some(expr) => eval_having(expr, &plan.select_columns, &hrow.key, &hrow.accumulators),
            None => true,
        })
        .collect();
    debug!("phase 4 done: {} H-rows survive", surviving.len());

    debug!("phase 5: projection");
    let mut results: Vec<ResultRow> = surviving
        .into_iter()
        .map(|hrow| project(plan, hrow))
        .collect();

    debug!("phase 6: ORDER BY depth {}", plan.order_by_depth);
    if plan.order_by_depth > 0 {
        let depth = plan.order_by_depth;
        results.sort_by(|a, b| {
            for i in 0..depth {
                let (_, av) = &a.values()[i];
                let (_, bv) = &b.values()[i];
                match av.partial_cmp(bv) {
                    Some(std::cmp::Ordering::Equal) | None => continue,
                    Some(ord) => return ord,
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    Ok(results)
}

fn project(plan: &QueryPlan, hrow: HRow) -> ResultRow {
    let mut values = Vec::with_capacity(plan.select_columns.len() + plan.select_aggregates.len());
    for (name, key_value) in plan.select_columns.iter().zip(hrow.key.into_iter()) {
        values.push((name.clone(), Some(key_value)));
    }
    for descriptor in &plan.select_aggregates {
        let agg_key = descriptor.key();
        let value = hrow
            .accumulators
            .get(&agg_key)
            .map(|acc| Value::number(acc.finalize()));
        values.push((agg_key, value));
    }
    ResultRow::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esql_core::{AggDescriptor, AggFunction, BoolExpr, CmpOp, LogicalType, Operand};
    use std::collections::HashMap;

    fn schema() -> Schema {
        Schema::new(vec![
            ("cust".into(), LogicalType::String),
            ("state".into(), LogicalType::String),
            ("quant".into(), LogicalType::Number),
        ])
    }

    fn row(cust: &str, state: &str, quant: f64) -> Row {
        Row::new(vec![
            Value::Str(cust.into()),
            Value::Str(state.into()),
            Value::number(quant),
        ])
    }

    #[test]
    fn global_sum_groups_by_select_columns() {
        let schema = schema();
        let rows = vec![
            row("acme", "NJ", 10.0),
            row("acme", "NJ", 5.0),
            row("globex", "NY", 7.0),
        ];
        let plan = QueryPlan {
            table_name: "sales".into(),
            select_columns: vec!["cust".into()],
            select_aggregates: vec![AggDescriptor::Global {
                column: "quant".into(),
                function: AggFunction::Sum,
            }],
            groups: vec![],
            where_expr: None,
            such_that_exprs: HashMap::new(),
            having_expr: None,
            order_by_depth: 0,
        };
        let results = execute(&plan, &schema, &rows).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].get("quant.sum"),
            Some(&Some(Value::number(15.0)))
        );
    }

    #[test]
    fn group_scoped_aggregate_is_absent_when_no_rows_match() {
        let schema = schema();
        let rows = vec![row("acme", "NJ", 10.0)];
        let mut such_that = HashMap::new();
        such_that.insert(
            "ny".to_string(),
            BoolExpr::Compare {
                left: Operand::Column("state".into()),
                op: CmpOp::Eq,
                literal: Value::Str("NY".into()),
            },
        );
        let plan = QueryPlan {
            table_name: "sales".into(),
            select_columns: vec!["cust".into()],
            select_aggregates: vec![AggDescriptor::GroupScoped {
                group: "ny".into(),
                column: "quant".into(),
                function: AggFunction::Avg,
            }],
            groups: vec!["ny".into()],
            where_expr: None,
            such_that_exprs: such_that,
            having_expr: None,
            order_by_depth: 0,
        };
        let results = execute(&plan, &schema, &rows).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get("ny.quant.avg"), Some(&None));
    }

    #[test]
    fn order_by_sorts_stably_ascending() {
        let schema = schema();
        let rows = vec![
            row("globex", "NY", 1.0),
            row("acme", "NJ", 2.0),
            row("acme", "NJ", 3.0),
        ];
        let plan = QueryPlan {
            table_name: "sales".into(),
            select_columns: vec!["cust".into(), "quant".into()],
            select_aggregates: vec![],
            groups: vec![],
            where_expr: None,
            such_that_exprs: HashMap::new(),
            having_expr: None,
            order_by_depth: 1,
        };
        let results = execute(&plan, &schema, &rows).unwrap();
        assert_eq!(results[0].get("cust"), Some(&Some(Value::Str("acme".into()))));
    }

    #[test]
    fn empty_where_result_yields_empty_output() {
        let schema = schema();
        let rows = vec![row("acme", "NJ", 10.0)];
        let plan = QueryPlan {
            table_name: "sales".into(),
            select_columns: vec!["cust".into()],
            select_aggregates: vec![],
            groups: vec![],
            where_expr: Some(BoolExpr::Compare {
                left: Operand::Column("quant".into()),
                op: CmpOp::Gt,
                literal: Value::number(1000.0),
            }),
            such_that_exprs: HashMap::new(),
            having_expr: None,
            order_by_depth: 0,
        };
        let results = execute(&plan, &schema, &rows).unwrap();
        assert!(results.is_empty());
    }
}

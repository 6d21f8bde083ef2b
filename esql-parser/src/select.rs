//! Parses the `SELECT`, `OVER`, and `ORDER BY` clause bodies.
//!
//! None of these three are boolean expressions; each is a comma-separated
//! list of identifiers (or, for `ORDER BY`, a single integer), so they are
//! handled separately from the `WHERE`/`SUCH THAT`/`HAVING` expression
//! grammar in [`crate::expr`].

use esql_core::{AggDescriptor, EsqlError, Schema};

use crate::expr::split_top_level_commas;
use crate::operand::{resolve_aggregate, ClauseKind, ExprContext};
use crate::token::{tokenize, Token};

/// The parsed `SELECT` clause: grouping columns and aggregate descriptors,
/// each retaining its position in the original comma list is not preserved
/// separately; `select_columns` and `select_aggregates` each keep their own
/// relative order, matching `spec.md` §3's `QueryPlan` shape.
pub struct SelectItems {
    /// Grouping (non-aggregate) column names, canonical casing.
    pub columns: Vec<String>,
    /// Aggregate descriptors, in the order written.
    pub aggregates: Vec<AggDescriptor>,
}

/// Parses the `SELECT` clause body into grouping columns and aggregates.
pub fn parse_select(body: &str, schema: &Schema, groups: &[String]) -> Result<SelectItems, EsqlError> {
    let tokens = tokenize("SELECT", body)?;
    let mut columns = Vec::new();
    let mut aggregates = Vec::new();

    for chunk in split_top_level_commas(&tokens) {
        let raw = match chunk {
            [Token::Ident(name)] => name,
            [] => return Err(EsqlError::parse("SELECT", "empty item in SELECT list")),
            _ => return Err(EsqlError::parse("SELECT", "malformed SELECT item")),
        };

        if !raw.contains('.') && schema.type_of(raw).is_some() {
            columns.push(schema.canonical_name(raw).unwrap().to_string());
            continue;
        }

        let segments: Vec<&str> = raw.split('.').collect();
        let descriptor = match segments.as_slice() {
            [column, function] => resolve_aggregate_item(schema, groups, None, column, function)?,
            [group, column, function] => {
                resolve_aggregate_item(schema, groups, Some(group), column, function)?
            }
            _ => {
                return Err(EsqlError::schema(
                    "SELECT",
                    format!("'{raw}' is neither a known column nor a valid aggregate reference"),
                ))
            }
        };
        aggregates.push(descriptor);
    }

    if columns.is_empty() && aggregates.is_empty() {
        return Err(EsqlError::parse("SELECT", "empty SELECT"));
    }

    Ok(SelectItems { columns, aggregates })
}

fn resolve_aggregate_item(
    schema: &Schema,
    groups: &[String],
    group: Option<&str>,
    column: &str,
    function: &str,
) -> Result<AggDescriptor, EsqlError> {
    let ctx = ExprContext {
        clause: "SELECT",
        schema,
        groups,
        select_columns: &[],
        kind: ClauseKind::Having,
    };
    resolve_aggregate(&ctx, group, column, function)
}

/// Parses the `OVER` clause body into the declared group identifiers.
pub fn parse_over(body: &str) -> Result<Vec<String>, EsqlError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let tokens = tokenize("OVER", body)?;
    let mut groups = Vec::new();
    for chunk in split_top_level_commas(&tokens) {
        match chunk {
            [Token::Ident(name)] if !name.contains('.') => {
                if groups.iter().any(|g: &String| g.eq_ignore_ascii_case(name)) {
                    return Err(EsqlError::schema(
                        "OVER",
                        format!("duplicate group id '{name}'"),
                    ));
                }
                groups.push(name.clone());
            }
            _ => return Err(EsqlError::parse("OVER", "expected a bare group identifier")),
        }
    }
    Ok(groups)
}

/// Parses the `ORDER BY` clause body into the prefix depth `k`.
pub fn parse_order_by(body: &str, select_column_count: usize) -> Result<usize, EsqlError> {
    if body.is_empty() {
        return Ok(0);
    }
    let tokens = tokenize("ORDER BY", body)?;
    let text = match tokens.as_slice() {
        [Token::Number(text)] => text,
        _ => return Err(EsqlError::parse("ORDER BY", "expected a single integer")),
    };
    let k: i64 = text
        .parse()
        .map_err(|_| EsqlError::parse("ORDER BY", format!("'{text}' is not an integer")))?;
    if k < 0 {
        return Err(EsqlError::type_error("ORDER BY", "must be non-negative"));
    }
    let k = k as usize;
    if k > select_column_count {
        return Err(EsqlError::type_error(
            "ORDER BY",
            format!("{k} exceeds the number of grouping columns ({select_column_count})"),
        ));
    }
    Ok(k)
}

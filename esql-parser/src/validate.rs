//! Semantic validation and final plan assembly (`spec.md` §4.3).

use std::collections::{HashMap, HashSet};

use esql_core::{BoolExpr, EsqlError, QueryPlan, Schema};
use esql_lexer::split_clauses;

use crate::expr::{parse_bool_expr, split_top_level_commas};
use crate::operand::{ClauseKind, ExprContext};
use crate::select::{parse_order_by, parse_over, parse_select};
use crate::token::{tokenize, Token};

/// Parses `query` against `schema`, producing a fully validated [`QueryPlan`].
///
/// This is the crate's single entry point: it runs the clause splitter
/// (`esql-lexer`), the expression parser, and every semantic check in
/// `spec.md` §4.3, so a caller never sees an unvalidated plan.
pub fn parse(query: &str, schema: &Schema) -> Result<QueryPlan, EsqlError> {
    let clauses = split_clauses(query)?;

    let table_name = parse_table_name(&clauses.from)?;
    let groups = parse_over(&clauses.over)?;
    let select = parse_select(&clauses.select, schema, &groups)?;

    let where_expr = parse_optional_expr(
        "WHERE",
        &clauses.where_clause,
        schema,
        &groups,
        &select.columns,
        ClauseKind::Where,
    )?;

    let such_that_exprs = parse_such_that(&clauses.such_that, schema, &groups)?;
    if !groups.is_empty() || !such_that_exprs.is_empty() {
        let declared: HashSet<&str> = groups.iter().map(String::as_str).collect();
        let defined: HashSet<&str> = such_that_exprs.keys().map(String::as_str).collect();
        if declared != defined {
            return Err(EsqlError::schema(
                "SUCH THAT",
                "every OVER group must have exactly one SUCH THAT clause, and vice versa",
            ));
        }
    }

    let having_expr = parse_optional_expr(
        "HAVING",
        &clauses.having,
        schema,
        &groups,
        &select.columns,
        ClauseKind::Having,
    )?;

    let order_by_depth = parse_order_by(&clauses.order_by, select.columns.len())?;

    let plan = QueryPlan {
        table_name,
        select_columns: select.columns,
        select_aggregates: select.aggregates,
        groups,
        where_expr,
        such_that_exprs,
        having_expr,
        order_by_depth,
    };

    validate_plan(&plan)?;
    Ok(plan)
}

/// Extracts the table name from `query`'s `FROM` clause without requiring a
/// schema. A caller needs the table name to load the schema that the full
/// [`parse`] then requires, so this is exposed as its own step.
pub fn table_name(query: &str) -> Result<String, EsqlError> {
    let clauses = split_clauses(query)?;
    parse_table_name(&clauses.from)
}

fn parse_table_name(body: &str) -> Result<String, EsqlError> {
    let tokens = tokenize("FROM", body)?;
    match tokens.as_slice() {
        [Token::Ident(name)] if !name.contains('.') => Ok(name.clone()),
        _ => Err(EsqlError::parse("FROM", "expected a single table name")),
    }
}

#[allow(clippy::too_many_arguments)]
fn parse_optional_expr(
    clause: &'static str,
    body: &str,
    schema: &Schema,
    groups: &[String],
    select_columns: &[String],
    kind: ClauseKind,
) -> Result<Option<BoolExpr>, EsqlError> {
    if body.is_empty() {
        return Ok(None);
    }
    let tokens = tokenize(clause, body)?;
    let ctx = ExprContext {
        clause,
        schema,
        groups,
        select_columns,
        kind,
    };
    let mut groups_seen = Vec::new();
    let expr = parse_bool_expr(&tokens, &ctx, &mut groups_seen)?;
    Ok(Some(expr))
}

fn parse_such_that(
    body: &str,
    schema: &Schema,
    groups: &[String],
) -> Result<HashMap<String, BoolExpr>, EsqlError> {
    if body.is_empty() {
        return Ok(HashMap::new());
    }
    let tokens = tokenize("SUCH THAT", body)?;
    let mut exprs = HashMap::new();
    for chunk in split_top_level_commas(&tokens) {
        if chunk.is_empty() {
            return Err(EsqlError::parse("SUCH THAT", "empty item in SUCH THAT list"));
        }
        let ctx = ExprContext {
            clause: "SUCH THAT",
            schema,
            groups,
            select_columns: &[],
            kind: ClauseKind::SuchThat,
        };
        let mut groups_seen = Vec::new();
        let expr = parse_bool_expr(chunk, &ctx, &mut groups_seen)?;
        let distinct: HashSet<&str> = groups_seen.iter().map(String::as_str).collect();
        if distinct.len() != 1 {
            return Err(EsqlError::type_error(
                "SUCH THAT",
                "each SUCH THAT expression must reference exactly one group",
            ));
        }
        let group = groups_seen.into_iter().next().unwrap();
        if exprs.insert(group.clone(), expr).is_some() {
            return Err(EsqlError::schema(
                "SUCH THAT",
                format!("group '{group}' has more than one SUCH THAT clause"),
            ));
        }
    }
    Ok(exprs)
}

fn validate_plan(plan: &QueryPlan) -> Result<(), EsqlError> {
    // Every descriptor referenced anywhere resolves through the same schema
    // and group checks performed during leaf resolution, so by construction
    // the descriptor set is already valid; this pass only double-checks the
    // invariants that spans multiple clauses.
    for descriptor in plan.descriptor_set() {
        if let Some(group) = descriptor.group() {
            if !plan.groups.iter().any(|g| g == group) {
                return Err(EsqlError::schema(
                    "HAVING",
                    format!("unknown group '{group}' in aggregate reference"),
                ));
            }
        }
    }
    Ok(())
}

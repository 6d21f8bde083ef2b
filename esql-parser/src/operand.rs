//! Resolves a raw dotted identifier from a clause body into a typed operand.
//!
//! `spec.md` §4.2/§4.3: WHERE operands are bare columns, SUCH THAT operands
//! are `<group>.<column>`, and HAVING operands are either a plain grouping
//! column or a dot-form aggregate reference (`<column>.<function>` or
//! `<group>.<column>.<function>`).

use esql_core::{AggDescriptor, AggFunction, EsqlError, LogicalType, Operand, Schema};

/// Which clause a leaf operand is being resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseKind {
    /// `WHERE`: bare column only.
    Where,
    /// `SUCH THAT`: `<group>.<column>`.
    SuchThat,
    /// `HAVING`: plain grouping column or dot-form aggregate reference.
    Having,
}

/// Read-only context threaded through operand resolution.
pub struct ExprContext<'a> {
    /// The clause name used in error messages (`"WHERE"`, `"SUCH THAT"`, `"HAVING"`).
    pub clause: &'static str,
    /// The table schema.
    pub schema: &'a Schema,
    /// The group identifiers declared in `OVER`.
    pub groups: &'a [String],
    /// The grouping columns declared in `SELECT` (only consulted for `HAVING`).
    pub select_columns: &'a [String],
    /// Which clause's leaf grammar to apply.
    pub kind: ClauseKind,
}

/// The result of resolving one leaf's left-hand operand.
pub struct Resolved {
    /// The final operand.
    pub operand: Operand,
    /// The logical type the right-hand literal must parse as.
    pub literal_type: LogicalType,
    /// The group this operand is scoped to, if resolving a `SUCH THAT` leaf.
    pub group: Option<String>,
}

fn find_group<'a>(groups: &'a [String], name: &str) -> Option<&'a str> {
    groups
        .iter()
        .find(|g| g.eq_ignore_ascii_case(name))
        .map(|g| g.as_str())
}

fn lookup_column(
    ctx: &ExprContext<'_>,
    name: &str,
) -> Result<(String, LogicalType), EsqlError> {
    match ctx.schema.type_of(name) {
        Some(ty) => Ok((ctx.schema.canonical_name(name).unwrap().to_string(), ty)),
        None => Err(EsqlError::schema(
            ctx.clause,
            format!("unknown column '{name}'"),
        )),
    }
}

pub(crate) fn resolve_aggregate(
    ctx: &ExprContext<'_>,
    group: Option<&str>,
    column: &str,
    function_name: &str,
) -> Result<AggDescriptor, EsqlError> {
    let function = AggFunction::from_name(function_name).ok_or_else(|| {
        EsqlError::schema(
            ctx.clause,
            format!("unknown aggregate function '{function_name}'"),
        )
    })?;
    let (canonical_column, ty) = lookup_column(ctx, column)?;
    if function.requires_numeric_column() && ty != LogicalType::Number {
        return Err(EsqlError::type_error(
            ctx.clause,
            format!("aggregate '{function}' requires a numeric column, '{column}' is {ty}"),
        ));
    }
    match group {
        None => Ok(AggDescriptor::Global {
            column: canonical_column,
            function,
        }),
        Some(group) => {
            let canonical_group = find_group(ctx.groups, group)
                .ok_or_else(|| {
                    EsqlError::schema(ctx.clause, format!("unknown group '{group}'"))
                })?
                .to_string();
            Ok(AggDescriptor::GroupScoped {
                group: canonical_group,
                column: canonical_column,
                function,
            })
        }
    }
}

/// Resolves `raw` (the dotted text as written) into a typed operand under `ctx`.
pub fn resolve(ctx: &ExprContext<'_>, raw: &str) -> Result<Resolved, EsqlError> {
    let segments: Vec<&str> = raw.split('.').collect();
    match ctx.kind {
        ClauseKind::Where => {
            if segments.len() != 1 {
                return Err(EsqlError::type_error(
                    ctx.clause,
                    format!("WHERE operand must be a plain column, found '{raw}'"),
                ));
            }
            let (canonical, ty) = lookup_column(ctx, segments[0])?;
            Ok(Resolved {
                operand: Operand::Column(canonical),
                literal_type: ty,
                group: None,
            })
        }
        ClauseKind::SuchThat => {
            if segments.len() != 2 {
                return Err(EsqlError::type_error(
                    ctx.clause,
                    format!("SUCH THAT operand must be <group>.<column>, found '{raw}'"),
                ));
            }
            let group = find_group(ctx.groups, segments[0])
                .ok_or_else(|| {
                    EsqlError::schema(ctx.clause, format!("unknown group '{}'", segments[0]))
                })?
                .to_string();
            let (canonical, ty) = lookup_column(ctx, segments[1])?;
            Ok(Resolved {
                operand: Operand::Column(canonical),
                literal_type: ty,
                group: Some(group),
            })
        }
        ClauseKind::Having => match segments.len() {
            1 => {
                let name = segments[0];
                if !ctx
                    .select_columns
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(name))
                {
                    return Err(EsqlError::schema(
                        ctx.clause,
                        format!("'{name}' is not a grouping column in SELECT"),
                    ));
                }
                let (canonical, ty) = lookup_column(ctx, name)?;
                Ok(Resolved {
                    operand: Operand::Column(canonical),
                    literal_type: ty,
                    group: None,
                })
            }
            2 => {
                let descriptor = resolve_aggregate(ctx, None, segments[0], segments[1])?;
                Ok(Resolved {
                    operand: Operand::Aggregate(descriptor),
                    literal_type: LogicalType::Number,
                    group: None,
                })
            }
            3 => {
                let descriptor =
                    resolve_aggregate(ctx, Some(segments[0]), segments[1], segments[2])?;
                Ok(Resolved {
                    operand: Operand::Aggregate(descriptor),
                    literal_type: LogicalType::Number,
                    group: None,
                })
            }
            _ => Err(EsqlError::type_error(
                ctx.clause,
                format!("malformed aggregate reference '{raw}'"),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esql_core::Schema;

    fn schema() -> Schema {
        Schema::new(vec![
            ("Cust".into(), LogicalType::String),
            ("Quant".into(), LogicalType::Number),
            ("State".into(), LogicalType::String),
        ])
    }

    #[test]
    fn resolves_where_plain_column() {
        let schema = schema();
        let ctx = ExprContext {
            clause: "WHERE",
            schema: &schema,
            groups: &[],
            select_columns: &[],
            kind: ClauseKind::Where,
        };
        let resolved = resolve(&ctx, "quant").unwrap();
        assert_eq!(resolved.operand, Operand::Column("Quant".into()));
        assert_eq!(resolved.literal_type, LogicalType::Number);
    }

    #[test]
    fn resolves_such_that_group_qualified_column() {
        let schema = schema();
        let groups = vec!["nj".to_string()];
        let ctx = ExprContext {
            clause: "SUCH THAT",
            schema: &schema,
            groups: &groups,
            select_columns: &[],
            kind: ClauseKind::SuchThat,
        };
        let resolved = resolve(&ctx, "nj.state").unwrap();
        assert_eq!(resolved.operand, Operand::Column("State".into()));
        assert_eq!(resolved.group.as_deref(), Some("nj"));
    }

    #[test]
    fn resolves_having_global_aggregate() {
        let schema = schema();
        let ctx = ExprContext {
            clause: "HAVING",
            schema: &schema,
            groups: &[],
            select_columns: &["Cust".into()],
            kind: ClauseKind::Having,
        };
        let resolved = resolve(&ctx, "quant.sum").unwrap();
        match resolved.operand {
            Operand::Aggregate(AggDescriptor::Global { column, function }) => {
                assert_eq!(column, "Quant");
                assert_eq!(function, AggFunction::Sum);
            }
            other => panic!("expected global aggregate, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_sum() {
        let schema = schema();
        let ctx = ExprContext {
            clause: "HAVING",
            schema: &schema,
            groups: &[],
            select_columns: &["Cust".into()],
            kind: ClauseKind::Having,
        };
        let err = resolve(&ctx, "cust.sum").unwrap_err();
        assert!(matches!(err, EsqlError::Type { .. }));
    }

    #[test]
    fn count_accepts_non_numeric_column() {
        let schema = schema();
        let ctx = ExprContext {
            clause: "HAVING",
            schema: &schema,
            groups: &[],
            select_columns: &["Cust".into()],
            kind: ClauseKind::Having,
        };
        resolve(&ctx, "cust.count").unwrap();
    }
}

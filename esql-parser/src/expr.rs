//! Recursive-descent boolean expression parser (`spec.md` §4.2).
//!
//! Precedence `OR < AND < NOT`, grounded in the teacher's
//! `parse_expr`/`parse_subexpr`/`parse_prefix` shape, simplified to the
//! three fixed precedence levels ESQL's boolean grammar actually has.

use esql_core::{BoolExpr, CmpOp, EsqlError};

use crate::literal::parse_literal;
use crate::operand::{resolve, ExprContext};
use crate::token::Token;

struct ExprParser<'t, 'c, 'g> {
    tokens: &'t [Token],
    pos: usize,
    ctx: &'c ExprContext<'c>,
    groups_seen: &'g mut Vec<String>,
}

/// Parses `tokens` as a full boolean expression under `ctx`.
///
/// Every group referenced by a `SUCH THAT`-mode leaf is appended to
/// `groups_seen`, letting the caller enforce the one-group-per-clause rule
/// without the final tree (which has group prefixes stripped) retaining
/// that information.
pub fn parse_bool_expr(
    tokens: &[Token],
    ctx: &ExprContext<'_>,
    groups_seen: &mut Vec<String>,
) -> Result<BoolExpr, EsqlError> {
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        ctx,
        groups_seen,
    };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(EsqlError::parse(
            parser.ctx.clause,
            "unexpected trailing tokens after expression",
        ));
    }
    Ok(expr)
}

impl ExprParser<'_, '_, '_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn clause(&self) -> &'static str {
        self.ctx.clause
    }

    fn parse_or(&mut self) -> Result<BoolExpr, EsqlError> {
        let mut children = vec![self.parse_and()?];
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            if matches!(self.peek(), Some(Token::Or)) {
                return Err(EsqlError::parse(self.clause(), "doubled logical operator 'or'"));
            }
            children.push(self.parse_and()?);
        }
        Ok(if children.len() == 1 {
            children.pop().unwrap()
        } else {
            BoolExpr::Or(children)
        })
    }

    fn parse_and(&mut self) -> Result<BoolExpr, EsqlError> {
        let mut children = vec![self.parse_not()?];
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            if matches!(self.peek(), Some(Token::And)) {
                return Err(EsqlError::parse(self.clause(), "doubled logical operator 'and'"));
            }
            children.push(self.parse_not()?);
        }
        Ok(if children.len() == 1 {
            children.pop().unwrap()
        } else {
            BoolExpr::And(children)
        })
    }

    fn parse_not(&mut self) -> Result<BoolExpr, EsqlError> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            if matches!(self.peek(), Some(Token::Not)) {
                return Err(EsqlError::parse(self.clause(), "doubled logical operator 'not'"));
            }
            Ok(BoolExpr::Not(Box::new(self.parse_primary()?)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<BoolExpr, EsqlError> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(EsqlError::parse(self.clause(), "unbalanced parentheses")),
                }
            }
            Some(Token::Ident(_)) => self.parse_leaf(),
            Some(other) => Err(EsqlError::parse(
                self.clause(),
                format!("expected an expression, found {other:?}"),
            )),
            None => Err(EsqlError::parse(self.clause(), "missing operand")),
        }
    }

    fn parse_leaf(&mut self) -> Result<BoolExpr, EsqlError> {
        let raw = match self.advance() {
            Some(Token::Ident(name)) => name.clone(),
            _ => unreachable!("parse_leaf only called when peek is Ident"),
        };
        let resolved = resolve(self.ctx, &raw)?;
        if let Some(group) = resolved.group {
            self.groups_seen.push(group);
        }

        let op = match self.peek() {
            Some(Token::Op(op)) => {
                let op = *op;
                self.advance();
                op
            }
            _ => {
                if resolved.literal_type == esql_core::LogicalType::Boolean {
                    return Ok(BoolExpr::Compare {
                        left: resolved.operand,
                        op: CmpOp::Eq,
                        literal: esql_core::Value::Boolean(true),
                    });
                }
                return Err(EsqlError::parse(self.clause(), "expected a comparison operator"));
            }
        };

        if !resolved.literal_type.admits_ordering() && !matches!(op, CmpOp::Eq | CmpOp::Ne) {
            return Err(EsqlError::type_error(
                self.clause(),
                format!("operator '{op}' is not valid for a {} column", resolved.literal_type),
            ));
        }

        let literal_token = self
            .advance()
            .ok_or_else(|| EsqlError::parse(self.clause(), "missing literal"))?;
        let literal = parse_literal(self.clause(), resolved.literal_type, literal_token)?;

        Ok(BoolExpr::Compare {
            left: resolved.operand,
            op,
            literal,
        })
    }
}

/// Splits a flat token stream on top-level commas (respecting paren depth).
pub fn split_top_level_commas(tokens: &[Token]) -> Vec<&[Token]> {
    let mut chunks = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            Token::Comma if depth == 0 => {
                chunks.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    chunks.push(&tokens[start..]);
    chunks
}

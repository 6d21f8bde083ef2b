//! Typed literal parsing (`spec.md` §4.2).

use chrono::NaiveDate;
use esql_core::{EsqlError, LogicalType, Value};

use crate::token::Token;

/// Parses `token` as a literal of `ty`, per the column's declared type.
pub fn parse_literal(clause: &str, ty: LogicalType, token: &Token) -> Result<Value, EsqlError> {
    match (ty, token) {
        (LogicalType::Number, Token::Number(text)) => text
            .parse::<f64>()
            .map(Value::number)
            .map_err(|_| EsqlError::type_error(clause, format!("'{text}' is not a valid number"))),
        (LogicalType::Date, Token::QuotedString(text)) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| {
                EsqlError::type_error(
                    clause,
                    format!("'{text}' is not a valid date (expected YYYY-MM-DD)"),
                )
            }),
        (LogicalType::String, Token::QuotedString(text)) => Ok(Value::Str(text.clone())),
        (LogicalType::Boolean, Token::True) => Ok(Value::Boolean(true)),
        (LogicalType::Boolean, Token::False) => Ok(Value::Boolean(false)),
        _ => Err(EsqlError::type_error(
            clause,
            format!("expected a {ty} literal, found {token:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_number_literal() {
        let v = parse_literal("WHERE", LogicalType::Number, &Token::Number("100".into())).unwrap();
        assert_eq!(v, Value::number(100.0));
    }

    #[test]
    fn parses_date_literal() {
        let v = parse_literal(
            "WHERE",
            LogicalType::Date,
            &Token::QuotedString("2019-04-12".into()),
        )
        .unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(2019, 4, 12).unwrap()));
    }

    #[test]
    fn rejects_malformed_date() {
        let err = parse_literal(
            "WHERE",
            LogicalType::Date,
            &Token::QuotedString("not-a-date".into()),
        )
        .unwrap_err();
        assert!(matches!(err, EsqlError::Type { .. }));
    }

    #[test]
    fn rejects_mismatched_literal_kind() {
        let err = parse_literal("WHERE", LogicalType::Number, &Token::QuotedString("5".into()))
            .unwrap_err();
        assert!(matches!(err, EsqlError::Type { .. }));
    }
}

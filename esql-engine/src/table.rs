//! On-disk table loader (`spec.md` §4.5).
//!
//! Reads `.tables/<name>/columns` and `.tables/<name>/table`, converting
//! every field to its declared [`LogicalType`] at load time.

use std::path::Path;

use esql_core::{EsqlError, LogicalType, Row, Schema, Value};

/// Loads the schema and rows for `table_name` under `tables_dir`.
///
/// A missing table directory is [`EsqlError::TableNotFound`]; a present
/// directory whose `columns`/`table` files cannot be read or parsed as CSV
/// is [`EsqlError::TableUnreadable`]. A field that fails to convert to its
/// declared type is an [`EsqlError::Runtime`] carrying the row index, per
/// `spec.md` §4.4's failure semantics.
pub fn load_table(tables_dir: &Path, table_name: &str) -> Result<(Schema, Vec<Row>), EsqlError> {
    let dir = tables_dir.join(table_name);
    if !dir.is_dir() {
        return Err(EsqlError::TableNotFound {
            name: table_name.to_string(),
        });
    }

    let schema = load_columns(table_name, &dir)?;
    let rows = load_rows(table_name, &dir, &schema)?;
    Ok((schema, rows))
}

fn load_columns(table_name: &str, dir: &Path) -> Result<Schema, EsqlError> {
    let path = dir.join("columns");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(|e| unreadable(table_name, format!("cannot open 'columns': {e}")))?;

    let mut columns = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unreadable(table_name, format!("malformed 'columns': {e}")))?;
        if record.len() != 2 {
            return Err(unreadable(
                table_name,
                format!("'columns' row must have 2 fields, found {}", record.len()),
            ));
        }
        let name = record[0].to_string();
        let ty = parse_logical_type(&record[1])
            .ok_or_else(|| unreadable(table_name, format!("unknown column type '{}'", &record[1])))?;
        columns.push((name, ty));
    }
    if columns.is_empty() {
        return Err(unreadable(table_name, "'columns' declares no columns"));
    }
    Ok(Schema::new(columns))
}

fn parse_logical_type(text: &str) -> Option<LogicalType> {
    match text.trim().to_lowercase().as_str() {
        "number" => Some(LogicalType::Number),
        "string" => Some(LogicalType::String),
        "date" => Some(LogicalType::Date),
        "boolean" => Some(LogicalType::Boolean),
        _ => None,
    }
}

fn load_rows(table_name: &str, dir: &Path, schema: &Schema) -> Result<Vec<Row>, EsqlError> {
    let path = dir.join("table");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_path(&path)
        .map_err(|e| unreadable(table_name, format!("cannot open 'table': {e}")))?;

    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| unreadable(table_name, format!("malformed 'table': {e}")))?;
        if record.len() != schema.len() {
            return Err(EsqlError::runtime(
                row_index,
                format!(
                    "row has {} fields, schema declares {}",
                    record.len(),
                    schema.len()
                ),
            ));
        }
        let mut values = Vec::with_capacity(schema.len());
        for (field, (name, ty)) in record.iter().zip(schema.columns()) {
            values.push(parse_field(row_index, name, *ty, field)?);
        }
        rows.push(Row::new(values));
    }
    Ok(rows)
}

fn parse_field(row_index: usize, column: &str, ty: LogicalType, field: &str) -> Result<Value, EsqlError> {
    match ty {
        LogicalType::Number => field.parse::<f64>().map(Value::number).map_err(|_| {
            EsqlError::runtime(row_index, format!("column '{column}': '{field}' is not a number"))
        }),
        LogicalType::String => Ok(Value::Str(field.to_string())),
        LogicalType::Date => chrono::NaiveDate::parse_from_str(field, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| {
                EsqlError::runtime(row_index, format!("column '{column}': '{field}' is not a valid date"))
            }),
        LogicalType::Boolean => match field.to_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(EsqlError::runtime(
                row_index,
                format!("column '{column}': '{field}' is not a valid boolean"),
            )),
        },
    }
}

fn unreadable(table_name: &str, message: impl Into<String>) -> EsqlError {
    EsqlError::TableUnreadable {
        name: table_name.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_table(dir: &Path, columns: &str, table: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("columns"), columns).unwrap();
        fs::write(dir.join("table"), table).unwrap();
    }

    #[test]
    fn loads_schema_and_rows() {
        let tmp = std::env::temp_dir().join(format!("esql-test-{}", std::process::id()));
        write_table(
            &tmp.join("sales"),
            "cust,string\nquant,number\n",
            "acme,10\nglobex,20\n",
        );
        let (schema, rows) = load_table(&tmp, "sales").unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(&schema, "quant"), Some(&Value::number(10.0)));
        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_directory_is_table_not_found() {
        let tmp = std::env::temp_dir().join(format!("esql-test-missing-{}", std::process::id()));
        let err = load_table(&tmp, "nope").unwrap_err();
        assert!(matches!(err, EsqlError::TableNotFound { .. }));
    }

    #[test]
    fn malformed_number_field_is_runtime_error() {
        let tmp = std::env::temp_dir().join(format!("esql-test-bad-{}", std::process::id()));
        write_table(&tmp.join("sales"), "quant,number\n", "not-a-number\n");
        let err = load_table(&tmp, "sales").unwrap_err();
        assert!(matches!(err, EsqlError::Runtime { row: 0, .. }));
        fs::remove_dir_all(&tmp).ok();
    }
}

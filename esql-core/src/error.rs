use thiserror::Error;

/// The uniform error taxonomy for the ESQL pipeline (`spec.md` §7).
///
/// Parse, schema, and type errors are all surfaced before a single row is
/// scanned; the engine refuses to run an unvalidated plan. Runtime errors
/// abort the current query with no partial result.
#[derive(Debug, Error)]
pub enum EsqlError {
    /// Unrecognised keyword position, missing operand, doubled logical
    /// operator, unbalanced parentheses, or an empty clause body.
    #[error("parse error in {clause}: {message}")]
    Parse {
        /// The clause the error was found in (`"SELECT"`, `"WHERE"`, ...).
        clause: String,
        /// A human-readable description of the problem.
        message: String,
    },

    /// An unknown column, unknown group id, or unknown aggregate function.
    #[error("schema error in {clause}: {message}")]
    Schema {
        /// The clause the error was found in.
        clause: String,
        /// A human-readable description of the problem.
        message: String,
    },

    /// The `FROM` clause names a table with no `.tables/<name>/` directory.
    #[error("table '{name}' not found")]
    TableNotFound {
        /// The table name from the `FROM` clause.
        name: String,
    },

    /// The table directory exists but its `columns`/`table` files could not
    /// be read or parsed.
    #[error("table '{name}' exists but could not be read: {message}")]
    TableUnreadable {
        /// The table name from the `FROM` clause.
        name: String,
        /// A human-readable description of the problem.
        message: String,
    },

    /// A comparator incompatible with a column's type, a literal that does
    /// not parse as the declared type, an aggregate function applied to a
    /// non-numeric column (except `count`), `ORDER BY` out of range, or a
    /// `SUCH THAT` expression referencing more than one group.
    #[error("type error in {clause}: {message}")]
    Type {
        /// The clause the error was found in.
        clause: String,
        /// A human-readable description of the problem.
        message: String,
    },

    /// A malformed on-disk value encountered while scanning rows. Carries
    /// the offending row index; there is no partial result.
    #[error("runtime error at row {row}: {message}")]
    Runtime {
        /// The zero-based index of the offending row.
        row: usize,
        /// A human-readable description of the problem.
        message: String,
    },
}

impl EsqlError {
    /// Builds a [`EsqlError::Parse`].
    pub fn parse(clause: impl Into<String>, message: impl Into<String>) -> Self {
        EsqlError::Parse {
            clause: clause.into(),
            message: message.into(),
        }
    }

    /// Builds a [`EsqlError::Schema`].
    pub fn schema(clause: impl Into<String>, message: impl Into<String>) -> Self {
        EsqlError::Schema {
            clause: clause.into(),
            message: message.into(),
        }
    }

    /// Builds a [`EsqlError::Type`].
    pub fn type_error(clause: impl Into<String>, message: impl Into<String>) -> Self {
        EsqlError::Type {
            clause: clause.into(),
            message: message.into(),
        }
    }

    /// Builds a [`EsqlError::Runtime`].
    pub fn runtime(row: usize, message: impl Into<String>) -> Self {
        EsqlError::Runtime {
            row,
            message: message.into(),
        }
    }
}

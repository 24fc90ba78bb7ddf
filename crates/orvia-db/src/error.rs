//! Error types for the orvia-db crate.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A database query failed to execute.
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// A stored value could not be decoded into its Rust enum.
    #[error(transparent)]
    ParseEnum(#[from] ParseEnumError),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::QueryFailed(err)
    }
}

impl DbError {
    /// Check if this error indicates a connection problem.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_))
    }

    /// Check if this error indicates a query problem.
    #[must_use]
    pub fn is_query_error(&self) -> bool {
        matches!(self, DbError::QueryFailed(_))
    }
}

/// A stored enum column held a value outside the closed set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {column} value: {value}")]
pub struct ParseEnumError {
    /// Column or enum name the value came from.
    pub column: &'static str,
    /// The offending stored value.
    pub value: String,
}

impl ParseEnumError {
    #[must_use]
    pub fn new(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_enum_error_display() {
        let err = ParseEnumError::new("account_status", "FROZEN");
        assert_eq!(err.to_string(), "unknown account_status value: FROZEN");
    }

    #[test]
    fn query_failed_from_sqlx() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(err.is_query_error());
        assert!(!err.is_connection_error());
    }
}

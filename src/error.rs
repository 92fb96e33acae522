//! Error types for multidb.
//!
//! Driver errors are kept intact so they reach callers verbatim. PostgreSQL
//! errors that carry a SQLSTATE are additionally classified into
//! [`PgErrorKind`](crate::pg::PgErrorKind) by [`crate::pg::classify`].

use crate::pg::PgErrorKind;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DbError {
    #[error("invalid database type: {0}")]
    InvalidEngine(String),

    #[error("connection timeout exceeded")]
    ConnectionTimeoutExceeded,

    #[error("no rows in result set")]
    NoRows,

    #[error("too many rows in result set")]
    TooManyRows,

    /// PostgreSQL error mapped through the SQLSTATE table.
    #[error("{kind}")]
    Postgres {
        kind: PgErrorKind,
        /// e.g., "23505" for unique_violation
        code: String,
        message: String,
    },

    #[error(transparent)]
    Driver(Arc<sqlx::Error>),

    #[error("{operation} timed out after {elapsed:?}")]
    Timeout { operation: String, elapsed: Duration },

    #[error("transaction has already been committed or rolled back")]
    TransactionDone,

    #[error("connection has already been closed")]
    ConnectionDone,

    #[error("statement is closed")]
    StatementClosed,

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("invalid connection string: {message}")]
    InvalidDsn { message: String },

    #[error("failed to bind parameters: {message}")]
    Bind { message: String },

    #[error("failed to decode row: {message}")]
    Decode { message: String },

    #[error("failed to create a new connection pool: {0}")]
    FailedToCreatePool(#[source] Arc<sqlx::Error>),

    #[error("failed to ping database: {0}")]
    FailedToPing(#[source] Arc<sqlx::Error>),

    #[error("unknown error")]
    Unknown,

    #[error("{0}")]
    Other(String),
}

impl DbError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_dsn(message: impl Into<String>) -> Self {
        Self::InvalidDsn {
            message: message.into(),
        }
    }

    pub fn bind(message: impl Into<String>) -> Self {
        Self::Bind {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed,
        }
    }

    /// Free-form error, mostly useful for arming the fault seam in tests.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// The underlying sqlx error, if this error came straight from the driver.
    pub fn driver(&self) -> Option<&sqlx::Error> {
        match self {
            Self::Driver(err) | Self::FailedToCreatePool(err) | Self::FailedToPing(err) => {
                Some(err.as_ref())
            }
            _ => None,
        }
    }

    /// SQLSTATE (or engine error code) carried by this error.
    pub fn sql_state(&self) -> Option<String> {
        match self {
            Self::Postgres { code, .. } => Some(code.clone()),
            _ => match self.driver() {
                Some(sqlx::Error::Database(db_err)) => db_err.code().map(|c| c.into_owned()),
                _ => None,
            },
        }
    }

    /// The classified PostgreSQL condition, if any.
    pub fn pg_kind(&self) -> Option<PgErrorKind> {
        match self {
            Self::Postgres { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Check if this error is a deadline or acquire timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ConnectionTimeoutExceeded | Self::Timeout { .. } => true,
            Self::Driver(err) => is_timeout_signal(err),
            _ => false,
        }
    }

    /// Check if this error reports use of a handle that was already closed.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::TransactionDone | Self::ConnectionDone | Self::StatementClosed
        ) || matches!(self.driver(), Some(sqlx::Error::PoolClosed))
    }
}

/// True for driver errors that only say "the deadline passed".
pub(crate) fn is_timeout_signal(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Io(io_err) => io_err.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NoRows,
            other => DbError::Driver(Arc::new(other)),
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::decode(err.to_string())
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_messages() {
        assert_eq!(
            DbError::InvalidEngine("oracle".into()).to_string(),
            "invalid database type: oracle"
        );
        assert_eq!(
            DbError::ConnectionTimeoutExceeded.to_string(),
            "connection timeout exceeded"
        );
        assert_eq!(DbError::Unknown.to_string(), "unknown error");
        assert_eq!(DbError::other("boom").to_string(), "boom");
    }

    #[test]
    fn test_postgres_error_display_is_condition_name() {
        let err = DbError::Postgres {
            kind: PgErrorKind::UniqueViolation,
            code: "23505".into(),
            message: "duplicate key value violates unique constraint".into(),
        };
        assert_eq!(err.to_string(), "unique_violation");
        assert_eq!(err.sql_state().as_deref(), Some("23505"));
        assert_eq!(err.pg_kind(), Some(PgErrorKind::UniqueViolation));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NoRows));
    }

    #[test]
    fn test_from_sqlx_keeps_driver_error() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err.driver(), Some(sqlx::Error::PoolClosed)));
        assert!(err.is_closed());
        assert_eq!(err.to_string(), sqlx::Error::PoolClosed.to_string());
    }

    #[test]
    fn test_is_timeout() {
        assert!(DbError::ConnectionTimeoutExceeded.is_timeout());
        assert!(DbError::timeout("query", Duration::from_millis(5)).is_timeout());
        assert!(DbError::from(sqlx::Error::PoolTimedOut).is_timeout());
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(DbError::from(sqlx::Error::Io(io)).is_timeout());
        assert!(!DbError::NoRows.is_timeout());
    }

    #[test]
    fn test_clone_preserves_message() {
        let err: DbError = sqlx::Error::Protocol("bad frame".into()).into();
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }

    #[test]
    fn test_timeout_message() {
        let err = DbError::timeout("exec", Duration::from_millis(250));
        assert_eq!(err.to_string(), "exec timed out after 250ms");
    }
}

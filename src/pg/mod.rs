//! PostgreSQL helpers: SQLSTATE classification, single/multi row parsing and
//! a fixed-profile client pool.

pub mod client;
pub mod sqlstate;

pub use client::{PgClient, PgClientConfig};
pub use sqlstate::{PgErrorClass, PgErrorKind};

use crate::db::{Engine, Rows};
use crate::error::{DbError, DbResult};
use serde::de::DeserializeOwned;

/// Map a PostgreSQL server error onto [`PgErrorKind`].
///
/// Database errors carrying a SQLSTATE become [`DbError::Postgres`]; codes
/// missing from the table map to [`PgErrorKind::Unknown`]. Every other error
/// is returned unchanged.
pub fn classify(err: DbError) -> DbError {
    let DbError::Driver(inner) = &err else {
        return err;
    };
    let sqlx::Error::Database(db_err) = inner.as_ref() else {
        return err;
    };
    let Some(code) = db_err.code() else {
        return err;
    };
    DbError::Postgres {
        kind: PgErrorKind::from_code(&code),
        code: code.into_owned(),
        message: db_err.message().to_string(),
    }
}

/// Classify only when `engine` is PostgreSQL.
pub(crate) fn classify_for(engine: Engine, err: DbError) -> DbError {
    match engine {
        Engine::Postgres => classify(err),
        _ => err,
    }
}

/// Decode exactly one row.
///
/// No rows yields [`DbError::NoRows`], more than one [`DbError::TooManyRows`].
pub fn parse_one<T: DeserializeOwned>(rows: DbResult<Rows>) -> DbResult<T> {
    let mut rows = rows.map_err(classify)?;
    match rows.remaining() {
        0 => Err(rows.err().cloned().unwrap_or(DbError::NoRows)),
        1 => rows
            .collect::<T>()?
            .pop()
            .ok_or(DbError::NoRows),
        _ => Err(DbError::TooManyRows),
    }
}

/// Decode every row; an empty result is an empty vector.
pub fn parse_many<T: DeserializeOwned>(rows: DbResult<Rows>) -> DbResult<Vec<T>> {
    rows.map_err(classify)?.collect()
}

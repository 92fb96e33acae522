//! Binding [`Value`] arguments to engine-specific queries.

use crate::db::Value;
use crate::error::{DbError, DbResult};
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::mysql::MySqlArguments;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgTypeInfo};
use sqlx::sqlite::SqliteArguments;
use sqlx::types::Json;
use sqlx::{MySql, Postgres, Sqlite, Type};

type MySqlQuery<'q> = sqlx::query::Query<'q, MySql, MySqlArguments>;
type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;
type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Build a MySQL query with every argument bound in order.
pub(crate) fn bind_mysql<'q>(sql: &'q str, args: &'q [Value]) -> DbResult<MySqlQuery<'q>> {
    let mut query = sqlx::query(sql);
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::UInt(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Bytes(v) => query.bind(v.as_slice()),
            Value::Json(v) => query.bind(Json(v)),
        };
    }
    Ok(query)
}

/// A PostgreSQL NULL sent with OID 0, so the server infers its type from
/// the statement the way it does for an untyped `NULL` literal.
#[derive(Debug, Clone, Copy)]
struct UntypedNull;

impl Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

/// Build a PostgreSQL query with every argument bound in order.
pub(crate) fn bind_postgres<'q>(sql: &'q str, args: &'q [Value]) -> DbResult<PgQuery<'q>> {
    let mut query = sqlx::query(sql);
    for (idx, arg) in args.iter().enumerate() {
        query = match arg {
            Value::Null => query.bind(UntypedNull),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            // PostgreSQL has no unsigned integers
            Value::UInt(v) => query.bind(i64::try_from(*v).map_err(|_| out_of_range(idx, *v))?),
            Value::Float(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Bytes(v) => query.bind(v.as_slice()),
            Value::Json(v) => query.bind(Json(v)),
        };
    }
    Ok(query)
}

/// Build a SQLite query with every argument bound in order.
pub(crate) fn bind_sqlite<'q>(sql: &'q str, args: &'q [Value]) -> DbResult<SqliteQuery<'q>> {
    let mut query = sqlx::query(sql);
    for (idx, arg) in args.iter().enumerate() {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::UInt(v) => query.bind(i64::try_from(*v).map_err(|_| out_of_range(idx, *v))?),
            Value::Float(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Bytes(v) => query.bind(v.as_slice()),
            // SQLite doesn't have native JSON type, store as string
            Value::Json(v) => query.bind(v.to_string()),
        };
    }
    Ok(query)
}

fn out_of_range(idx: usize, value: u64) -> DbError {
    DbError::bind(format!(
        "argument {} ({value}) does not fit in a signed 64-bit integer",
        idx + 1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn test_bind_counts_arguments() {
        let args = crate::args![1, "a", None::<i64>, vec![0u8, 1], 2.5, true];
        let mut query = bind_sqlite("SELECT ?, ?, ?, ?, ?, ?", &args).unwrap();
        assert_eq!(query.sql(), "SELECT ?, ?, ?, ?, ?, ?");
        assert!(query.take_arguments().unwrap().is_some());
    }

    #[test]
    fn test_unsigned_overflow_rejected_without_unsigned_support() {
        let args = vec![Value::Int(1), Value::UInt(u64::MAX)];
        let err = bind_postgres("SELECT $1, $2", &args).err().unwrap();
        assert!(err.to_string().contains("argument 2"));
        assert!(bind_sqlite("SELECT ?, ?", &args).is_err());
        assert!(bind_mysql("SELECT ?, ?", &args).is_ok());
    }

    #[test]
    fn test_postgres_null_leaves_type_to_the_server() {
        assert_eq!(<UntypedNull as Type<Postgres>>::type_info(), PgTypeInfo::with_oid(Oid(0)));

        let mut query = bind_postgres("INSERT INTO t (n) VALUES ($1)", &[Value::Null]).unwrap();
        assert!(query.take_arguments().unwrap().is_some());
    }
}

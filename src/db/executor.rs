//! Statement execution.
//!
//! The executor uses database-specific implementations organized in submodules:
//! - `mysql`: MySQL execution, row decoding and insert ids
//! - `postgres`: PostgreSQL execution with SQLSTATE classification
//! - `sqlite`: SQLite execution, row decoding and rowids
//!
//! Every function is generic over the sqlx executor, so the same code runs
//! against a pool, a leased connection or an open transaction. Statements
//! without arguments go through the engine's text protocol, which accepts
//! several statements in one call and yields one result set per statement.

use crate::db::Value;
use crate::db::row::{ColumnType, ExecResult, ResultSet, Rows};
use crate::db::types::{RowToValues, column_type_of};
use crate::error::{DbError, DbResult};
use futures_util::{Stream, StreamExt};
use sqlx::{Either, Statement};

/// Drain a `fetch_many` stream into buffered result sets.
///
/// A failure before any row arrived is returned directly; a failure after
/// that is deferred into [`Rows::err`] with the rows already received. A row
/// that cannot be decoded counts as a failure.
async fn collect_sets<Q, R, S>(mut stream: S, map_err: fn(sqlx::Error) -> DbError) -> DbResult<Rows>
where
    R: RowToValues,
    S: Stream<Item = Result<Either<Q, R>, sqlx::Error>> + Unpin,
{
    let mut sets = Vec::new();
    let mut current = ResultSet::default();

    while let Some(item) = stream.next().await {
        let err = match item {
            Ok(Either::Right(row)) => {
                if !current.has_columns() {
                    current.set_columns(row.column_types());
                }
                match row.to_values() {
                    Ok(values) => {
                        current.push(values);
                        continue;
                    }
                    Err(err) => err,
                }
            }
            Ok(Either::Left(_)) => {
                sets.push(std::mem::take(&mut current));
                continue;
            }
            Err(err) => map_err(err),
        };

        let received = !current.is_empty() || sets.iter().any(|s: &ResultSet| !s.is_empty());
        if !received {
            return Err(err);
        }
        if current.has_columns() {
            sets.push(current);
        }
        return Ok(Rows::with_error(sets, err));
    }

    if current.has_columns() || sets.is_empty() {
        sets.push(current);
    }
    Ok(Rows::new(sets))
}

pub mod mysql {
    use super::*;
    use crate::db::params::bind_mysql;
    use sqlx::{Executor, MySql};

    pub async fn execute<'e, E>(executor: E, sql: &'e str, args: &'e [Value]) -> DbResult<ExecResult>
    where
        E: Executor<'e, Database = MySql>,
    {
        // Raw SQL when there are no args; some statements cannot be prepared
        let result = if args.is_empty() {
            executor.execute(sql).await?
        } else {
            executor.execute(bind_mysql(sql, args)?).await?
        };
        Ok(ExecResult::new(
            result.rows_affected(),
            i64::try_from(result.last_insert_id()).ok(),
        ))
    }

    pub async fn fetch<'e, E>(executor: E, sql: &'e str, args: &'e [Value]) -> DbResult<Rows>
    where
        E: Executor<'e, Database = MySql>,
    {
        if args.is_empty() {
            collect_sets(executor.fetch_many(sql), DbError::from).await
        } else {
            collect_sets(executor.fetch_many(bind_mysql(sql, args)?), DbError::from).await
        }
    }

    pub async fn prepare<'e, E>(executor: E, sql: &'e str) -> DbResult<Vec<ColumnType>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let statement = executor.prepare(sql).await?;
        Ok(statement.columns().iter().map(column_type_of).collect())
    }
}

pub mod postgres {
    use super::*;
    use crate::db::params::bind_postgres;
    use sqlx::{Executor, Postgres};

    fn classify(err: sqlx::Error) -> DbError {
        crate::pg::classify(DbError::from(err))
    }

    /// PostgreSQL reports no insert id; use `RETURNING` instead.
    pub async fn execute<'e, E>(executor: E, sql: &'e str, args: &'e [Value]) -> DbResult<ExecResult>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = if args.is_empty() {
            executor.execute(sql).await
        } else {
            executor.execute(bind_postgres(sql, args)?).await
        };
        let result = result.map_err(classify)?;
        Ok(ExecResult::new(result.rows_affected(), None))
    }

    pub async fn fetch<'e, E>(executor: E, sql: &'e str, args: &'e [Value]) -> DbResult<Rows>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if args.is_empty() {
            collect_sets(executor.fetch_many(sql), classify).await
        } else {
            collect_sets(executor.fetch_many(bind_postgres(sql, args)?), classify).await
        }
    }

    pub async fn prepare<'e, E>(executor: E, sql: &'e str) -> DbResult<Vec<ColumnType>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statement = executor.prepare(sql).await.map_err(classify)?;
        Ok(statement.columns().iter().map(column_type_of).collect())
    }
}

pub mod sqlite {
    use super::*;
    use crate::db::params::bind_sqlite;
    use sqlx::{Executor, Sqlite};

    pub async fn execute<'e, E>(executor: E, sql: &'e str, args: &'e [Value]) -> DbResult<ExecResult>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = if args.is_empty() {
            executor.execute(sql).await?
        } else {
            executor.execute(bind_sqlite(sql, args)?).await?
        };
        Ok(ExecResult::new(
            result.rows_affected(),
            Some(result.last_insert_rowid()),
        ))
    }

    pub async fn fetch<'e, E>(executor: E, sql: &'e str, args: &'e [Value]) -> DbResult<Rows>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if args.is_empty() {
            collect_sets(executor.fetch_many(sql), DbError::from).await
        } else {
            collect_sets(executor.fetch_many(bind_sqlite(sql, args)?), DbError::from).await
        }
    }

    pub async fn prepare<'e, E>(executor: E, sql: &'e str) -> DbResult<Vec<ColumnType>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let statement = executor.prepare(sql).await?;
        Ok(statement.columns().iter().map(column_type_of).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;
    use sqlx::sqlite::SqliteConnection;

    async fn memory() -> SqliteConnection {
        SqliteConnection::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_execute_and_fetch() {
        let mut conn = memory().await;
        sqlite::execute(
            &mut conn,
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
            &[],
        )
        .await
        .unwrap();

        let result = sqlite::execute(
            &mut conn,
            "INSERT INTO users (name) VALUES (?)",
            &crate::args!["alice"],
        )
        .await
        .unwrap();
        assert_eq!(result.rows_affected, 1);
        assert_eq!(result.last_insert_id, Some(1));

        let mut rows = sqlite::fetch(&mut conn, "SELECT id, name FROM users WHERE id = ?", &crate::args![1])
            .await
            .unwrap();
        assert_eq!(rows.columns(), vec!["id", "name"]);
        assert!(rows.next());
        let (id, name): (i64, String) = rows.scan().unwrap();
        assert_eq!((id, name.as_str()), (1, "alice"));
        assert!(!rows.next());
    }

    #[tokio::test]
    async fn test_sqlite_multiple_statements_yield_result_sets() {
        let mut conn = memory().await;
        let mut rows = sqlite::fetch(&mut conn, "SELECT 1 AS a; SELECT 2 AS b, 3 AS c", &[])
            .await
            .unwrap();

        assert_eq!(rows.columns(), vec!["a"]);
        assert!(rows.next_result_set());
        assert_eq!(rows.columns(), vec!["b", "c"]);
        assert!(rows.next());
        assert_eq!(rows.scan::<(i64, i64)>().unwrap(), (2, 3));
        assert!(!rows.next_result_set());
    }

    #[tokio::test]
    async fn test_sqlite_empty_result_has_one_set() {
        let mut conn = memory().await;
        let mut rows = sqlite::fetch(&mut conn, "SELECT 1 AS a WHERE 0", &[])
            .await
            .unwrap();
        assert!(!rows.next());
        assert!(rows.err().is_none());
        assert!(rows.columns().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_error_before_rows_is_returned() {
        let mut conn = memory().await;
        let err = sqlite::fetch(&mut conn, "SELECT * FROM missing", &[])
            .await
            .unwrap_err();
        assert!(err.driver().is_some());
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_sqlite_prepare_rejects_bad_sql() {
        let mut conn = memory().await;
        let columns = sqlite::prepare(&mut conn, "SELECT 1 AS one, 'x' AS two").await.unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
        assert!(sqlite::prepare(&mut conn, "SELEC 1").await.is_err());
    }

    #[tokio::test]
    async fn test_sqlite_undecodable_first_row_is_returned() {
        let mut conn = memory().await;
        let err = sqlite::fetch(&mut conn, "SELECT CAST(x'ff' AS TEXT) AS t", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Decode { .. }));
        assert!(err.to_string().contains("column 0"));
    }

    #[tokio::test]
    async fn test_sqlite_undecodable_later_row_is_deferred() {
        let mut conn = memory().await;
        let mut rows = sqlite::fetch(
            &mut conn,
            "SELECT 'ok' AS t UNION ALL SELECT CAST(x'ff' AS TEXT)",
            &[],
        )
        .await
        .unwrap();

        assert!(rows.next());
        assert_eq!(rows.scan::<String>().unwrap(), "ok");
        assert!(!rows.next());
        assert!(matches!(rows.err(), Some(DbError::Decode { .. })));
    }
}

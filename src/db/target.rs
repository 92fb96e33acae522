//! Engine dispatch for the handles.
//!
//! A [`Target`] borrows whatever a handle executes against (its pool, its
//! leased connection or its open transaction) and routes each operation to
//! the matching module in [`crate::db::executor`].

use crate::db::Value;
use crate::db::row::{ColumnType, ExecResult, Rows};
use crate::error::DbResult;
use sqlx::mysql::MySqlConnection;
use sqlx::postgres::PgConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::{MySqlPool, PgPool, SqlitePool};

pub(crate) enum Target<'a> {
    MySqlPool(&'a MySqlPool),
    MySqlConn(&'a mut MySqlConnection),
    PgPool(&'a PgPool),
    PgConn(&'a mut PgConnection),
    SqlitePool(&'a SqlitePool),
    SqliteConn(&'a mut SqliteConnection),
}

/// Expand `$body` once per engine with `$ex` bound to the executor and
/// `$engine` naming that engine's executor module.
///
/// ```ignore
/// dispatch!(target, |ex, engine| engine::execute(ex, sql, args).await)
/// ```
macro_rules! dispatch {
    ($target:expr, |$ex:ident, $engine:ident| $body:expr) => {
        match $target {
            Target::MySqlPool($ex) => {
                use $crate::db::executor::mysql as $engine;
                $body
            }
            Target::MySqlConn($ex) => {
                use $crate::db::executor::mysql as $engine;
                $body
            }
            Target::PgPool($ex) => {
                use $crate::db::executor::postgres as $engine;
                $body
            }
            Target::PgConn($ex) => {
                use $crate::db::executor::postgres as $engine;
                $body
            }
            Target::SqlitePool($ex) => {
                use $crate::db::executor::sqlite as $engine;
                $body
            }
            Target::SqliteConn($ex) => {
                use $crate::db::executor::sqlite as $engine;
                $body
            }
        }
    };
}

impl Target<'_> {
    fn reborrow(&mut self) -> Target<'_> {
        match self {
            Target::MySqlPool(pool) => Target::MySqlPool(pool),
            Target::MySqlConn(conn) => Target::MySqlConn(conn),
            Target::PgPool(pool) => Target::PgPool(pool),
            Target::PgConn(conn) => Target::PgConn(conn),
            Target::SqlitePool(pool) => Target::SqlitePool(pool),
            Target::SqliteConn(conn) => Target::SqliteConn(conn),
        }
    }

    pub(crate) async fn execute(self, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        dispatch!(self, |ex, engine| engine::execute(ex, sql, args).await)
    }

    /// Run a query. A single result set without rows takes its columns
    /// from the prepared statement.
    pub(crate) async fn fetch(mut self, sql: &str, args: &[Value]) -> DbResult<Rows> {
        let mut rows = dispatch!(self.reborrow(), |ex, engine| engine::fetch(ex, sql, args).await)?;
        if rows.lacks_columns() {
            match self.prepare(sql).await {
                Ok(columns) => rows.set_columns(columns),
                Err(err) => tracing::debug!(error = %err, "No column metadata for empty result"),
            }
        }
        Ok(rows)
    }

    /// Prepare `sql` and return the columns it would produce.
    pub(crate) async fn prepare(self, sql: &str) -> DbResult<Vec<ColumnType>> {
        dispatch!(self, |ex, engine| engine::prepare(ex, sql).await)
    }

    /// Round-trip to the server. Pools lease a connection for it.
    pub(crate) async fn ping(self) -> DbResult<()> {
        use sqlx::Connection;

        match self {
            Target::MySqlPool(pool) => pool.acquire().await?.ping().await?,
            Target::MySqlConn(conn) => conn.ping().await?,
            Target::PgPool(pool) => pool
                .acquire()
                .await?
                .ping()
                .await
                .map_err(|e| crate::pg::classify(e.into()))?,
            Target::PgConn(conn) => conn
                .ping()
                .await
                .map_err(|e| crate::pg::classify(e.into()))?,
            Target::SqlitePool(pool) => pool.acquire().await?.ping().await?,
            Target::SqliteConn(conn) => conn.ping().await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pool_and_connection_targets_agree() {
        let pool = pool().await;
        Target::SqlitePool(&pool)
            .execute("CREATE TABLE t (v INTEGER)", &[])
            .await
            .unwrap();
        Target::SqlitePool(&pool)
            .execute("INSERT INTO t VALUES (?)", &crate::args![5])
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut rows = Target::SqliteConn(&mut *conn)
            .fetch("SELECT v FROM t", &[])
            .await
            .unwrap();
        assert!(rows.next());
        assert_eq!(rows.scan::<i64>().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_ping_and_prepare() {
        let pool = pool().await;
        Target::SqlitePool(&pool).ping().await.unwrap();
        let columns = Target::SqlitePool(&pool).prepare("SELECT 1 AS n").await.unwrap();
        assert_eq!(columns[0].name, "n");
        assert!(Target::SqlitePool(&pool).prepare("NOT SQL").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_result_still_reports_columns() {
        let pool = pool().await;
        Target::SqlitePool(&pool)
            .execute("CREATE TABLE t (a INTEGER, b TEXT)", &[])
            .await
            .unwrap();

        let rows = Target::SqlitePool(&pool)
            .fetch("SELECT a, b FROM t", &[])
            .await
            .unwrap();
        assert_eq!(rows.columns(), vec!["a", "b"]);

        let mut conn = pool.acquire().await.unwrap();
        let mut rows = Target::SqliteConn(&mut *conn)
            .fetch("SELECT b FROM t WHERE a = ?", &crate::args![1])
            .await
            .unwrap();
        assert!(!rows.next());
        assert_eq!(rows.columns(), vec!["b"]);
    }
}

//! Connection establishment under a hard deadline.
//!
//! The dial (pool creation, first connection, ping) runs on its own task and
//! races the deadline. When the deadline wins the task is aborted, so no
//! socket outlives the caller's interest in it. There are no retries.

use crate::config::{DEFAULT_CONNECT_TIMEOUT, PoolOptions};
use crate::db::Engine;
use crate::db::dsn;
use crate::db::pool::{Database, DbPool};
use crate::error::{DbError, DbResult, is_timeout_signal};
use std::time::Duration;
use tracing::{debug, warn};

/// Open a [`Database`] for `engine` ("mysql", "postgres", "sqlite3", ...).
///
/// `timeout` bounds the whole dial; `None` uses the DSN's own connect
/// timeout, then 5 seconds. Expiry yields
/// [`DbError::ConnectionTimeoutExceeded`]; dial errors pass through
/// unchanged, except bare timeout signals which normalize to the same
/// sentinel.
pub async fn connect(
    engine: &str,
    dsn: &str,
    timeout: Option<Duration>,
    pool: &PoolOptions,
) -> DbResult<Database> {
    let engine: Engine = engine.parse()?;
    pool.validate()?;
    let (sqlx_dsn, facade) = dsn::split_facade_options(engine, dsn)?;

    let deadline = timeout
        .or(facade.connect_timeout)
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT);
    let acquire_timeout = pool
        .acquire_timeout
        .or(facade.connect_timeout)
        .unwrap_or_else(|| pool.acquire_timeout_or_default());

    debug!(%engine, dsn = %dsn::redact(dsn), ?deadline, "Dialing database");

    let dial = {
        let options = pool.clone();
        tokio::spawn(async move {
            DbPool::connect(engine, &sqlx_dsn, &facade, &options, acquire_timeout).await
        })
    };
    let abort = dial.abort_handle();

    let pool_handle = match tokio::time::timeout(deadline, dial).await {
        Err(_) => {
            abort.abort();
            warn!(%engine, ?deadline, "Connection deadline exceeded, dial aborted");
            return Err(DbError::ConnectionTimeoutExceeded);
        }
        Ok(Err(join_err)) => {
            return Err(if join_err.is_panic() {
                DbError::other(format!("dial task panicked: {join_err}"))
            } else {
                DbError::Unknown
            });
        }
        Ok(Ok(Err(err))) => return Err(normalize(err)),
        Ok(Ok(Ok(pool_handle))) => pool_handle,
    };

    let db = Database::from_pool(pool_handle, pool.clone(), &facade);
    db.log_connected(dsn);
    Ok(db)
}

fn normalize(err: DbError) -> DbError {
    match err.driver() {
        Some(inner) if is_timeout_signal(inner) => DbError::ConnectionTimeoutExceeded,
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_invalid_engine_fails_before_dial() {
        let err = connect("999", "postgres://localhost/db", None, &PoolOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidEngine(_)));
        assert_eq!(err.to_string(), "invalid database type: 999");
    }

    #[tokio::test]
    async fn test_invalid_pool_options() {
        let mut pool = PoolOptions::default();
        pool.set_max_open_conns(0);
        let err = connect("sqlite3", "sqlite::memory:", None, &pool)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Config { .. }));
    }

    #[test]
    fn test_normalize_timeout_signals() {
        assert!(matches!(
            normalize(sqlx::Error::PoolTimedOut.into()),
            DbError::ConnectionTimeoutExceeded
        ));
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "dial");
        assert!(matches!(
            normalize(sqlx::Error::Io(io).into()),
            DbError::ConnectionTimeoutExceeded
        ));
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = normalize(sqlx::Error::Io(refused).into());
        assert!(matches!(err.driver(), Some(sqlx::Error::Io(_))));
        assert!(matches!(normalize(DbError::NoRows), DbError::NoRows));
    }

    #[tokio::test]
    async fn test_connect_sqlite_memory() {
        let db = connect("sqlite3", "sqlite::memory:", None, &PoolOptions::default())
            .await
            .unwrap();
        assert_eq!(db.engine(), Engine::Sqlite);
        db.ping().await.unwrap();
        db.close();
    }

    #[tokio::test]
    async fn test_deadline_against_silent_server() {
        // Accepts TCP connections and never answers the handshake.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let held = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let sink = held.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                sink.lock().await.push(socket);
            }
        });

        let dsn = format!("postgres://u:p@{addr}/db?sslmode=disable");
        let started = std::time::Instant::now();
        let err = connect(
            "postgres",
            &dsn,
            Some(Duration::from_millis(100)),
            &PoolOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DbError::ConnectionTimeoutExceeded));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}

//! A PostgreSQL pool with a fixed connection profile.

use crate::config::{ConnectionParams, DbConfig, PoolOptions};
use crate::db::dsn::{self, FacadeOptions};
use crate::db::pool::close_in_background;
use crate::db::{Database, DbPool, Engine};
use crate::error::{DbError, DbResult};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Connection, Postgres};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_LIFETIME: Duration = Duration::from_secs(30);
const MAX_IDLE_TIME: Duration = Duration::from_secs(10);
const MAX_CONNECTIONS: u32 = 10;
const MIN_CONNECTIONS: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgClientConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Pooled PostgreSQL client.
///
/// TLS is attempted but not required, and certificates are not verified.
#[derive(Debug, Clone)]
pub struct PgClient {
    pool: PgPool,
}

impl PgClient {
    /// Create the pool and check one connection.
    pub async fn new(config: PgClientConfig) -> DbResult<Self> {
        let options = connect_options(&config)?;
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .min_connections(MIN_CONNECTIONS)
            .acquire_timeout(CONNECT_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
            .idle_timeout(MAX_IDLE_TIME)
            .test_before_acquire(true)
            .connect_lazy_with(options);

        if let Err(e) = ping(&pool).await {
            pool.close().await;
            return Err(DbError::FailedToPing(Arc::new(e)));
        }

        info!(host = %config.host, port = config.port, database = %config.database, "PostgreSQL client ready");
        Ok(Self { pool })
    }

    /// Lease a connection. It returns to the pool on drop.
    pub async fn get_connection(&self) -> DbResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| crate::pg::classify(e.into()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// A [`Database`] handle sharing this client's pool.
    pub fn database(&self) -> Database {
        let mut options = PoolOptions::default();
        options.set_max_open_conns(MAX_CONNECTIONS);
        options.set_max_idle_conns(MIN_CONNECTIONS);
        options.set_conn_max_lifetime(MAX_LIFETIME);
        options.set_conn_max_idle_time(MAX_IDLE_TIME);
        Database::from_pool(
            DbPool::Postgres(self.pool.clone()),
            options,
            &FacadeOptions::default(),
        )
    }

    /// Close the pool; leased connections stay usable until returned.
    pub fn close(&self) {
        close_in_background(&self.pool);
    }
}

async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}

fn connect_options(config: &PgClientConfig) -> DbResult<PgConnectOptions> {
    let mut params = ConnectionParams::new();
    params.insert("sslmode".to_string(), "prefer".to_string());
    let db_config = DbConfig::new(Engine::Postgres)
        .host(&config.host)
        .port(config.port)
        .user(&config.user)
        .password(&config.password)
        .database(&config.database)
        .params(params);
    let url = dsn::build(&db_config)?;
    PgConnectOptions::from_str(&url).map_err(|e| DbError::FailedToCreatePool(Arc::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PgClientConfig {
        PgClientConfig {
            host: "db.internal".into(),
            port: 6432,
            user: "app".into(),
            password: "p@ss".into(),
            database: "orders".into(),
        }
    }

    #[test]
    fn test_connect_options_from_config() {
        let options = connect_options(&config()).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("orders"));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let mut config = config();
        config.host = "bad host".into();
        assert!(connect_options(&config).is_err());
    }
}

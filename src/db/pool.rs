//! Connection pool management.
//!
//! This module provides connection pooling functionality using database-specific
//! pools (MySqlPool, PgPool, SqlitePool) to ensure full type support, and the
//! [`Database`] handle built on top of them.

use crate::config::{DbConfig, PoolOptions};
use crate::context::Context;
use crate::db::connection::{Connection, DbConnection};
use crate::db::dsn::{self, FacadeOptions};
use crate::db::fault::FaultInjector;
use crate::db::named::{self, NamedQuery};
use crate::db::queryable::{IoTimeouts, Queryable, Session};
use crate::db::row::{ExecResult, Row, Rows};
use crate::db::statement::{NamedStatement, Statement};
use crate::db::target::Target;
use crate::db::transaction::{DbTransaction, Transaction};
use crate::db::{Engine, Value};
use crate::error::DbResult;
use crate::log::{self, LogSink, Tag};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{MySqlPool, PgPool, Pool, SqlitePool};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Database-specific connection pool (avoids AnyPool limitations).
#[derive(Debug, Clone)]
pub enum DbPool {
    MySql(MySqlPool),
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Build a pool from a sqlx DSN, open its first connection and ping it.
    ///
    /// `dsn` must already be stripped of [`FacadeOptions`].
    pub(crate) async fn connect(
        engine: Engine,
        dsn: &str,
        facade: &FacadeOptions,
        options: &PoolOptions,
        acquire_timeout: Duration,
    ) -> DbResult<Self> {
        let max_open = options.max_open_or_default(engine);
        let min_idle = options.max_idle_or_default(engine);
        let max_lifetime = Some(options.max_lifetime_or_default());
        let idle_timeout = Some(options.max_idle_time_or_default());
        let test_before_acquire = options.test_before_acquire_or_default();

        let pool = match engine {
            Engine::MySql => {
                let connect = MySqlConnectOptions::from_str(dsn)?.charset("utf8mb4");
                let pool = MySqlPoolOptions::new()
                    .min_connections(min_idle)
                    .max_connections(max_open)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .test_before_acquire(test_before_acquire)
                    .connect_with(connect)
                    .await?;
                DbPool::MySql(pool)
            }
            Engine::Postgres => {
                let mut connect = PgConnectOptions::from_str(dsn)?;
                if let Some(timeout) = facade.statement_timeout {
                    connect = connect.options([("statement_timeout", timeout.as_millis())]);
                }
                let pool = PgPoolOptions::new()
                    .min_connections(min_idle)
                    .max_connections(max_open)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .test_before_acquire(test_before_acquire)
                    .connect_with(connect)
                    .await
                    .map_err(|e| crate::pg::classify(e.into()))?;
                DbPool::Postgres(pool)
            }
            Engine::Sqlite => {
                let connect = SqliteConnectOptions::from_str(dsn)?;
                let pool = SqlitePoolOptions::new()
                    .min_connections(min_idle)
                    .max_connections(max_open)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .test_before_acquire(test_before_acquire)
                    .connect_with(connect)
                    .await?;
                DbPool::Sqlite(pool)
            }
        };

        if let Err(err) = pool.target().ping().await {
            pool.close();
            return Err(err);
        }
        Ok(pool)
    }

    /// Close the connection pool without waiting for leased connections.
    pub fn close(&self) {
        match self {
            DbPool::MySql(pool) => close_in_background(pool),
            DbPool::Postgres(pool) => close_in_background(pool),
            DbPool::Sqlite(pool) => close_in_background(pool),
        }
    }

    pub fn engine(&self) -> Engine {
        match self {
            DbPool::MySql(_) => Engine::MySql,
            DbPool::Postgres(_) => Engine::Postgres,
            DbPool::Sqlite(_) => Engine::Sqlite,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            DbPool::MySql(pool) => pool.is_closed(),
            DbPool::Postgres(pool) => pool.is_closed(),
            DbPool::Sqlite(pool) => pool.is_closed(),
        }
    }

    fn size_and_idle(&self) -> (u32, usize) {
        match self {
            DbPool::MySql(pool) => (pool.size(), pool.num_idle()),
            DbPool::Postgres(pool) => (pool.size(), pool.num_idle()),
            DbPool::Sqlite(pool) => (pool.size(), pool.num_idle()),
        }
    }

    pub(crate) fn target(&self) -> Target<'_> {
        match self {
            DbPool::MySql(pool) => Target::MySqlPool(pool),
            DbPool::Postgres(pool) => Target::PgPool(pool),
            DbPool::Sqlite(pool) => Target::SqlitePool(pool),
        }
    }

    async fn acquire(&self) -> DbResult<DbConnection> {
        let conn = match self {
            DbPool::MySql(pool) => pool.acquire().await.map(DbConnection::MySql),
            DbPool::Postgres(pool) => pool.acquire().await.map(DbConnection::Postgres),
            DbPool::Sqlite(pool) => pool.acquire().await.map(DbConnection::Sqlite),
        };
        conn.map_err(|e| crate::pg::classify_for(self.engine(), e.into()))
    }

    async fn begin(&self) -> DbResult<DbTransaction<'static>> {
        let tx = match self {
            DbPool::MySql(pool) => pool.begin().await.map(DbTransaction::MySql),
            DbPool::Postgres(pool) => pool.begin().await.map(DbTransaction::Postgres),
            DbPool::Sqlite(pool) => pool.begin().await.map(DbTransaction::Sqlite),
        };
        tx.map_err(|e| crate::pg::classify_for(self.engine(), e.into()))
    }
}

/// Mark `pool` closed and shut its connections down on a spawned task.
///
/// Creating sqlx's close future marks the pool closed at once, so new
/// acquires fail immediately. Idle connections close on the task; leased
/// ones keep working and close when they are returned.
pub(crate) fn close_in_background<DB: sqlx::Database>(pool: &Pool<DB>) {
    drop(pool.close());
    let pool = pool.clone();
    tokio::spawn(async move { pool.close().await });
}

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Open connections, leased or idle
    pub size: u32,
    pub idle: usize,
    pub max_open: u32,
}

impl PoolStats {
    pub fn in_use(&self) -> usize {
        (self.size as usize).saturating_sub(self.idle)
    }
}

/// A pool handle.
///
/// Cloning is cheap; clones share the pool and the fault slot.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    options: PoolOptions,
    session: Session,
    fault: Arc<FaultInjector>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("id", &self.session.id)
            .field("engine", &self.session.engine)
            .field("options", &self.options)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Build the DSN for `config` and connect under its connect timeout.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let dsn = dsn::build(&config)?;
        crate::db::connect::connect(
            config.engine.protocol_name(),
            &dsn,
            Some(config.connect_timeout_or_default()),
            &config.pool,
        )
        .await
    }

    pub(crate) fn from_pool(pool: DbPool, options: PoolOptions, facade: &FacadeOptions) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let session = Session {
            engine: pool.engine(),
            id: Arc::from(&id[..8]),
            io: IoTimeouts {
                read: facade.read_timeout,
                write: facade.write_timeout,
            },
            logger: log::default_sink(),
        };
        Self {
            pool,
            options,
            session,
            fault: Arc::new(FaultInjector::new()),
        }
    }

    /// Replace the log sink for this handle and everything it creates.
    pub fn with_logger(mut self, logger: Arc<dyn LogSink>) -> Self {
        self.session.logger = logger;
        self
    }

    /// Share a fault slot with another owner, typically a test.
    pub fn with_fault_injector(mut self, fault: Arc<FaultInjector>) -> Self {
        self.fault = fault;
        self
    }

    pub fn fault(&self) -> &FaultInjector {
        &self.fault
    }

    /// Short identifier used in log lines.
    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn engine(&self) -> Engine {
        self.session.engine
    }

    pub fn driver_name(&self) -> &'static str {
        self.session.engine.protocol_name()
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn pool_options(&self) -> &PoolOptions {
        &self.options
    }

    pub fn stats(&self) -> PoolStats {
        let (size, idle) = self.pool.size_and_idle();
        PoolStats {
            size,
            idle,
            max_open: self.options.max_open_or_default(self.session.engine),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    pub async fn ping(&self) -> DbResult<()> {
        self.ping_context(&Context::background()).await
    }

    pub async fn ping_context(&self, ctx: &Context) -> DbResult<()> {
        self.fault.check()?;
        ctx.run("ping", self.pool.target().ping()).await
    }

    /// Close the pool. Idle connections are released; leased connections
    /// stay usable until they are closed or dropped.
    pub fn close(&self) {
        self.session
            .logger
            .info(&Context::background(), "closing pool", &self.session.tags("close"));
        self.pool.close();
    }

    /// Lease a dedicated connection from the pool.
    pub async fn conn(&self, ctx: &Context) -> DbResult<Connection> {
        self.fault.check()?;
        let conn = ctx.run("acquire", self.pool.acquire()).await?;
        Ok(Connection::new(conn, self.session.clone()))
    }

    pub async fn begin(&self) -> DbResult<Transaction<'static>> {
        self.begin_context(&Context::background()).await
    }

    pub async fn begin_context(&self, ctx: &Context) -> DbResult<Transaction<'static>> {
        self.fault.check()?;
        let tx = ctx.run("begin", self.pool.begin()).await?;
        self.session
            .logger
            .debug(ctx, "transaction started", &self.session.tags("begin"));
        Ok(Transaction::new(tx, self.session.clone()))
    }

    pub async fn prepare(&self, sql: &str) -> DbResult<Statement<Database>> {
        self.prepare_context(&Context::background(), sql).await
    }

    /// Validate `sql` on the server and return a reusable statement.
    pub async fn prepare_context(&self, ctx: &Context, sql: &str) -> DbResult<Statement<Database>> {
        self.fault.check()?;
        self.session.prepare(ctx, self.pool.target(), sql).await?;
        Ok(Statement::new(self.clone(), sql))
    }

    pub async fn prepare_named(&self, sql: &str) -> DbResult<NamedStatement<Database>> {
        self.prepare_named_context(&Context::background(), sql).await
    }

    pub async fn prepare_named_context(
        &self,
        ctx: &Context,
        sql: &str,
    ) -> DbResult<NamedStatement<Database>> {
        self.fault.check()?;
        let query = named::compile(self.session.engine, sql);
        self.session.prepare(ctx, self.pool.target(), query.sql()).await?;
        Ok(NamedStatement::new(self.clone(), query))
    }

    /// Rewrite `?` placeholders into this engine's style.
    pub fn rebind(&self, sql: &str) -> String {
        named::rebind(self.session.engine, sql)
    }

    /// Compile `:name` parameters and bind them from `arg`.
    pub fn bind_named<A: Serialize + ?Sized>(&self, sql: &str, arg: &A) -> DbResult<(String, Vec<Value>)> {
        named::bind_named(self.session.engine, sql, arg)
    }

    /// Compile `:name` parameters without binding.
    pub fn compile_named(&self, sql: &str) -> NamedQuery {
        named::compile(self.session.engine, sql)
    }

    pub async fn exec_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        self.fault.check()?;
        self.session.exec(ctx, self.pool.target(), sql, args).await
    }

    pub async fn query_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows> {
        self.fault.check()?;
        self.session.query(ctx, self.pool.target(), sql, args).await
    }

    pub async fn query_row_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Row {
        Row::from_rows(self.query_context(ctx, sql, args).await)
    }

    pub(crate) fn log_connected(&self, dsn: &str) {
        let mut tags = self.session.tags("connect").to_vec();
        tags.push(Tag::new("dsn", dsn::redact(dsn)));
        tags.push(Tag::new("max_open", self.options.max_open_or_default(self.session.engine)));
        self.session
            .logger
            .info(&Context::background(), "connected", &tags);
    }
}

#[async_trait]
impl Queryable for Database {
    fn engine(&self) -> Engine {
        self.session.engine
    }

    async fn exec_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        Database::exec_context(self, ctx, sql, args).await
    }

    async fn query_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows> {
        Database::query_context(self, ctx, sql, args).await
    }

    async fn query_row_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Row {
        Database::query_row_context(self, ctx, sql, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    async fn memory() -> Database {
        let options = PoolOptions::default();
        let pool = DbPool::connect(
            Engine::Sqlite,
            "sqlite::memory:",
            &FacadeOptions::default(),
            &options,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        Database::from_pool(pool, options, &FacadeOptions::default())
    }

    #[tokio::test]
    async fn test_database_basics() {
        let db = memory().await;
        assert_eq!(db.engine(), Engine::Sqlite);
        assert_eq!(db.driver_name(), "sqlite3");
        assert_eq!(db.id().len(), 8);
        db.ping().await.unwrap();

        let stats = db.stats();
        assert_eq!(stats.max_open, 1);
        assert!(stats.size >= 1);
        assert!(format!("{db:?}").contains("Database"));
    }

    #[tokio::test]
    async fn test_fault_fires_once_without_touching_pool() {
        let db = memory().await;
        db.fault().arm(DbError::other("boom"));

        let err = db
            .exec_context(&Context::background(), "SELECT 1", &[])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        db.exec_context(&Context::background(), "SELECT 1", &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_fault_slot() {
        let db = memory().await;
        let clone = db.clone();
        db.fault().arm(DbError::other("shared"));
        assert!(clone.ping().await.is_err());
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_close_then_operations_fail() {
        let db = memory().await;
        db.close();
        assert!(db.is_closed());
        let err = db
            .query_context(&Context::background(), "SELECT 1", &[])
            .await
            .unwrap_err();
        assert!(err.is_closed());
    }

    #[tokio::test]
    async fn test_expired_context_fails_before_io() {
        let db = memory().await;
        let ctx = Context::with_timeout(Duration::ZERO);
        let err = db.conn(&ctx).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_rebind_and_bind_named() {
        let db = memory().await;
        assert_eq!(db.rebind("SELECT ?"), "SELECT ?");
        let (sql, args) = db
            .bind_named("SELECT :a", &serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(sql, "SELECT ?");
        assert_eq!(args, crate::args![1]);
        assert_eq!(db.compile_named("SELECT :a").names(), ["a"]);
    }
}

//! A single leased pool connection.

use crate::context::Context;
use crate::db::fault::FaultInjector;
use crate::db::named;
use crate::db::queryable::{Queryable, Session};
use crate::db::row::{ExecResult, Row, Rows};
use crate::db::statement::{NamedStatement, Statement};
use crate::db::target::Target;
use crate::db::transaction::{DbTransaction, Transaction};
use crate::db::{Engine, Value};
use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{MySql, Postgres, Sqlite};

#[derive(Debug)]
pub(crate) enum DbConnection {
    MySql(PoolConnection<MySql>),
    Postgres(PoolConnection<Postgres>),
    Sqlite(PoolConnection<Sqlite>),
}

impl DbConnection {
    fn target(&mut self) -> Target<'_> {
        match self {
            DbConnection::MySql(conn) => Target::MySqlConn(&mut **conn),
            DbConnection::Postgres(conn) => Target::PgConn(&mut **conn),
            DbConnection::Sqlite(conn) => Target::SqliteConn(&mut **conn),
        }
    }

    async fn begin(&mut self) -> DbResult<DbTransaction<'_>> {
        use sqlx::Connection as _;

        Ok(match self {
            DbConnection::MySql(conn) => DbTransaction::MySql(conn.begin().await?),
            DbConnection::Postgres(conn) => DbTransaction::Postgres(
                conn.begin()
                    .await
                    .map_err(|e| crate::pg::classify(e.into()))?,
            ),
            DbConnection::Sqlite(conn) => DbTransaction::Sqlite(conn.begin().await?),
        })
    }
}

/// A connection leased from a [`Database`](crate::db::Database) pool.
///
/// Returned to the pool by [`Connection::close`] or on drop. Every
/// operation after `close` fails with [`DbError::ConnectionDone`].
pub struct Connection {
    conn: Option<DbConnection>,
    session: Session,
    fault: FaultInjector,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("handle", &self.session.id)
            .field("engine", &self.session.engine)
            .field("closed", &self.conn.is_none())
            .finish_non_exhaustive()
    }
}

impl Connection {
    pub(crate) fn new(conn: DbConnection, session: Session) -> Self {
        Self {
            conn: Some(conn),
            session,
            fault: FaultInjector::new(),
        }
    }

    pub fn fault(&self) -> &FaultInjector {
        &self.fault
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn live(&mut self) -> DbResult<&mut DbConnection> {
        self.fault.check()?;
        self.conn.as_mut().ok_or(DbError::ConnectionDone)
    }

    pub async fn ping(&mut self) -> DbResult<()> {
        self.ping_context(&Context::background()).await
    }

    pub async fn ping_context(&mut self, ctx: &Context) -> DbResult<()> {
        let conn = self.live()?;
        ctx.run("ping", conn.target().ping()).await
    }

    /// Start a transaction on this connection.
    ///
    /// The connection stays borrowed until the transaction ends.
    pub async fn begin(&mut self) -> DbResult<Transaction<'_>> {
        self.begin_context(&Context::background()).await
    }

    pub async fn begin_context(&mut self, ctx: &Context) -> DbResult<Transaction<'_>> {
        let session = self.session.clone();
        let conn = self.live()?;
        let tx = ctx.run("begin", conn.begin()).await?;
        Ok(Transaction::new(tx, session))
    }

    pub async fn prepare(&mut self, sql: &str) -> DbResult<Statement<&mut Connection>> {
        self.prepare_context(&Context::background(), sql).await
    }

    pub async fn prepare_context(
        &mut self,
        ctx: &Context,
        sql: &str,
    ) -> DbResult<Statement<&mut Connection>> {
        let session = self.session.clone();
        let conn = self.live()?;
        session.prepare(ctx, conn.target(), sql).await?;
        Ok(Statement::new(self, sql))
    }

    pub async fn prepare_named(&mut self, sql: &str) -> DbResult<NamedStatement<&mut Connection>> {
        self.prepare_named_context(&Context::background(), sql).await
    }

    pub async fn prepare_named_context(
        &mut self,
        ctx: &Context,
        sql: &str,
    ) -> DbResult<NamedStatement<&mut Connection>> {
        let query = named::compile(self.session.engine, sql);
        let session = self.session.clone();
        let conn = self.live()?;
        session.prepare(ctx, conn.target(), query.sql()).await?;
        Ok(NamedStatement::new(self, query))
    }

    /// Return the connection to the pool.
    pub async fn close(&mut self) -> DbResult<()> {
        self.fault.check()?;
        match self.conn.take() {
            Some(conn) => {
                drop(conn);
                Ok(())
            }
            None => Err(DbError::ConnectionDone),
        }
    }
}

#[async_trait]
impl Queryable for Connection {
    fn engine(&self) -> Engine {
        self.session.engine
    }

    async fn exec_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        let session = self.session.clone();
        let conn = self.live()?;
        session.exec(ctx, conn.target(), sql, args).await
    }

    async fn query_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows> {
        let session = self.session.clone();
        let conn = self.live()?;
        session.query(ctx, conn.target(), sql, args).await
    }

    async fn query_row_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Row {
        Row::from_rows(self.query_context(ctx, sql, args).await)
    }
}

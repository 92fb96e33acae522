//! Database transactions.
//!
//! A [`Transaction`] owns one connection until it is committed or rolled
//! back. Dropping an active transaction rolls it back.

use crate::context::Context;
use crate::db::fault::FaultInjector;
use crate::db::named;
use crate::db::queryable::{Queryable, Session};
use crate::db::row::{ExecResult, Row, Rows};
use crate::db::statement::{NamedStatement, Statement};
use crate::db::target::Target;
use crate::db::{Engine, Value};
use crate::error::{DbError, DbResult};
use crate::log::Tag;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Postgres, Sqlite};

/// Database-specific transaction wrapper.
pub(crate) enum DbTransaction<'c> {
    MySql(sqlx::Transaction<'c, MySql>),
    Postgres(sqlx::Transaction<'c, Postgres>),
    Sqlite(sqlx::Transaction<'c, Sqlite>),
}

impl DbTransaction<'_> {
    fn target(&mut self) -> Target<'_> {
        match self {
            DbTransaction::MySql(tx) => Target::MySqlConn(&mut **tx),
            DbTransaction::Postgres(tx) => Target::PgConn(&mut **tx),
            DbTransaction::Sqlite(tx) => Target::SqliteConn(&mut **tx),
        }
    }

    async fn commit(self) -> DbResult<()> {
        match self {
            DbTransaction::MySql(tx) => tx.commit().await.map_err(DbError::from),
            DbTransaction::Postgres(tx) => tx
                .commit()
                .await
                .map_err(|e| crate::pg::classify(e.into())),
            DbTransaction::Sqlite(tx) => tx.commit().await.map_err(DbError::from),
        }
    }

    async fn rollback(self) -> DbResult<()> {
        match self {
            DbTransaction::MySql(tx) => tx.rollback().await.map_err(DbError::from),
            DbTransaction::Postgres(tx) => tx
                .rollback()
                .await
                .map_err(|e| crate::pg::classify(e.into())),
            DbTransaction::Sqlite(tx) => tx.rollback().await.map_err(DbError::from),
        }
    }
}

/// An open transaction.
///
/// `commit` and `rollback` are terminal: afterwards every operation,
/// including a second terminal call, fails with [`DbError::TransactionDone`].
pub struct Transaction<'c> {
    tx: Option<DbTransaction<'c>>,
    session: Session,
    fault: FaultInjector,
    started_at: DateTime<Utc>,
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("handle", &self.session.id)
            .field("engine", &self.session.engine)
            .field("started_at", &self.started_at)
            .field("done", &self.tx.is_none())
            .finish_non_exhaustive()
    }
}

impl<'c> Transaction<'c> {
    pub(crate) fn new(tx: DbTransaction<'c>, session: Session) -> Self {
        Self {
            tx: Some(tx),
            session,
            fault: FaultInjector::new(),
            started_at: Utc::now(),
        }
    }

    pub fn fault(&self) -> &FaultInjector {
        &self.fault
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// True once committed or rolled back.
    pub fn is_done(&self) -> bool {
        self.tx.is_none()
    }

    fn live(&mut self) -> DbResult<&mut DbTransaction<'c>> {
        self.fault.check()?;
        self.tx.as_mut().ok_or(DbError::TransactionDone)
    }

    fn take(&mut self) -> DbResult<DbTransaction<'c>> {
        self.fault.check()?;
        self.tx.take().ok_or(DbError::TransactionDone)
    }

    pub async fn commit(&mut self) -> DbResult<()> {
        let tx = self.take()?;
        let result = tx.commit().await;
        self.log_end("commit", &result);
        result
    }

    pub async fn rollback(&mut self) -> DbResult<()> {
        let tx = self.take()?;
        let result = tx.rollback().await;
        self.log_end("rollback", &result);
        result
    }

    fn log_end(&self, op: &str, result: &DbResult<()>) {
        let ctx = Context::background();
        let mut tags = self.session.tags(op).to_vec();
        let elapsed = Utc::now() - self.started_at;
        tags.push(Tag::new("duration_ms", elapsed.num_milliseconds()));
        match result {
            Ok(()) => self.session.logger.debug(&ctx, "transaction finished", &tags),
            Err(err) => self.session.logger.warn(&ctx, &err.to_string(), &tags),
        }
    }

    pub async fn prepare(&mut self, sql: &str) -> DbResult<Statement<&mut Transaction<'c>>> {
        self.prepare_context(&Context::background(), sql).await
    }

    pub async fn prepare_context(
        &mut self,
        ctx: &Context,
        sql: &str,
    ) -> DbResult<Statement<&mut Transaction<'c>>> {
        let session = self.session.clone();
        let tx = self.live()?;
        session.prepare(ctx, tx.target(), sql).await?;
        Ok(Statement::new(self, sql))
    }

    pub async fn prepare_named(&mut self, sql: &str) -> DbResult<NamedStatement<&mut Transaction<'c>>> {
        self.prepare_named_context(&Context::background(), sql).await
    }

    pub async fn prepare_named_context(
        &mut self,
        ctx: &Context,
        sql: &str,
    ) -> DbResult<NamedStatement<&mut Transaction<'c>>> {
        let query = named::compile(self.session.engine, sql);
        let session = self.session.clone();
        let tx = self.live()?;
        session.prepare(ctx, tx.target(), query.sql()).await?;
        Ok(NamedStatement::new(self, query))
    }

    /// Re-bind a statement prepared elsewhere to this transaction.
    pub async fn stmt<H: Queryable>(
        &mut self,
        stmt: &Statement<H>,
    ) -> DbResult<Statement<&mut Transaction<'c>>> {
        self.prepare(stmt.sql()).await
    }

    /// Named form of [`Transaction::stmt`].
    pub async fn named_stmt<H: Queryable>(
        &mut self,
        stmt: &NamedStatement<H>,
    ) -> DbResult<NamedStatement<&mut Transaction<'c>>> {
        let session = self.session.clone();
        let tx = self.live()?;
        session
            .prepare(&Context::background(), tx.target(), stmt.named_query().sql())
            .await?;
        Ok(NamedStatement::new(self, stmt.named_query().clone()))
    }
}

#[async_trait]
impl<'c> Queryable for Transaction<'c> {
    fn engine(&self) -> Engine {
        self.session.engine
    }

    async fn exec_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        let session = self.session.clone();
        let tx = self.live()?;
        session.exec(ctx, tx.target(), sql, args).await
    }

    async fn query_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows> {
        let session = self.session.clone();
        let tx = self.live()?;
        session.query(ctx, tx.target(), sql, args).await
    }

    async fn query_row_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Row {
        Row::from_rows(self.query_context(ctx, sql, args).await)
    }
}

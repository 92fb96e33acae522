//! The operation surface shared by every handle.
//!
//! Implementors provide the three `*_context` primitives; the
//! convenience forms (no context, decoding, named parameters) come for free.

use crate::context::Context;
use crate::db::named;
use crate::db::row::{ExecResult, Row, Rows};
use crate::db::target::Target;
use crate::db::{Engine, Value};
use crate::error::DbResult;
use crate::log::{LogSink, Tag};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Queryable: Send {
    fn engine(&self) -> Engine;

    /// Run a statement that returns no rows.
    async fn exec_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult>;

    /// Run a statement and buffer every result set it produces.
    async fn query_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows>;

    /// Run a statement and keep its first row. Errors are deferred to the [`Row`].
    async fn query_row_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Row;

    async fn exec(&mut self, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        self.exec_context(&Context::background(), sql, args).await
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> DbResult<Rows> {
        self.query_context(&Context::background(), sql, args).await
    }

    async fn query_row(&mut self, sql: &str, args: &[Value]) -> Row {
        self.query_row_context(&Context::background(), sql, args).await
    }

    /// Decode the first row: a scalar for one column, a struct otherwise.
    async fn get_context<T>(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.query_row_context(ctx, sql, args).await.get()
    }

    async fn get<T>(&mut self, sql: &str, args: &[Value]) -> DbResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.get_context(&Context::background(), sql, args).await
    }

    /// Decode every row of the first result set.
    async fn select_context<T>(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.query_context(ctx, sql, args).await?.collect()
    }

    async fn select<T>(&mut self, sql: &str, args: &[Value]) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.select_context(&Context::background(), sql, args).await
    }

    /// Run a statement with `:name` parameters taken from `arg`.
    async fn named_exec_context<A>(&mut self, ctx: &Context, sql: &str, arg: &A) -> DbResult<ExecResult>
    where
        A: Serialize + Sync + ?Sized,
    {
        let (sql, args) = named::bind_named(self.engine(), sql, arg)?;
        self.exec_context(ctx, &sql, &args).await
    }

    async fn named_exec<A>(&mut self, sql: &str, arg: &A) -> DbResult<ExecResult>
    where
        A: Serialize + Sync + ?Sized,
    {
        self.named_exec_context(&Context::background(), sql, arg).await
    }

    async fn named_query_context<A>(&mut self, ctx: &Context, sql: &str, arg: &A) -> DbResult<Rows>
    where
        A: Serialize + Sync + ?Sized,
    {
        let (sql, args) = named::bind_named(self.engine(), sql, arg)?;
        self.query_context(ctx, &sql, &args).await
    }

    async fn named_query<A>(&mut self, sql: &str, arg: &A) -> DbResult<Rows>
    where
        A: Serialize + Sync + ?Sized,
    {
        self.named_query_context(&Context::background(), sql, arg).await
    }
}

#[async_trait]
impl<T: Queryable + ?Sized> Queryable for &mut T {
    fn engine(&self) -> Engine {
        (**self).engine()
    }

    async fn exec_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        (**self).exec_context(ctx, sql, args).await
    }

    async fn query_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows> {
        (**self).query_context(ctx, sql, args).await
    }

    async fn query_row_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Row {
        (**self).query_row_context(ctx, sql, args).await
    }
}

/// Default per-operation deadlines, taken from the DSN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct IoTimeouts {
    pub(crate) read: Option<Duration>,
    pub(crate) write: Option<Duration>,
}

/// What every handle needs to run and log an operation.
#[derive(Clone)]
pub(crate) struct Session {
    pub(crate) engine: Engine,
    pub(crate) id: Arc<str>,
    pub(crate) io: IoTimeouts,
    pub(crate) logger: Arc<dyn LogSink>,
}

impl Session {
    pub(crate) fn tags(&self, op: &str) -> [Tag; 3] {
        [
            Tag::new("engine", self.engine),
            Tag::new("handle", &self.id),
            Tag::new("op", op),
        ]
    }

    pub(crate) async fn exec(
        &self,
        ctx: &Context,
        target: Target<'_>,
        sql: &str,
        args: &[Value],
    ) -> DbResult<ExecResult> {
        let ctx = ctx.or_timeout(self.io.write);
        self.logger.debug(&ctx, sql, &self.tags("exec"));
        let result = ctx.run("exec", target.execute(sql, args)).await;
        if let Err(err) = &result {
            self.logger.warn(&ctx, &err.to_string(), &self.tags("exec"));
        }
        result
    }

    pub(crate) async fn query(
        &self,
        ctx: &Context,
        target: Target<'_>,
        sql: &str,
        args: &[Value],
    ) -> DbResult<Rows> {
        let ctx = ctx.or_timeout(self.io.read);
        self.logger.debug(&ctx, sql, &self.tags("query"));
        let result = ctx.run("query", target.fetch(sql, args)).await;
        match &result {
            Err(err) => self.logger.warn(&ctx, &err.to_string(), &self.tags("query")),
            Ok(rows) => {
                if let Some(err) = rows.err() {
                    self.logger.warn(&ctx, &err.to_string(), &self.tags("query"));
                }
            }
        }
        result
    }

    pub(crate) async fn prepare(&self, ctx: &Context, target: Target<'_>, sql: &str) -> DbResult<()> {
        self.logger.debug(ctx, sql, &self.tags("prepare"));
        ctx.run("prepare", target.prepare(sql)).await.map(drop)
    }
}

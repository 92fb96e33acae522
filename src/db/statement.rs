//! Prepared statements.
//!
//! A statement remembers its SQL and runs it against the handle that
//! prepared it (or a transaction it was re-bound to). sqlx caches the
//! server-side prepared form per connection, so re-running is cheap.

use crate::context::Context;
use crate::db::Value;
use crate::db::fault::FaultInjector;
use crate::db::named::NamedQuery;
use crate::db::queryable::Queryable;
use crate::db::row::{ExecResult, Row, Rows};
use crate::error::{DbError, DbResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A statement with positional arguments.
#[derive(Debug)]
pub struct Statement<H: Queryable> {
    parent: H,
    sql: String,
    fault: FaultInjector,
    closed: bool,
}

impl<H: Queryable> Statement<H> {
    /// Wrap `sql` for repeated execution on `parent`. No server round-trip.
    pub fn new(parent: H, sql: impl Into<String>) -> Self {
        Self {
            parent,
            sql: sql.into(),
            fault: FaultInjector::new(),
            closed: false,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn fault(&self) -> &FaultInjector {
        &self.fault
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check(&self) -> DbResult<()> {
        self.fault.check()?;
        if self.closed {
            return Err(DbError::StatementClosed);
        }
        Ok(())
    }

    pub async fn exec(&mut self, args: &[Value]) -> DbResult<ExecResult> {
        self.exec_context(&Context::background(), args).await
    }

    pub async fn exec_context(&mut self, ctx: &Context, args: &[Value]) -> DbResult<ExecResult> {
        self.check()?;
        self.parent.exec_context(ctx, &self.sql, args).await
    }

    pub async fn query(&mut self, args: &[Value]) -> DbResult<Rows> {
        self.query_context(&Context::background(), args).await
    }

    pub async fn query_context(&mut self, ctx: &Context, args: &[Value]) -> DbResult<Rows> {
        self.check()?;
        self.parent.query_context(ctx, &self.sql, args).await
    }

    pub async fn query_row(&mut self, args: &[Value]) -> Row {
        self.query_row_context(&Context::background(), args).await
    }

    pub async fn query_row_context(&mut self, ctx: &Context, args: &[Value]) -> Row {
        if let Err(err) = self.check() {
            return Row::from_error(err);
        }
        self.parent.query_row_context(ctx, &self.sql, args).await
    }

    pub async fn get<T: DeserializeOwned + Send>(&mut self, args: &[Value]) -> DbResult<T> {
        self.get_context(&Context::background(), args).await
    }

    pub async fn get_context<T: DeserializeOwned + Send>(
        &mut self,
        ctx: &Context,
        args: &[Value],
    ) -> DbResult<T> {
        self.query_row_context(ctx, args).await.get()
    }

    pub async fn select<T: DeserializeOwned + Send>(&mut self, args: &[Value]) -> DbResult<Vec<T>> {
        self.select_context(&Context::background(), args).await
    }

    pub async fn select_context<T: DeserializeOwned + Send>(
        &mut self,
        ctx: &Context,
        args: &[Value],
    ) -> DbResult<Vec<T>> {
        self.query_context(ctx, args).await?.collect()
    }

    /// Close the statement. A second close fails with `StatementClosed`.
    pub fn close(&mut self) -> DbResult<()> {
        self.check()?;
        self.closed = true;
        Ok(())
    }
}

/// A statement with `:name` parameters, bound from a struct or map.
#[derive(Debug)]
pub struct NamedStatement<H: Queryable> {
    parent: H,
    query: NamedQuery,
    fault: FaultInjector,
    closed: bool,
}

impl<H: Queryable> NamedStatement<H> {
    pub fn new(parent: H, query: NamedQuery) -> Self {
        Self {
            parent,
            query,
            fault: FaultInjector::new(),
            closed: false,
        }
    }

    pub fn named_query(&self) -> &NamedQuery {
        &self.query
    }

    pub fn fault(&self) -> &FaultInjector {
        &self.fault
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn bind<A: Serialize + ?Sized>(&self, arg: &A) -> DbResult<Vec<Value>> {
        self.fault.check()?;
        if self.closed {
            return Err(DbError::StatementClosed);
        }
        self.query.bind(arg)
    }

    pub async fn exec<A: Serialize + Sync + ?Sized>(&mut self, arg: &A) -> DbResult<ExecResult> {
        self.exec_context(&Context::background(), arg).await
    }

    pub async fn exec_context<A: Serialize + Sync + ?Sized>(
        &mut self,
        ctx: &Context,
        arg: &A,
    ) -> DbResult<ExecResult> {
        let args = self.bind(arg)?;
        self.parent.exec_context(ctx, self.query.sql(), &args).await
    }

    pub async fn query<A: Serialize + Sync + ?Sized>(&mut self, arg: &A) -> DbResult<Rows> {
        self.query_context(&Context::background(), arg).await
    }

    pub async fn query_context<A: Serialize + Sync + ?Sized>(
        &mut self,
        ctx: &Context,
        arg: &A,
    ) -> DbResult<Rows> {
        let args = self.bind(arg)?;
        self.parent.query_context(ctx, self.query.sql(), &args).await
    }

    pub async fn query_row<A: Serialize + Sync + ?Sized>(&mut self, arg: &A) -> Row {
        self.query_row_context(&Context::background(), arg).await
    }

    pub async fn query_row_context<A: Serialize + Sync + ?Sized>(
        &mut self,
        ctx: &Context,
        arg: &A,
    ) -> Row {
        match self.bind(arg) {
            Ok(args) => {
                self.parent
                    .query_row_context(ctx, self.query.sql(), &args)
                    .await
            }
            Err(err) => Row::from_error(err),
        }
    }

    pub async fn get<T, A>(&mut self, arg: &A) -> DbResult<T>
    where
        T: DeserializeOwned + Send,
        A: Serialize + Sync + ?Sized,
    {
        self.query_row(arg).await.get()
    }

    pub async fn select<T, A>(&mut self, arg: &A) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
        A: Serialize + Sync + ?Sized,
    {
        self.query(arg).await?.collect()
    }

    pub fn close(&mut self) -> DbResult<()> {
        self.fault.check()?;
        if self.closed {
            return Err(DbError::StatementClosed);
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Engine, ResultSet};
    use crate::testing::{Fake, Reply};

    fn fake() -> Fake {
        let fake = Fake::new(Engine::MySql);
        fake.on("exec", |_, args| Ok(Reply::exec(args.len() as u64, Some(9))));
        fake.on("query", |sql, _| {
            Ok(Reply::rows(vec![ResultSet::from_names(
                &["sql"],
                vec![crate::args![sql]],
            )]))
        });
        fake
    }

    #[tokio::test]
    async fn test_statement_runs_on_parent() {
        let mut fake = fake();
        let mut stmt = Statement::new(&mut fake, "UPDATE t SET a = ?");
        let result = stmt.exec(&crate::args![1]).await.unwrap();
        assert_eq!(result, ExecResult::new(1, Some(9)));

        let sql: String = stmt.get(&[]).await.unwrap();
        assert_eq!(sql, "UPDATE t SET a = ?");
        drop(stmt);
        assert_eq!(fake.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_statement_fault_is_one_shot() {
        let mut fake = fake();
        let mut stmt = Statement::new(&mut fake, "SELECT 1");
        stmt.fault().arm(DbError::other("injected"));

        let err = stmt.exec(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "injected");
        assert!(stmt.exec(&[]).await.is_ok());
        drop(stmt);
        // the failed call never reached the parent
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_statement_closed() {
        let mut fake = fake();
        let mut stmt = Statement::new(&mut fake, "SELECT 1");
        stmt.close().unwrap();
        assert!(stmt.is_closed());
        assert!(matches!(stmt.close(), Err(DbError::StatementClosed)));
        assert!(matches!(stmt.exec(&[]).await, Err(DbError::StatementClosed)));
        assert!(matches!(stmt.query(&[]).await, Err(DbError::StatementClosed)));
        assert!(matches!(
            stmt.query_row(&[]).await.err(),
            Some(DbError::StatementClosed)
        ));
    }

    #[tokio::test]
    async fn test_named_statement() {
        #[derive(Serialize)]
        struct Args {
            id: i64,
        }

        let mut fake = fake();
        let query = crate::db::named::compile(Engine::MySql, "SELECT * FROM t WHERE id = :id");
        let mut stmt = NamedStatement::new(&mut fake, query);

        let sql: String = stmt.get(&Args { id: 1 }).await.unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE id = ?");
        assert_eq!(stmt.exec(&Args { id: 1 }).await.unwrap().rows_affected, 1);

        stmt.close().unwrap();
        assert!(matches!(
            stmt.exec(&Args { id: 1 }).await,
            Err(DbError::StatementClosed)
        ));
    }
}

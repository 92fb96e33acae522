//! A programmable [`Queryable`] for callers' unit tests.
//!
//! ```
//! use multidb::db::{Engine, Queryable, ResultSet};
//! use multidb::testing::{Fake, Reply};
//!
//! # tokio_test::block_on(async {
//! let mut fake = Fake::new(Engine::Postgres);
//! fake.on("query", |_, _| {
//!     Ok(Reply::rows(vec![ResultSet::from_names(&["n"], vec![multidb::args![1]])]))
//! });
//! let n: i64 = fake.get("SELECT 1", &[]).await.unwrap();
//! assert_eq!(n, 1);
//! # });
//! ```

use crate::context::Context;
use crate::db::fault::FaultInjector;
use crate::db::row::{ExecResult, ResultSet, Row, Rows};
use crate::db::{Engine, Queryable, Value};
use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// What a handler answers with.
#[derive(Debug)]
pub enum Reply {
    Exec(ExecResult),
    Rows(Rows),
}

impl Reply {
    pub fn exec(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Reply::Exec(ExecResult::new(rows_affected, last_insert_id))
    }

    pub fn rows(sets: Vec<ResultSet>) -> Self {
        Reply::Rows(Rows::new(sets))
    }
}

/// One recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: String,
    pub sql: String,
    pub args: Vec<Value>,
}

type Handler = Arc<dyn Fn(&str, &[Value]) -> DbResult<Reply> + Send + Sync>;

/// A fake handle answering from per-operation callbacks.
///
/// Operations are `"exec"`, `"query"` and `"query_row"`; the latter falls
/// back to the `"query"` handler. An operation with no handler fails with
/// `no fake registered for <op>`.
#[derive(Clone)]
pub struct Fake {
    engine: Engine,
    handlers: Arc<Mutex<HashMap<String, Handler>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    fault: Arc<FaultInjector>,
}

impl std::fmt::Debug for Fake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fake")
            .field("engine", &self.engine)
            .field("calls", &self.calls().len())
            .finish_non_exhaustive()
    }
}

impl Fake {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            handlers: Arc::default(),
            calls: Arc::default(),
            fault: Arc::new(FaultInjector::new()),
        }
    }

    /// Register (or replace) the handler for `op`.
    pub fn on<F>(&self, op: &str, handler: F)
    where
        F: Fn(&str, &[Value]) -> DbResult<Reply> + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op.to_string(), Arc::new(handler));
    }

    pub fn fault(&self) -> &FaultInjector {
        &self.fault
    }

    /// Every operation that reached a handler lookup, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, ops: &[&str], sql: &str, args: &[Value]) -> DbResult<Reply> {
        self.fault.check()?;
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                op: ops[0].to_string(),
                sql: sql.to_string(),
                args: args.to_vec(),
            });

        let handler = {
            let handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
            ops.iter().find_map(|op| handlers.get(*op).cloned())
        };
        match handler {
            Some(handler) => handler(sql, args),
            None => Err(DbError::other(format!("no fake registered for {}", ops[0]))),
        }
    }
}

fn unexpected(op: &str, reply: Reply) -> DbError {
    DbError::other(format!("fake {op} handler returned {reply:?}"))
}

#[async_trait]
impl Queryable for Fake {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn exec_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        ctx.run("exec", async {
            match self.dispatch(&["exec"], sql, args)? {
                Reply::Exec(result) => Ok(result),
                other => Err(unexpected("exec", other)),
            }
        })
        .await
    }

    async fn query_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> DbResult<Rows> {
        ctx.run("query", async {
            match self.dispatch(&["query"], sql, args)? {
                Reply::Rows(rows) => Ok(rows),
                other => Err(unexpected("query", other)),
            }
        })
        .await
    }

    async fn query_row_context(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Row {
        let rows = ctx
            .run("query_row", async {
                match self.dispatch(&["query_row", "query"], sql, args)? {
                    Reply::Rows(rows) => Ok(rows),
                    other => Err(unexpected("query_row", other)),
                }
            })
            .await;
        Row::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Statement;

    #[tokio::test]
    async fn test_unregistered_operation() {
        let mut fake = Fake::new(Engine::Sqlite);
        let err = fake.exec("DELETE FROM t", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "no fake registered for exec");

        let row = fake.query_row("SELECT 1", &[]).await;
        assert_eq!(
            row.err().map(ToString::to_string).as_deref(),
            Some("no fake registered for query_row")
        );
    }

    #[tokio::test]
    async fn test_handlers_and_call_log() {
        let mut fake = Fake::new(Engine::MySql);
        fake.on("exec", |sql, _| {
            assert!(sql.starts_with("INSERT"));
            Ok(Reply::exec(1, Some(42)))
        });

        let result = fake
            .exec("INSERT INTO t VALUES (?)", &crate::args!["x"])
            .await
            .unwrap();
        assert_eq!(result.last_insert_id, Some(42));
        assert_eq!(
            fake.calls(),
            vec![Call {
                op: "exec".into(),
                sql: "INSERT INTO t VALUES (?)".into(),
                args: crate::args!["x"],
            }]
        );
    }

    #[tokio::test]
    async fn test_query_row_falls_back_to_query_handler() {
        let mut fake = Fake::new(Engine::Postgres);
        fake.on("query", |_, _| Ok(Reply::rows(vec![ResultSet::default()])));
        let row = fake.query_row("SELECT 1 WHERE false", &[]).await;
        assert!(matches!(row.err(), Some(DbError::NoRows)));
    }

    #[tokio::test]
    async fn test_wrong_reply_kind() {
        let mut fake = Fake::new(Engine::Postgres);
        fake.on("query", |_, _| Ok(Reply::exec(0, None)));
        let err = fake.query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.to_string().starts_with("fake query handler returned"));
    }

    #[tokio::test]
    async fn test_fault_and_statement_over_fake() {
        let mut fake = Fake::new(Engine::Postgres);
        fake.on("exec", |_, _| Ok(Reply::exec(1, None)));
        fake.fault().arm(DbError::ConnectionTimeoutExceeded);

        let mut stmt = Statement::new(&mut fake, "UPDATE t SET a = $1");
        assert!(matches!(
            stmt.exec(&crate::args![1]).await,
            Err(DbError::ConnectionTimeoutExceeded)
        ));
        assert_eq!(stmt.exec(&crate::args![1]).await.unwrap().rows_affected, 1);
    }
}

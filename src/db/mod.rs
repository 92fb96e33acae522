//! The multi-engine database layer.
//!
//! [`connect`] (or [`Database::open`]) yields a pooled [`Database`]. From
//! there a caller can lease a [`Connection`], begin a [`Transaction`] or
//! prepare a [`Statement`]. All of them share the [`Queryable`] surface and
//! each carries its own [`FaultInjector`].

pub mod connect;
pub mod connection;
pub mod dsn;
pub mod engine;
pub mod executor;
pub mod fault;
pub mod named;
pub mod params;
pub mod pool;
pub mod queryable;
pub mod row;
pub mod statement;
pub(crate) mod target;
pub mod transaction;
pub mod types;
pub mod value;

pub use connect::connect;
pub use connection::Connection;
pub use engine::{Engine, Placeholder};
pub use fault::FaultInjector;
pub use named::NamedQuery;
pub use pool::{Database, DbPool, PoolStats};
pub use queryable::Queryable;
pub use row::{ColumnType, ExecResult, ResultSet, Row, Rows};
pub use statement::{NamedStatement, Statement};
pub use transaction::Transaction;
pub use value::Value;

//! multidb
//!
//! A pooled SQL facade over MySQL, PostgreSQL and SQLite: one configuration
//! struct, one connect call with a hard deadline, and the same
//! connection/transaction/statement surface on every engine. PostgreSQL
//! errors are classified into [`pg::PgErrorKind`].

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod log;
pub mod pg;
pub mod testing;

pub use config::{Config, DbConfig, PoolOptions};
pub use context::Context;
pub use db::{Database, connect};
pub use error::{DbError, DbResult};

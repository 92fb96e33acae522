//! Logging sink boundary.
//!
//! The library never installs a global subscriber. Handles log through an
//! injected [`LogSink`]; the default [`TracingSink`] forwards to `tracing`,
//! whose subscriber is the application's business.

use crate::context::Context;
use std::fmt;
use std::sync::Arc;

/// A key/value pair attached to a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

pub trait LogSink: Send + Sync {
    fn debug(&self, ctx: &Context, msg: &str, tags: &[Tag]);
    fn info(&self, ctx: &Context, msg: &str, tags: &[Tag]);
    fn warn(&self, ctx: &Context, msg: &str, tags: &[Tag]);
    fn error(&self, ctx: &Context, msg: &str, tags: &[Tag]);
}

/// Forwards to the `tracing` macros under the `multidb` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn debug(&self, ctx: &Context, msg: &str, tags: &[Tag]) {
        tracing::debug!(target: "multidb", tags = %Tags(tags), remaining = ?ctx.remaining(), "{msg}");
    }

    fn info(&self, ctx: &Context, msg: &str, tags: &[Tag]) {
        tracing::info!(target: "multidb", tags = %Tags(tags), remaining = ?ctx.remaining(), "{msg}");
    }

    fn warn(&self, ctx: &Context, msg: &str, tags: &[Tag]) {
        tracing::warn!(target: "multidb", tags = %Tags(tags), remaining = ?ctx.remaining(), "{msg}");
    }

    fn error(&self, ctx: &Context, msg: &str, tags: &[Tag]) {
        tracing::error!(target: "multidb", tags = %Tags(tags), remaining = ?ctx.remaining(), "{msg}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn debug(&self, _: &Context, _: &str, _: &[Tag]) {}
    fn info(&self, _: &Context, _: &str, _: &[Tag]) {}
    fn warn(&self, _: &Context, _: &str, _: &[Tag]) {}
    fn error(&self, _: &Context, _: &str, _: &[Tag]) {}
}

pub(crate) fn default_sink() -> Arc<dyn LogSink> {
    Arc::new(TracingSink)
}

/// `key=value` pairs separated by spaces.
struct Tags<'a>(&'a [Tag]);

impl fmt::Display for Tags<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", tag.key, tag.value)?;
        }
        Ok(())
    }
}

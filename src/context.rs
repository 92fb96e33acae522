//! Per-operation deadlines.
//!
//! Every `*_context` operation takes a [`Context`]. A context without a
//! deadline never times out; one with a deadline drops the in-flight future
//! when it expires, which makes sqlx abandon the network operation.

use crate::error::{DbError, DbResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Use `fallback` as the timeout when this context has no deadline.
    pub(crate) fn or_timeout(self, fallback: Option<Duration>) -> Self {
        match (self.deadline, fallback) {
            (None, Some(timeout)) => Self::with_timeout(timeout),
            _ => self,
        }
    }

    /// Run `fut` under this context's deadline.
    ///
    /// An already expired context fails without polling `fut`.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> DbResult<T>
    where
        F: Future<Output = DbResult<T>>,
    {
        let Some(deadline) = self.deadline else {
            return fut.await;
        };
        let start = Instant::now();
        if deadline <= start {
            return Err(DbError::timeout(operation, Duration::ZERO));
        }
        match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(DbError::timeout(operation, start.elapsed())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_never_expires() {
        let ctx = Context::background();
        assert!(!ctx.is_expired());
        assert_eq!(ctx.remaining(), None);
        let value = ctx.run("noop", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let ctx = Context::with_timeout(Duration::from_millis(20));
        let result: DbResult<()> = ctx
            .run("sleep", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().starts_with("sleep timed out"));
    }

    #[tokio::test]
    async fn test_expired_context_skips_future() {
        let ctx = Context::with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));

        let polled = std::sync::atomic::AtomicBool::new(false);
        let result: DbResult<()> = ctx
            .run("query", async {
                polled.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DbError::Timeout { .. })));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_or_timeout_keeps_existing_deadline() {
        let ctx = Context::with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.or_timeout(Some(Duration::from_millis(1))), ctx);
        assert!(Context::background().or_timeout(None).deadline().is_none());
        assert!(
            Context::background()
                .or_timeout(Some(Duration::from_secs(1)))
                .deadline()
                .is_some()
        );
    }
}

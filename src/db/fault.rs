//! Single-slot fault injection.
//!
//! Every handle owns a [`FaultInjector`]. Arming it makes exactly the next
//! operation on that handle fail with the armed error without touching the
//! database; the slot is then empty again. The error is an ordinary
//! [`DbError`], indistinguishable from a real one.

use crate::error::{DbError, DbResult};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct FaultInjector {
    slot: Mutex<Option<DbError>>,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot, replacing any error already pending.
    pub fn arm(&self, err: DbError) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
    }

    /// Take the pending error, leaving the slot empty.
    pub fn next_error(&self) -> Option<DbError> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_armed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Fail with the pending error, if any.
    pub(crate) fn check(&self) -> DbResult<()> {
        match self.next_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

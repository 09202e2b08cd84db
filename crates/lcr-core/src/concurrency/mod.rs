//! Admission control for outbound model calls
//!
//! Every model call, task or judge, holds one permit from the same
//! [`ConcurrencyGate`] for its whole retry sequence. The gate bounds total
//! outbound load, not per-role load.

use crate::error::{EvalError, EvalResult};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Shared counting permit pool
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Held while a call is in flight; the slot is released on drop
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate with `capacity` permits (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot. Fails once the gate has been closed.
    pub async fn acquire(&self) -> EvalResult<GatePermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| EvalError::Cancelled)?;
        Ok(GatePermit { _permit: permit })
    }

    /// Stop admitting calls; waiters and later acquisitions fail
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Number of free slots right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

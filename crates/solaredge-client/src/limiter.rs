//! Concurrency limiting for in-flight requests

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::{Result, TransportError};

/// Fixed-size pool of request permits.
///
/// Backed by a fair `tokio::sync::Semaphore`, so waiters are served in
/// arrival order. A permit is returned to the pool when the guard is
/// dropped, which also covers cancelled futures.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Semaphore,
    limit: usize,
}

impl ConcurrencyLimiter {
    pub fn new(limit: usize) -> Self {
        Self {
            semaphore: Semaphore::new(limit),
            limit,
        }
    }

    /// Wait for a permit
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| TransportError::Closed.into())
    }

    /// Configured pool size
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

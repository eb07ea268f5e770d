//! Concurrency limiter gating page fetches
//!
//! A fixed-capacity admission gate backed by a tokio semaphore. Waiters are
//! suspended (never polled) and woken in FIFO order as slots free up. Slots are
//! held by an RAII permit, so they are released on every exit path of the
//! protected operation, including errors and early returns.

use crate::SiteCorpusError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A granted slot; dropping it releases the slot
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
}

/// Capacity-bounded admission gate
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Creates a limiter with `capacity` slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Suspends until a slot is free, then grants it
    pub async fn acquire(&self) -> Result<LimiterPermit, SiteCorpusError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SiteCorpusError::LimiterClosed)?;

        Ok(LimiterPermit { _permit: permit })
    }

    /// Runs `operation` while holding a slot
    pub async fn run<F, T>(&self, operation: F) -> Result<T, SiteCorpusError>
    where
        F: Future<Output = T>,
    {
        let _permit = self.acquire().await?;
        Ok(operation.await)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently free slots
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

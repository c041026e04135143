// src/services/gate.rs
use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::AppError;

/// Counting admission gate over a FIFO-fair [`Semaphore`].
///
/// `acquire` takes a slot or queues the caller; `release` hands the slot to
/// the longest waiter or returns it to the pool. An unmatched `release`
/// silently grows the pool: callers must pair them, or use
/// [`ConcurrencyGate::permit`] which releases on drop.
#[derive(Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    waiting: Arc<AtomicUsize>,
}

impl Debug for ConcurrencyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrencyGate")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .field("waiting", &self.waiting())
            .finish()
    }
}

impl ConcurrencyGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            waiting: Arc::new(AtomicUsize::new(0)),
        }
    }

    async fn acquire_owned(&self) -> Result<OwnedSemaphorePermit, AppError> {
        if let Ok(permit) = Arc::clone(&self.semaphore).try_acquire_owned() {
            return Ok(permit);
        }

        let _queued = WaitingGuard::enter(&self.waiting);
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("concurrency gate closed".to_string()))
    }

    /// Take one slot, suspending in FIFO order while none is free. The slot
    /// stays taken until a matching [`ConcurrencyGate::release`].
    pub async fn acquire(&self) -> Result<(), AppError> {
        self.acquire_owned().await?.forget();
        Ok(())
    }

    /// Give one slot back, waking the longest waiter if there is one.
    pub fn release(&self) {
        self.semaphore.add_permits(1);
    }

    /// Acquire wrapped in a guard that releases exactly once on drop.
    pub async fn permit(&self) -> Result<GatePermit, AppError> {
        let permit = self.acquire_owned().await?;
        Ok(GatePermit { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Slots currently held. Saturates at zero if `release` was over-called.
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}

/// Counts a caller as waiting for as long as its acquire future is alive.
struct WaitingGuard<'a>(&'a AtomicUsize);

impl<'a> WaitingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// RAII slot from [`ConcurrencyGate::permit`].
#[must_use = "dropping the permit releases the slot immediately"]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl Debug for GatePermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatePermit").finish()
    }
}

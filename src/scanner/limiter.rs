//! Admission gate bounding the number of in-flight probes.
//!
//! Wraps a tokio [`Semaphore`]. Each admitted probe holds a [`Slot`];
//! dropping the slot returns it, so every exit path of a probe (success,
//! timeout, error, panic or task abort) releases exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    acquisitions: AtomicUsize,
}

/// Snapshot of limiter activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStats {
    /// Total slots handed out since creation.
    pub acquisitions: usize,
    /// Slots currently held.
    pub in_flight: usize,
    /// Highest number of slots held at once.
    pub peak_in_flight: usize,
}

/// Counting admission gate shared by all probes of a scan.
///
/// Cloning is cheap and clones share the same slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    counters: Arc<Counters>,
    max: usize,
}

impl ConcurrencyLimiter {
    /// Create a gate admitting at most `max` holders at once, clamped to
    /// `1..=Semaphore::MAX_PERMITS`.
    pub fn new(max: usize) -> Self {
        let max = max.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(max)),
            counters: Arc::new(Counters::default()),
            max,
        }
    }

    /// Wait until a slot is free and take it.
    ///
    /// Fails only if the underlying semaphore was closed, which happens
    /// only in tests.
    pub async fn acquire(&self) -> Result<Slot, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;

        self.counters.acquisitions.fetch_add(1, Ordering::Relaxed);
        let now = self.counters.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.peak.fetch_max(now, Ordering::AcqRel);

        Ok(Slot {
            counters: Arc::clone(&self.counters),
            _permit: permit,
        })
    }

    /// Configured maximum.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Slots free right now.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    #[cfg(test)]
    pub(crate) fn close(&self) {
        self.semaphore.close();
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            acquisitions: self.counters.acquisitions.load(Ordering::Acquire),
            in_flight: self.counters.in_flight.load(Ordering::Acquire),
            peak_in_flight: self.counters.peak.load(Ordering::Acquire),
        }
    }
}

/// A held admission slot. Released on drop.
#[derive(Debug)]
pub struct Slot {
    counters: Arc<Counters>,
    // Dropped after `Drop::drop` runs, so `in_flight` never over-counts.
    _permit: OwnedSemaphorePermit,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_ok, task};

    #[tokio::test]
    async fn test_acquire_and_release() {
        let limiter = ConcurrencyLimiter::new(2);
        let a = limiter.acquire().await.unwrap();
        let _b = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 0);
        assert_eq!(limiter.stats().in_flight, 2);

        drop(a);
        assert_eq!(limiter.available(), 1);
        assert_eq!(
            limiter.stats(),
            LimiterStats {
                acquisitions: 2,
                in_flight: 1,
                peak_in_flight: 2
            }
        );
    }

    #[tokio::test]
    async fn test_acquire_waits_for_release() {
        let limiter = ConcurrencyLimiter::new(1);
        let held = limiter.acquire().await.unwrap();

        let mut waiter = task::spawn(limiter.acquire());
        assert_pending!(waiter.poll());

        drop(held);
        assert!(waiter.is_woken());
        let slot = assert_ready_ok!(waiter.poll());

        assert_eq!(limiter.stats().in_flight, 1);
        drop(slot);
        assert_eq!(limiter.stats().peak_in_flight, 1);
    }

    #[tokio::test]
    async fn test_slot_released_when_task_aborted() {
        let limiter = ConcurrencyLimiter::new(1);
        let task = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                let _slot = limiter.acquire().await.unwrap();
                std::future::pending::<()>().await;
            })
        };
        while limiter.stats().in_flight == 0 {
            tokio::task::yield_now().await;
        }

        task.abort();
        let _ = task.await;
        assert_eq!(limiter.available(), 1);
        assert_eq!(limiter.stats().in_flight, 0);
    }

    #[test]
    fn test_max_is_clamped() {
        assert_eq!(ConcurrencyLimiter::new(0).max(), 1);
        assert_eq!(
            ConcurrencyLimiter::new(usize::MAX).max(),
            Semaphore::MAX_PERMITS
        );
    }
}

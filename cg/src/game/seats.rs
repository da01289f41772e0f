//! Seat pool - the countable resource participants race for

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Available chairs for the current round
///
/// A bounded counter: claims never take it below zero and never block.
#[derive(Debug, Default)]
pub struct SeatPool {
    available: AtomicUsize,
}

impl SeatPool {
    /// Create a pool holding `chairs` permits
    pub fn new(chairs: usize) -> Self {
        debug!(chairs, "SeatPool::new: called");
        Self {
            available: AtomicUsize::new(chairs),
        }
    }

    /// Set the available permits to exactly `chairs`
    pub fn reset(&self, chairs: usize) {
        debug!(chairs, "SeatPool::reset: called");
        self.available.store(chairs, Ordering::Release);
    }

    /// Claim one permit if any is left
    pub fn try_claim(&self) -> bool {
        let mut current = self.available.load(Ordering::Acquire);
        loop {
            if current == 0 {
                debug!("SeatPool::try_claim: pool empty");
                return false;
            }
            match self
                .available
                .compare_exchange_weak(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    debug!(left = current - 1, "SeatPool::try_claim: claimed");
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Add `count` permits back to the pool
    pub fn replenish(&self, count: usize) {
        debug!(count, "SeatPool::replenish: called");
        self.available.fetch_add(count, Ordering::AcqRel);
    }

    /// Permits currently available
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }
}

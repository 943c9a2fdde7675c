//! Counting semaphore used by the event queue and task channel.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A counting semaphore built on a mutex and condition variable.
///
/// With an initial count of zero and at most one `release`, it acts as
/// the binary "done" signal of a blocking cross-thread call.
#[derive(Debug, Default)]
pub struct Semaphore {
    count: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    pub fn new(count: usize) -> Self {
        Self {
            count: Mutex::new(count),
            available: Condvar::new(),
        }
    }

    /// Block until a unit is available, then take it.
    pub fn acquire(&self) {
        let mut count = self.lock();
        while *count == 0 {
            count = self
                .available
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *count -= 1;
    }

    /// Take a unit if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let mut count = self.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Wait up to `timeout` for a unit. Returns `true` if one was taken.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.lock();
        while *count == 0 {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(d) if !d.is_zero() => d,
                _ => return false,
            };
            let (guard, _) = self
                .available
                .wait_timeout(count, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            count = guard;
        }
        *count -= 1;
        true
    }

    pub fn release(&self) {
        let mut count = self.lock();
        *count += 1;
        self.available.notify_one();
    }

    pub fn available(&self) -> usize {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

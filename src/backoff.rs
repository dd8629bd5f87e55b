//! # BackOff
//!
//! A fixed-delay pause used between lock attempts.
//!
//! Each contention phase of [`SpinLock::acquire`](crate::SpinLock::acquire) owns
//! one [`BackOff`]: one for waiting on the guard flag, one for waiting on the
//! held flag. Every [`BackOff::wait`] pauses the calling thread for the
//! configured delay and counts the retry, so the lock can report how contended
//! an acquisition was.
//!
//! ## Behavior
//! - A non-zero delay puts the thread to sleep for that long. The thread is
//!   never queued behind the lock; it simply comes back and polls again.
//! - A zero delay issues a [`core::hint::spin_loop`] followed by
//!   [`std::thread::yield_now`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use twoflag_spinlock::BackOff;
//!
//! let backoff = BackOff::new(Duration::from_micros(10));
//!
//! let mut attempts = 0;
//! loop {
//!     attempts += 1;
//!     if attempts == 3 {
//!         break;
//!     }
//!     backoff.wait();
//! }
//! assert_eq!(backoff.retries(), 2);
//! ```

use core::{cell::Cell, hint::spin_loop, time::Duration};
use std::thread;

/// A per-attempt pause with a retry counter.
///
/// `BackOff` is deliberately `!Sync`: it lives on the stack of the thread
/// that is contending.
pub struct BackOff {
    delay: Duration,
    retries: Cell<u32>,
}

impl BackOff {
    /// Creates a new [`BackOff`] that pauses for `delay` on every wait.
    #[inline(always)]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            retries: Cell::new(0),
        }
    }

    /// Pauses the current thread once and records the retry.
    #[inline]
    pub fn wait(&self) {
        if self.delay.is_zero() {
            spin_loop();
            thread::yield_now();
        } else {
            thread::sleep(self.delay);
        }

        self.retries.set(self.retries.get().saturating_add(1));
    }

    /// Number of waits performed since creation.
    #[inline(always)]
    pub fn retries(&self) -> u32 {
        self.retries.get()
    }

    /// The pause applied by [`wait`](BackOff::wait).
    #[inline(always)]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

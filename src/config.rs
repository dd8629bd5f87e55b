//! # Config
//!
//! Tunable parameters for [`SpinLock`](crate::SpinLock) and the worker
//! [`harness`](crate::harness).
//!
//! The delays only shape how much CPU a contender burns while it waits. They
//! are never part of the correctness contract, so any value (including zero)
//! is valid.

use core::time::Duration;

/// Default pause between failed test-and-set attempts on the guard flag.
pub const DEFAULT_GUARD_DELAY: Duration = Duration::from_micros(10);

/// Default pause after finding the lock held.
pub const DEFAULT_HELD_DELAY: Duration = Duration::from_micros(100);

/// Default number of workers launched by the harness.
pub const DEFAULT_WORKERS: usize = 3;

/// Default gap between two consecutive worker spawns.
pub const DEFAULT_SPAWN_GAP: Duration = Duration::from_millis(10);

/// Backoff delays used by [`SpinLock::acquire`](crate::SpinLock::acquire).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use twoflag_spinlock::SpinConfig;
///
/// let config = SpinConfig::new()
///     .with_guard_delay(Duration::ZERO)
///     .with_held_delay(Duration::from_micros(50));
/// assert_eq!(config.held_delay, Duration::from_micros(50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinConfig {
    /// Pause while another thread owns the guard flag.
    pub guard_delay: Duration,
    /// Pause after the held flag was observed set.
    pub held_delay: Duration,
}

impl SpinConfig {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            guard_delay: DEFAULT_GUARD_DELAY,
            held_delay: DEFAULT_HELD_DELAY,
        }
    }

    #[inline]
    pub const fn with_guard_delay(mut self, delay: Duration) -> Self {
        self.guard_delay = delay;
        self
    }

    #[inline]
    pub const fn with_held_delay(mut self, delay: Duration) -> Self {
        self.held_delay = delay;
        self
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for [`run_workers`](crate::harness::run_workers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of workers, ids run from `1..=workers`.
    pub workers: usize,
    /// Pause between spawning two workers.
    pub spawn_gap: Duration,
    /// Stack size for each worker thread; `None` keeps the platform default.
    pub stack_size: Option<usize>,
}

impl HarnessConfig {
    pub const fn new(workers: usize) -> Self {
        Self {
            workers,
            spawn_gap: DEFAULT_SPAWN_GAP,
            stack_size: None,
        }
    }

    pub const fn with_spawn_gap(mut self, gap: Duration) -> Self {
        self.spawn_gap = gap;
        self
    }

    pub const fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

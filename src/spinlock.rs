//! # SpinLock
//!
//! A busy-waiting mutual-exclusion lock built from two flags and a counter:
//!
//! - `held`: set while some thread is inside the critical section.
//! - `guard`: an inner test-and-set flag. It is owned only for the single
//!   check-and-maybe-set step on `held`, never across a whole acquire attempt.
//! - `waiters`: number of threads currently contending in
//!   [`acquire`](SpinLock::acquire). Diagnostic only, it never decides who
//!   gets the lock.
//!
//! The lock has two states, FREE and HELD, and starts FREE.
//!
//! ## Features
//! - ✅ Spin-with-backoff: contenders sleep briefly between polls and are
//!   never parked on an OS wait queue
//! - ✅ Raw `acquire`/`release` plus an RAII [`SpinLockGuard`]
//! - ✅ Checked [`try_release`](SpinLock::try_release) that reports releasing a free lock
//! - ⚙️ Tunable delays through [`SpinConfig`]
//!
//! ## Safety
//! - The lock is **not fair**. Whoever wins the race on `guard` while `held`
//!   is clear goes next, regardless of arrival order.
//! - There is no timeout and no cancellation. An `acquire` whose holder never
//!   releases spins forever.
//! - The lock is **not reentrant**: acquiring twice from one thread deadlocks.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use twoflag_spinlock::SpinLock;
//!
//! let lock = Arc::new(SpinLock::new());
//!
//! let handles: Vec<_> = (1..=3)
//!     .map(|id| {
//!         let lock = Arc::clone(&lock);
//!         thread::spawn(move || {
//!             lock.acquire();
//!             println!("Hello from thread #{id}");
//!             lock.release();
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert!(!lock.is_held());
//! assert_eq!(lock.waiters(), 0);
//! ```

use core::sync::atomic::{
    AtomicBool, AtomicUsize,
    Ordering::{Acquire, Relaxed, Release, SeqCst},
};

use log::{trace, warn};

use crate::{BackOff, LockMisuseError, SpinConfig};

/// The two-flag spinlock.
///
/// All access to `held`, `guard` and `waiters` goes through the methods below.
pub struct SpinLock {
    held: AtomicBool,
    guard: AtomicBool,
    waiters: AtomicUsize,
    config: SpinConfig,
}

/// Releases the [`SpinLock`] when dropped.
///
/// Returned by [`SpinLock::lock`]. Dropping it on any path, including an
/// early return or a panic inside the critical section, frees the lock.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct SpinLockGuard<'a> {
    lock: &'a SpinLock,
}

impl Drop for SpinLockGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.lock.release();
    }
}

impl SpinLock {
    /// Creates a FREE lock with the default delays.
    ///
    /// # Example
    /// ```
    /// use twoflag_spinlock::SpinLock;
    ///
    /// static LOCK: SpinLock = SpinLock::new();
    /// assert!(!LOCK.is_held());
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self::with_config(SpinConfig::new())
    }

    /// Creates a FREE lock with custom backoff delays.
    #[inline(always)]
    pub const fn with_config(config: SpinConfig) -> Self {
        SpinLock {
            held: AtomicBool::new(false),
            guard: AtomicBool::new(false),
            waiters: AtomicUsize::new(0),
            config,
        }
    }

    /// Resets the lock to FREE with no waiters.
    ///
    /// Taking `&mut self` means no other thread can be inside `acquire` while
    /// this runs. Calling it again before contention starts is harmless.
    #[inline]
    pub fn initialize(&mut self) {
        *self.held.get_mut() = false;
        *self.guard.get_mut() = false;
        *self.waiters.get_mut() = 0;
    }

    /// Acquires the lock, polling until the calling thread owns it.
    ///
    /// The thread announces itself in `waiters`, then repeatedly takes the
    /// guard flag, checks `held`, and either claims it or drops the guard and
    /// backs off. Acquisition order is unspecified.
    pub fn acquire(&self) {
        self.waiters.fetch_add(1, SeqCst);

        let guard_backoff = BackOff::new(self.config.guard_delay);
        let held_backoff = BackOff::new(self.config.held_delay);

        loop {
            while self.guard.swap(true, Acquire) {
                guard_backoff.wait();
            }

            // `guard` is ours: the load and store of `held` below cannot
            // interleave with another contender.
            if !self.held.load(Acquire) {
                self.held.store(true, Relaxed);
                self.guard.store(false, Release);
                break;
            }

            self.guard.store(false, Release);
            held_backoff.wait();
        }

        self.waiters.fetch_sub(1, SeqCst);

        if guard_backoff.retries() > 0 || held_backoff.retries() > 0 {
            trace!(
                "lock acquired after {} guard retries ({:?} each) and {} held retries ({:?} each)",
                guard_backoff.retries(),
                guard_backoff.delay(),
                held_backoff.retries(),
                held_backoff.delay()
            );
        }
    }

    /// Makes one attempt at the lock without waiting.
    ///
    /// Returns `false` if the guard flag was busy or the lock is held.
    /// Does not register in `waiters`.
    #[inline]
    pub fn try_acquire(&self) -> bool {
        if self.guard.swap(true, Acquire) {
            return false;
        }

        let acquired = !self.held.load(Acquire);
        if acquired {
            self.held.store(true, Relaxed);
        }
        self.guard.store(false, Release);
        acquired
    }

    /// Releases the lock, publishing the critical section's writes to the
    /// next acquirer.
    ///
    /// Must only be called by the thread that holds the lock, once per
    /// successful acquire. Nothing is checked; see
    /// [`try_release`](SpinLock::try_release) for the checked variant.
    #[inline]
    pub fn release(&self) {
        self.held.store(false, Release);
    }

    /// Releases the lock, reporting a release of a lock that was FREE.
    ///
    /// Detection is best-effort: releasing a lock currently held by *another*
    /// thread cannot be told apart from a legitimate release.
    ///
    /// # Example
    /// ```
    /// use twoflag_spinlock::{LockMisuseError, SpinLock};
    ///
    /// let lock = SpinLock::new();
    /// lock.acquire();
    /// assert_eq!(lock.try_release(), Ok(()));
    /// assert_eq!(lock.try_release(), Err(LockMisuseError::NotHeld));
    /// ```
    #[inline]
    pub fn try_release(&self) -> Result<(), LockMisuseError> {
        if self.held.swap(false, Release) {
            Ok(())
        } else {
            warn!("release of a lock that is not held");
            Err(LockMisuseError::NotHeld)
        }
    }

    /// Acquires the lock and returns a guard that releases it on drop.
    #[inline]
    pub fn lock(&self) -> SpinLockGuard<'_> {
        self.acquire();
        SpinLockGuard { lock: self }
    }

    /// Like [`try_acquire`](SpinLock::try_acquire), wrapped in a guard.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_>> {
        self.try_acquire().then(|| SpinLockGuard { lock: self })
    }

    /// Runs `f` inside the critical section.
    ///
    /// # Example
    /// ```
    /// use twoflag_spinlock::SpinLock;
    ///
    /// let lock = SpinLock::new();
    /// let answer = lock.with_lock(|| 40 + 2);
    /// assert_eq!(answer, 42);
    /// assert!(!lock.is_held());
    /// ```
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock();
        f()
    }

    /// Checks whether the lock is currently HELD.
    #[inline(always)]
    pub fn is_held(&self) -> bool {
        self.held.load(Acquire)
    }

    /// Number of threads currently inside [`acquire`](SpinLock::acquire)
    /// that have not yet obtained the lock.
    #[inline(always)]
    pub fn waiters(&self) -> usize {
        self.waiters.load(SeqCst)
    }

    /// The backoff delays this lock was built with.
    #[inline(always)]
    pub fn config(&self) -> SpinConfig {
        self.config
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SpinLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpinLock")
            .field("held", &self.is_held())
            .field("waiters", &self.waiters())
            .finish()
    }
}

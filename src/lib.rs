//! # twoflag-spinlock 🌀
//!
//! A small **spin-with-backoff mutual-exclusion lock** built from two atomic
//! flags and a waiter counter, plus a harness for running worker threads
//! against it.
//!
//! The crate includes:
//!
//! - [`SpinLock`]: the raw lock with `initialize`, `acquire` and `release`.
//! - [`SpinMutex<T>`]: a value protected by a [`SpinLock`], reached through an RAII guard.
//! - [`BackOff`]: the fixed-delay pause applied between attempts.
//! - [`harness::run_workers`]: spawn N workers, serialize them on one lock, join them all.
//!
//! Contending threads never park on an OS wait queue: they poll, sleep for a
//! few microseconds, and poll again. That keeps the lock's behavior visible
//! (no FIFO ordering, CPU burned while waiting) rather than hiding it behind a
//! kernel mutex.
//!
//! ## 🚀 Quick Example
//!
//! ```rust
//! use twoflag_spinlock::{SpinLock, SpinMutex};
//!
//! // Example 1: raw acquire / release
//! let lock = SpinLock::new();
//! lock.acquire();
//! assert!(lock.is_held());
//! lock.release();
//!
//! // Example 2: guarded data
//! let counter = SpinMutex::new(0);
//! {
//!     let mut guard = counter.lock();
//!     *guard += 1;
//! } // automatically released when guard is dropped
//! assert_eq!(*counter.lock(), 1);
//! ```
//!
//! ## 🧠 Design
//!
//! ### SpinLock
//!
//! `held` says whether the lock is owned. `guard` is an inner test-and-set
//! flag that makes "read `held`, then set it" one indivisible step for
//! whoever owns `guard`. The guard is taken with **Acquire** ordering and
//! dropped with **Release**; `release` clears `held` with **Release**, so the
//! next owner sees every write of the previous critical section.
//!
//! `waiters` counts threads that are inside `acquire` and have not got the
//! lock yet. It is informational and never influences who wins.
//!
//! ### BackOff
//!
//! `BackOff` sleeps for a configured delay (10µs on the guard, 100µs on a held
//! lock by default, see [`SpinConfig`]) and counts how often it did so.
//!
//! ## ⚠️ Safety & Usage Notes
//!
//! - Not fair: starvation is possible under heavy contention.
//! - No timeout: `acquire` spins until the holder releases.
//! - Not reentrant: acquiring twice from one thread deadlocks.
//! - `release` must be paired with exactly one successful acquire; prefer the
//!   guards ([`SpinLock::lock`], [`SpinMutex::lock`]) which do this on every path.
//!
//! ## 📦 Modules
//!
//! - [`backoff`]: Fixed-delay pause with retry counting.
//! - [`config`]: Tunable delays and harness parameters.
//! - [`error`]: Lock misuse and harness errors.
//! - [`harness`]: Structured worker launch and join.
//! - [`mutex`]: Data-carrying wrapper.
//! - [`spinlock`]: The two-flag lock.

pub mod backoff;
pub mod config;
pub mod error;
pub mod harness;
pub mod mutex;
pub mod spinlock;

pub use backoff::BackOff;
pub use config::{HarnessConfig, SpinConfig};
pub use error::{HarnessError, LockMisuseError};
pub use mutex::{SpinMutex, SpinMutexGuard};
pub use spinlock::{SpinLock, SpinLockGuard};

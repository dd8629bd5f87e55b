//! Error types for lock misuse and the worker harness.

use std::io;

use thiserror::Error;

/// Misuse of a [`SpinLock`](crate::SpinLock) that could be detected.
///
/// The raw lock contract leaves misuse undefined. Only the checked
/// [`try_release`](crate::SpinLock::try_release) path reports it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LockMisuseError {
    /// The lock was released while it was free (never acquired, or released twice).
    #[error("release called on a lock that is not held")]
    NotHeld,
}

/// Failure while launching or joining harness workers.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("at least one worker is required")]
    NoWorkers,

    #[error("failed to create thread for worker #{id}")]
    Spawn {
        id: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker #{id} panicked")]
    WorkerPanicked { id: usize },
}

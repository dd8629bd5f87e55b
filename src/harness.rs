//! # Harness
//!
//! Launches a fixed set of worker threads that each take a shared
//! [`SpinLock`], run a caller-supplied critical section and release it.
//!
//! The lock is handed to every worker explicitly as an [`Arc`]. All spawned
//! handles are collected and joined before [`run_workers`] returns, on the
//! success path and on every error path alike.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};

use crate::{HarnessConfig, HarnessError, SpinLock};

/// Runs `critical(id)` under `lock` on workers `1..=config.workers`.
///
/// Returns the workers' results ordered by id. If a spawn fails, no further
/// workers are started; the ones already running are still joined and the
/// spawn error is returned. A panicking worker is reported as
/// [`HarnessError::WorkerPanicked`] once every other worker has been joined.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use twoflag_spinlock::{harness::run_workers, HarnessConfig, SpinLock};
///
/// let lock = Arc::new(SpinLock::new());
/// let config = HarnessConfig::new(3).with_spawn_gap(Duration::ZERO);
/// let ids = run_workers(&lock, &config, |id| id * 10).unwrap();
/// assert_eq!(ids, vec![10, 20, 30]);
/// ```
pub fn run_workers<F, R>(
    lock: &Arc<SpinLock>,
    config: &HarnessConfig,
    critical: F,
) -> Result<Vec<R>, HarnessError>
where
    F: Fn(usize) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    if config.workers == 0 {
        return Err(HarnessError::NoWorkers);
    }

    let critical = Arc::new(critical);
    let mut handles: Vec<(usize, JoinHandle<R>)> = Vec::with_capacity(config.workers);
    let mut spawn_error = None;

    for id in 1..=config.workers {
        let lock = Arc::clone(lock);
        let critical = Arc::clone(&critical);

        let mut builder = thread::Builder::new().name(format!("worker-{id}"));
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let spawned = builder.spawn(move || {
            let _guard = lock.lock();
            critical(id)
        });

        match spawned {
            Ok(handle) => {
                debug!("spawned worker #{id}");
                handles.push((id, handle));
            }
            Err(source) => {
                error!("failed to create thread for worker #{id}: {source}");
                spawn_error = Some(HarnessError::Spawn { id, source });
                break;
            }
        }

        if id < config.workers && !config.spawn_gap.is_zero() {
            thread::sleep(config.spawn_gap);
        }
    }

    let mut results = Vec::with_capacity(handles.len());
    let mut join_error = None;

    for (id, handle) in handles {
        match handle.join() {
            Ok(value) => results.push(value),
            Err(_) => {
                error!("worker #{id} panicked");
                join_error.get_or_insert(HarnessError::WorkerPanicked { id });
            }
        }
    }

    match spawn_error.or(join_error) {
        Some(err) => Err(err),
        None => Ok(results),
    }
}

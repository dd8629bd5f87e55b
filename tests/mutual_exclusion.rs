//! Property tests: no lost updates for any thread count / iteration count.

use std::cell::UnsafeCell;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use twoflag_spinlock::{SpinConfig, SpinLock, SpinMutex};

/// A plain, non-atomic counter guarded only by the raw lock.
struct Counter {
    lock: SpinLock,
    value: UnsafeCell<u64>,
}

// Safety: `value` is only accessed between `acquire` and `release`.
unsafe impl Sync for Counter {}

fn quick_config() -> SpinConfig {
    SpinConfig::new()
        .with_guard_delay(Duration::ZERO)
        .with_held_delay(Duration::ZERO)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn raw_lock_loses_no_increments(threads in 2usize..8, iterations in 1usize..400) {
        let counter = Arc::new(Counter {
            lock: SpinLock::with_config(quick_config()),
            value: UnsafeCell::new(0),
        });

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..iterations {
                        counter.lock.acquire();
                        unsafe { *counter.value.get() += 1 };
                        counter.lock.release();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let total = counter.lock.with_lock(|| unsafe { *counter.value.get() });
        prop_assert_eq!(total, (threads * iterations) as u64);
        prop_assert_eq!(counter.lock.waiters(), 0);
        prop_assert!(!counter.lock.is_held());
    }

    #[test]
    fn mutex_loses_no_increments(threads in 2usize..8, iterations in 1usize..400) {
        let m = Arc::new(SpinMutex::with_config(0u64, quick_config()));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let m = Arc::clone(&m);
                thread::spawn(move || {
                    for _ in 0..iterations {
                        m.with_lock(|v| *v += 1);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        prop_assert_eq!(*m.lock(), (threads * iterations) as u64);
    }
}

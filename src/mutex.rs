//! # SpinMutex
//!
//! A data-carrying wrapper around [`SpinLock`]: the value can only be reached
//! through a [`SpinMutexGuard`], so forgetting to release or touching the data
//! outside the critical section is ruled out at compile time.
//!
//! ## Example
//! ```rust
//! use twoflag_spinlock::SpinMutex;
//!
//! static COUNTER: SpinMutex<u32> = SpinMutex::new(0);
//!
//! fn increment() {
//!     let mut guard = COUNTER.lock();
//!     *guard += 1;
//! }
//!
//! increment();
//! assert_eq!(*COUNTER.lock(), 1);
//! ```

use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use crate::{SpinConfig, SpinLock};

/// A value protected by a [`SpinLock`].
pub struct SpinMutex<T> {
    lock: SpinLock,
    data: UnsafeCell<T>,
}

/// Exclusive access to the data of a [`SpinMutex`], released on drop.
///
/// The guard behaves like `&mut T`: it can only be shared between threads
/// when `T` itself is `Sync`.
///
/// ```compile_fail
/// use std::cell::Cell;
/// use twoflag_spinlock::SpinMutexGuard;
///
/// fn assert_sync<S: Sync>() {}
/// assert_sync::<SpinMutexGuard<'static, Cell<u64>>>();
/// ```
#[must_use = "dropping the guard releases the lock immediately"]
pub struct SpinMutexGuard<'a, T> {
    mutex: &'a SpinMutex<T>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> SpinMutexGuard<'a, T> {
    #[inline(always)]
    fn new(mutex: &'a SpinMutex<T>) -> Self {
        Self {
            mutex,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for SpinMutexGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.mutex.lock.release();
    }
}

impl<T> SpinMutex<T> {
    /// Creates a new [`SpinMutex`] wrapping the given data.
    ///
    /// # Example
    /// ```
    /// use twoflag_spinlock::SpinMutex;
    ///
    /// let m = SpinMutex::new(123);
    /// assert_eq!(*m.lock(), 123);
    /// ```
    #[inline(always)]
    pub const fn new(data: T) -> Self {
        Self::with_config(data, SpinConfig::new())
    }

    #[inline(always)]
    pub const fn with_config(data: T, config: SpinConfig) -> Self {
        SpinMutex {
            lock: SpinLock::with_config(config),
            data: UnsafeCell::new(data),
        }
    }

    /// Acquires the lock, spinning until it becomes available.
    #[inline]
    pub fn lock(&self) -> SpinMutexGuard<'_, T> {
        self.lock.acquire();
        SpinMutexGuard::new(self)
    }

    /// Attempts to acquire the lock without waiting.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinMutexGuard<'_, T>> {
        self.lock.try_acquire().then(|| SpinMutexGuard::new(self))
    }

    /// Runs a closure with exclusive access to the data.
    ///
    /// # Example
    /// ```
    /// use twoflag_spinlock::SpinMutex;
    /// let m = SpinMutex::new(0i32);
    /// m.with_lock(|data| {
    ///     *data += 1;
    /// });
    /// assert_eq!(m.into_inner(), 1);
    /// ```
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Checks whether some guard is currently alive.
    #[inline(always)]
    pub fn is_held(&self) -> bool {
        self.lock.is_held()
    }

    /// Threads currently waiting in [`lock`](SpinMutex::lock), see [`SpinLock::waiters`].
    #[inline(always)]
    pub fn waiters(&self) -> usize {
        self.lock.waiters()
    }

    /// Mutable access without locking; the exclusive borrow proves no guard exists.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for SpinMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Deref for SpinMutexGuard<'_, T> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        // Safety: the guard exists only while `held` is set by this thread.
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for SpinMutexGuard<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

// Safety: SpinLock enforces mutual exclusion over `data`.
unsafe impl<T: Send> Send for SpinMutex<T> {}
unsafe impl<T: Send> Sync for SpinMutex<T> {}

#[cfg(test)]
mod test {
    use crate::{SpinConfig, SpinMutex, SpinMutexGuard};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_basic_lock_unlock() {
        let m = SpinMutex::new(10);

        {
            let mut guard = m.lock();
            *guard += 5;
            assert_eq!(*guard, 15);
        }

        assert!(!m.is_held(), "Lock should be released after guard drop");
    }

    #[test]
    fn test_try_lock_while_held() {
        let m = SpinMutex::new(42);
        let guard = m.lock();
        assert!(m.is_held());
        assert!(m.try_lock().is_none(), "Lock should not be acquirable while held");
        assert!(m.try_lock().is_none(), "A failed try_lock must not free the lock");
        assert_eq!(m.waiters(), 0);

        drop(guard);
        assert_eq!(m.try_lock().map(|g| *g), Some(42));
    }

    #[test]
    fn test_concurrent_access() {
        let config = SpinConfig::new().with_held_delay(Duration::from_micros(1));
        let m = Arc::new(SpinMutex::with_config(0usize, config));
        let mut handles = vec![];

        for _ in 0..8 {
            let m = Arc::clone(&m);
            handles.push(thread::spawn(move || {
                for _ in 0..5_000 {
                    *m.lock() += 1;
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(*m.lock(), 8 * 5_000, "Counter should match total increments");
        assert_eq!(m.waiters(), 0);
    }

    #[test]
    fn test_get_mut_and_into_inner() {
        let mut m = SpinMutex::new(vec![1, 2]);
        m.get_mut().push(3);
        assert_eq!(m.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_guard_sync_follows_data() {
        fn assert_sync<S: Sync>() {}
        fn assert_send<S: Send>() {}

        assert_sync::<SpinMutexGuard<'static, u64>>();
        assert_sync::<SpinMutexGuard<'static, Vec<String>>>();
        assert_send::<SpinMutexGuard<'static, u64>>();
    }

    #[test]
    fn test_shared_guard_reads_only() {
        let m = SpinMutex::new(7u64);
        let guard = m.lock();

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(*guard, 7));
            }
        });

        drop(guard);
        assert!(!m.is_held());
    }
}

//! Reusable-handle pools.
//!
//! Cipher transforms and random sources are stateful and not shareable
//! between concurrent operations, but they are expensive enough to be worth
//! reusing. [`Pool`] is an unordered free-list of idle handles: `acquire`
//! moves a handle out of the shared structure, so by construction no handle
//! is ever visible to two in-flight operations; `release` makes it available
//! again. The pool is unbounded and grows lazily to the high-water mark of
//! simultaneous operations, shrinking only at shutdown.
//!
//! The mutex guards nothing but the free-list push/pop; all cryptographic
//! work happens while the lock is free, so acquire and release never block
//! behind an in-flight operation.

use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, PoisonError},
};

/// An unordered, non-blocking free-list of reusable handles.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
}

impl<T> Pool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self { idle: Mutex::new(Vec::new()) }
    }

    /// Take an idle handle out of the pool, if one exists.
    pub fn acquire(&self) -> Option<T> {
        self.lock_idle().pop()
    }

    /// Return a handle to the pool for future reuse.
    pub fn release(&self, handle: T) {
        self.lock_idle().push(handle);
    }

    /// Check out a handle, constructing a fresh one if the pool is idle-empty.
    ///
    /// The returned guard hands the handle back on drop, on every exit path.
    pub fn checkout_or_else(&self, create: impl FnOnce() -> T) -> Checkout<'_, T> {
        let handle = self.acquire().unwrap_or_else(create);
        Checkout { pool: self, handle: Some(handle) }
    }

    /// Fallible variant of [`Pool::checkout_or_else`] for handles whose
    /// construction can fail.
    pub fn try_checkout_or_else<E>(
        &self,
        create: impl FnOnce() -> Result<T, E>,
    ) -> Result<Checkout<'_, T>, E> {
        let handle = match self.acquire() {
            Some(handle) => handle,
            None => create()?,
        };
        Ok(Checkout { pool: self, handle: Some(handle) })
    }

    /// Discard every pooled handle. Handles need no explicit teardown beyond
    /// being dropped.
    pub fn clear(&self) {
        self.lock_idle().clear();
    }

    /// Number of idle handles currently pooled.
    pub fn len(&self) -> usize {
        self.lock_idle().len()
    }

    /// Whether the pool holds no idle handles.
    pub fn is_empty(&self) -> bool {
        self.lock_idle().is_empty()
    }

    fn lock_idle(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // A poisoned free-list only means another thread panicked while
        // pushing or popping; the Vec itself is still coherent.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive use of one pooled handle for the duration of one operation.
///
/// Dropping the guard checks the handle back in, which is what guarantees
/// release on early returns and error paths alike.
pub struct Checkout<'a, T> {
    pool: &'a Pool<T>,
    handle: Option<T>,
}

impl<T> Deref for Checkout<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.handle {
            Some(handle) => handle,
            // INVARIANT: the handle is only taken in Drop.
            None => unreachable!("checkout accessed after drop"),
        }
    }
}

impl<T> DerefMut for Checkout<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.handle {
            Some(handle) => handle,
            // INVARIANT: the handle is only taken in Drop.
            None => unreachable!("checkout accessed after drop"),
        }
    }
}

impl<T> Drop for Checkout<'_, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_from_empty_pool_is_none() {
        let pool: Pool<u32> = Pool::new();
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn released_handle_is_reacquired() {
        let pool = Pool::new();
        pool.release(7u32);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.acquire(), Some(7));
        assert!(pool.is_empty());
    }

    #[test]
    fn checkout_creates_lazily_and_returns_on_drop() {
        let pool: Pool<u32> = Pool::new();
        {
            let handle = pool.checkout_or_else(|| 42);
            assert_eq!(*handle, 42);
            assert!(pool.is_empty(), "checked-out handle must not be visible in the pool");
        }
        assert_eq!(pool.len(), 1);
        // The pooled handle is reused instead of creating a new one.
        let handle = pool.checkout_or_else(|| 99);
        assert_eq!(*handle, 42);
    }

    #[test]
    fn checkout_returns_handle_on_error_paths() {
        fn fails_midway(pool: &Pool<u32>) -> Result<(), ()> {
            let _handle = pool.checkout_or_else(|| 1);
            Err(())
        }

        let pool = Pool::new();
        assert!(fails_midway(&pool).is_err());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn try_checkout_propagates_creation_failure() {
        let pool: Pool<u32> = Pool::new();
        let result = pool.try_checkout_or_else(|| Err::<u32, &str>("nope"));
        assert_eq!(result.err(), Some("nope"));
        assert!(pool.is_empty());
    }

    #[test]
    fn try_checkout_prefers_pooled_handle() {
        let pool = Pool::new();
        pool.release(5u32);
        let handle = pool.try_checkout_or_else(|| Err::<u32, &str>("unused")).unwrap();
        assert_eq!(*handle, 5);
    }

    #[test]
    fn clear_discards_all_handles() {
        let pool = Pool::new();
        pool.release(1u32);
        pool.release(2u32);
        pool.clear();
        assert!(pool.is_empty());
    }
}

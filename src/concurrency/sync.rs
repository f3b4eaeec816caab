//! Token-gated synchronization for level-synchronous workers.
//!
//! - [`GhostBarrier`]: the per-level meeting point
//! - [`GhostLatch`]: holds workers back until their crew is known

use std::marker::PhantomData;
use std::sync::{Barrier, BarrierWaitResult, Condvar, Mutex, OnceLock, PoisonError};

use crate::GhostToken;

/// A barrier that only workers of one traversal scope can wait on.
///
/// The `'brand` ties the barrier to the `GhostToken` of the traversal that
/// created it; a worker must present that token to participate.
pub struct GhostBarrier<'brand> {
    inner: Barrier,
    parties: usize,
    _brand: PhantomData<fn(&'brand ()) -> &'brand ()>,
}

impl<'brand> GhostBarrier<'brand> {
    /// Creates a barrier that releases once `parties` workers have arrived.
    pub fn new(parties: usize) -> Self {
        Self {
            inner: Barrier::new(parties),
            parties,
            _brand: PhantomData,
        }
    }

    /// Number of workers that must arrive before the barrier releases.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Blocks until every party has arrived.
    ///
    /// Exactly one caller per generation gets a result whose `is_leader()` is `true`.
    pub fn wait(&self, _token: &GhostToken<'brand>) -> BarrierWaitResult {
        self.inner.wait()
    }
}

/// A one-shot latch that publishes a value to every waiting worker.
///
/// Workers block in [`wait`](Self::wait) until [`open`](Self::open) runs, then all
/// see the same value. Only the first `open` takes effect.
pub struct GhostLatch<'brand, T> {
    value: OnceLock<T>,
    lock: Mutex<()>,
    opened: Condvar,
    _brand: PhantomData<fn(&'brand ()) -> &'brand ()>,
}

impl<'brand, T> GhostLatch<'brand, T> {
    /// Creates a closed latch.
    pub fn new() -> Self {
        Self {
            value: OnceLock::new(),
            lock: Mutex::new(()),
            opened: Condvar::new(),
            _brand: PhantomData,
        }
    }

    /// Publishes `value` and wakes every waiter. Returns `false` if already open.
    pub fn open(&self, value: T) -> bool {
        let first = self.value.set(value).is_ok();
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.opened.notify_all();
        first
    }

    /// Blocks until the latch is open and returns its value.
    pub fn wait(&self, _token: &GhostToken<'brand>) -> &T {
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(value) = self.value.get() {
                return value;
            }
            guard = self
                .opened
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// The published value, if the latch is open.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }
}

impl<T> Default for GhostLatch<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::concurrency::scoped::with_read_scope;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn one_leader_per_generation() {
        GhostToken::new(|token| {
            let barrier = GhostBarrier::new(4);
            let leaders = AtomicUsize::new(0);
            with_read_scope(&token, |scope| {
                for _ in 0..4 {
                    let barrier = &barrier;
                    let leaders = &leaders;
                    scope.spawn(move |token| {
                        for _ in 0..3 {
                            if barrier.wait(token).is_leader() {
                                leaders.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    });
                }
            });
            assert_eq!(barrier.parties(), 4);
            assert_eq!(leaders.load(Ordering::Relaxed), 3);
        });
    }

    #[test]
    fn latch_releases_every_waiter_with_one_value() {
        GhostToken::new(|token| {
            let latch = GhostLatch::new();
            let seen = AtomicUsize::new(0);
            with_read_scope(&token, |scope| {
                for _ in 0..3 {
                    let latch = &latch;
                    let seen = &seen;
                    scope.spawn(move |token| {
                        seen.fetch_add(*latch.wait(token), Ordering::Relaxed);
                    });
                }
                assert!(latch.open(5));
                assert!(!latch.open(9));
            });
            assert_eq!(latch.get(), Some(&5));
            assert_eq!(seen.load(Ordering::Relaxed), 15);
        });
    }
}

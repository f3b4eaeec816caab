use core::{marker::PhantomData, sync::atomic::Ordering};

use super::AtomicUsize;

/// A branded `AtomicUsize`.
#[repr(transparent)]
pub struct GhostAtomicUsize<'brand> {
    inner: AtomicUsize,
    _brand: PhantomData<fn(&'brand ()) -> &'brand ()>,
}

impl<'brand> GhostAtomicUsize<'brand> {
    /// Creates a new branded atomic usize.
    #[inline]
    pub fn new(value: usize) -> Self {
        Self {
            inner: AtomicUsize::new(value),
            _brand: PhantomData,
        }
    }

    /// Loads the current value.
    #[inline(always)]
    pub fn load(&self, order: Ordering) -> usize {
        self.inner.load(order)
    }

    /// Bitwise OR with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_or(&self, value: usize, order: Ordering) -> usize {
        self.inner.fetch_or(value, order)
    }
}

//! Counting permits that cap how many tasks run on their own thread.

use core::sync::atomic::Ordering;

use super::atomic::AtomicUsize;

/// A fixed pool of task permits.
///
/// A task that cannot get a permit is expected to run inline on the thread that
/// wanted to spawn it, so exhaustion applies backpressure instead of failing.
pub struct TaskBudget {
    available: AtomicUsize,
    capacity: usize,
}

impl TaskBudget {
    /// Creates a budget holding `capacity` permits.
    pub fn new(capacity: usize) -> Self {
        Self {
            available: AtomicUsize::new(capacity),
            capacity,
        }
    }

    /// Total number of permits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Relaxed)
    }

    /// Returns `true` if no permit is free right now.
    pub fn is_exhausted(&self) -> bool {
        self.available() == 0
    }

    /// Takes a permit if one is free. The permit returns itself on drop.
    pub fn try_acquire(&self) -> Option<TaskPermit<'_>> {
        let mut current = self.available.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return None;
            }
            match self.available.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Some(TaskPermit { budget: self }),
                Err(actual) => current = actual,
            }
        }
    }
}

/// A held permit from a [`TaskBudget`].
#[must_use = "dropping a permit releases it immediately"]
pub struct TaskPermit<'a> {
    budget: &'a TaskBudget,
}

impl Drop for TaskPermit<'_> {
    fn drop(&mut self) {
        self.budget.available.fetch_add(1, Ordering::Release);
    }
}

//! Shared-memory building blocks for the traversal engines.
//!
//! Branded types here enforce *membership* in a traversal scope, not
//! synchronization: every cross-thread mutation still goes through a hardware
//! atomic, a barrier or a mutex.

pub mod atomic;
pub mod budget;
pub mod scoped;
pub mod sync;

pub use budget::{TaskBudget, TaskPermit};
pub use sync::{GhostBarrier, GhostLatch};

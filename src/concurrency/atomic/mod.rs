//! Branded, lock-free atomic primitives.
//!
//! Under `--cfg loom` the underlying atomics come from `loom`, so the model
//! tests in `tests/loom_visited.rs` explore every interleaving of the same code
//! the engines run.

/// Branded `AtomicUsize`.
pub mod usize;
/// Branded atomic bitsets.
pub mod bitset;

pub use bitset::GhostAtomicBitset;
pub use usize::GhostAtomicUsize;

#[cfg(loom)]
pub(crate) use loom::sync::atomic::AtomicUsize;

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::AtomicUsize;

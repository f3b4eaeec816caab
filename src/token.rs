//! Per-traversal branding tokens.
//!
//! Every traversal call opens a fresh `GhostToken<'brand>` scope. The visited set
//! and the frontier barrier of that call carry the same `'brand`, so they cannot
//! be smuggled into another call or outlive the one that created them. Workers
//! receive `&GhostToken<'brand>` as proof that they belong to the traversal.
//!
//! ## Core invariant (linearity)
//!
//! `GhostToken<'brand>` is intentionally **not** `Copy`/`Clone`, and the brand is
//! invariant, so two scopes never unify into one.

use core::marker::PhantomData;

/// A zero-sized token naming one traversal scope.
#[derive(Debug)]
pub struct GhostToken<'brand>(PhantomData<fn(&'brand ()) -> &'brand ()>);

impl<'brand> GhostToken<'brand> {
    /// Opens a new brand and runs `f` with its token.
    ///
    /// ```rust
    /// use parwalk::{graph::VisitedSet, GhostToken};
    ///
    /// let first = GhostToken::new(|_token| {
    ///     let visited = VisitedSet::new(4);
    ///     visited.try_visit(2, core::sync::atomic::Ordering::Relaxed)
    /// });
    /// assert!(first);
    /// ```
    pub fn new<F, R>(f: F) -> R
    where
        F: for<'new_brand> FnOnce(GhostToken<'new_brand>) -> R,
    {
        f(GhostToken(PhantomData))
    }
}

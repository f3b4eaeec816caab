//! Branded scoped-thread helpers.
//!
//! These wrap `std::thread::scope` so spawned workers receive the traversal's
//! `&GhostToken<'brand>` and may borrow the graph and shared state directly.

use std::io;
use std::thread::{Builder, Scope, ScopedJoinHandle};

use crate::GhostToken;

/// A scoped environment that spawns workers sharing `&GhostToken<'brand>`.
pub struct GhostReadScope<'scope, 'env, 'brand> {
    scope: &'scope Scope<'scope, 'env>,
    token: &'env GhostToken<'brand>,
}

impl<'scope, 'env, 'brand> GhostReadScope<'scope, 'env, 'brand> {
    /// The token shared by this scope.
    #[inline]
    pub fn token(&self) -> &'env GhostToken<'brand> {
        self.token
    }

    /// Spawns a scoped thread that receives `&GhostToken<'brand>`.
    #[inline]
    pub fn spawn<T, F>(&self, f: F) -> ScopedJoinHandle<'scope, T>
    where
        T: Send + 'scope,
        F: FnOnce(&'env GhostToken<'brand>) -> T + Send + 'scope,
    {
        let t = self.token;
        self.scope.spawn(move || f(t))
    }

    /// Like [`spawn`](Self::spawn), but reports a refused thread instead of panicking.
    #[inline]
    pub fn try_spawn<T, F>(&self, f: F) -> io::Result<ScopedJoinHandle<'scope, T>>
    where
        T: Send + 'scope,
        F: FnOnce(&'env GhostToken<'brand>) -> T + Send + 'scope,
    {
        let t = self.token;
        Builder::new().spawn_scoped(self.scope, move || f(t))
    }

    /// Like [`spawn`](Self::spawn), with an explicit stack size.
    ///
    /// Fails if the OS refuses to create the thread; `f` is dropped in that case.
    #[inline]
    pub fn spawn_with_stack<T, F>(
        &self,
        stack_size: usize,
        f: F,
    ) -> io::Result<ScopedJoinHandle<'scope, T>>
    where
        T: Send + 'scope,
        F: FnOnce(&'env GhostToken<'brand>) -> T + Send + 'scope,
    {
        let t = self.token;
        Builder::new()
            .stack_size(stack_size)
            .spawn_scoped(self.scope, move || f(t))
    }
}

/// Runs a scoped region where `&GhostToken<'brand>` is shared with spawned threads.
///
/// Returns after every thread spawned in the region has been joined.
#[inline]
pub fn with_read_scope<'env, 'brand, R, F>(token: &'env GhostToken<'brand>, f: F) -> R
where
    F: for<'scope> FnOnce(GhostReadScope<'scope, 'env, 'brand>) -> R,
{
    std::thread::scope(|scope| f(GhostReadScope { scope, token }))
}

//! The visitation-order record.
//!
//! Workers append visited nodes through a single mutex, so each append is whole
//! and the record has one total order. Where the nodes end up is decided by a
//! [`VisitSink`]: a `Vec<usize>` collects them, [`from_fn`] streams them.

use std::sync::{Mutex, PoisonError};

/// Receives visited nodes, one at a time, in record order.
pub trait VisitSink {
    /// Called once per visited node.
    fn visit(&mut self, node: usize);
}

impl VisitSink for Vec<usize> {
    #[inline]
    fn visit(&mut self, node: usize) {
        self.push(node);
    }
}

impl<S: VisitSink + ?Sized> VisitSink for &mut S {
    #[inline]
    fn visit(&mut self, node: usize) {
        (**self).visit(node);
    }
}

/// A sink that forwards every node to a closure. See [`from_fn`].
pub struct FnSink<F>(F);

impl<F: FnMut(usize)> VisitSink for FnSink<F> {
    #[inline]
    fn visit(&mut self, node: usize) {
        (self.0)(node);
    }
}

/// Wraps a closure as a [`VisitSink`].
///
/// ```rust
/// use parwalk::{graph::from_fn, FrontierBfs, Graph, TraversalConfig};
///
/// let g = Graph::from_adjacency(&[vec![1], vec![]]).unwrap();
/// let mut seen = String::new();
/// let mut sink = from_fn(|node| seen.push_str(&node.to_string()));
/// FrontierBfs::new(TraversalConfig::sequential())
///     .run_with_sink(&g, 0, &mut sink)
///     .unwrap();
/// drop(sink);
/// assert_eq!(seen, "01");
/// ```
pub fn from_fn<F: FnMut(usize)>(f: F) -> FnSink<F> {
    FnSink(f)
}

struct Inner<S> {
    sink: S,
    len: usize,
}

/// A sink shared by all workers of one traversal.
pub(crate) struct VisitRecord<S> {
    inner: Mutex<Inner<S>>,
}

impl<S: VisitSink> VisitRecord<S> {
    pub(crate) fn new(sink: S) -> Self {
        Self {
            inner: Mutex::new(Inner { sink, len: 0 }),
        }
    }

    /// Appends one node under the record's lock.
    #[inline]
    pub(crate) fn append(&self, node: usize) {
        // A poisoned lock means a sink panicked; the panic is re-raised by the
        // engine, so keep the record usable for the other workers meanwhile.
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.sink.visit(node);
        inner.len += 1;
    }

    /// Consumes the record, returning the sink and the number of appends.
    pub(crate) fn into_parts(self) -> (S, usize) {
        let inner = self.inner.into_inner().unwrap_or_else(PoisonError::into_inner);
        (inner.sink, inner.len)
    }

    /// Number of nodes appended so far.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len
    }
}

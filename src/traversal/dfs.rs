//! Task-parallel depth-first search.
//!
//! Exploring `u` claims it with an atomic test-and-set, records it, then starts
//! one task per neighbor that still looks unvisited and waits for all of them
//! before `u` is done. The "looks unvisited" check only avoids pointless tasks;
//! the claim on entry is what prevents double visits, so both stay.
//!
//! Tasks run on their own scoped thread while a [`TaskBudget`] permit is free.
//! Otherwise the neighbor is explored on the current thread, from an explicit
//! stack rather than by recursion.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::ScopedJoinHandle;

use tracing::{debug, trace, warn};

use super::{assert_consistent, TraversalStats};
use crate::{
    concurrency::{scoped::with_read_scope, TaskBudget},
    error::Result,
    graph::{record::VisitRecord, VisitSink, VisitedSet},
    GhostToken, Graph, TraversalConfig,
};

/// Task-parallel DFS engine.
#[derive(Debug, Clone, Default)]
pub struct TaskDfs {
    config: TraversalConfig,
}

impl TaskDfs {
    /// Creates an engine with `config`.
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Returns the visitation order from `start`.
    pub fn run(&self, graph: &Graph, start: usize) -> Result<Vec<usize>> {
        let mut order = Vec::with_capacity(graph.node_count());
        self.run_with_sink(graph, start, &mut order)?;
        Ok(order)
    }

    /// Streams the visitation order from `start` into `sink`.
    pub fn run_with_sink<S>(&self, graph: &Graph, start: usize, sink: &mut S) -> Result<TraversalStats>
    where
        S: VisitSink + Send,
    {
        graph.check_start(start)?;
        self.config.validate()?;

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            start,
            max_tasks = self.config.max_tasks,
            "task dfs started"
        );

        let stack_size = self.config.stack_size;
        let stats = GhostToken::new(|token| {
            let explorer = Explorer::new(&token, graph, sink, &self.config);

            // The root gets its own thread so the caller's stack size never matters.
            with_read_scope(&token, |scope| {
                match scope.spawn_with_stack(stack_size, |token| explorer.explore(token, None, start)) {
                    Ok(root) => {
                        if let Err(payload) = root.join() {
                            panic::resume_unwind(payload);
                        }
                    }
                    Err(err) => {
                        warn!(%err, "could not spawn dfs root thread, exploring on caller");
                        explorer.explore(scope.token(), None, start);
                    }
                }
            });
            explorer.finish()
        });

        debug!(
            visited = stats.visited,
            spawned_tasks = stats.spawned_tasks,
            "task dfs finished"
        );
        Ok(stats)
    }
}

/// State shared by every task of one DFS call.
struct Explorer<'g, 'brand, S> {
    graph: &'g Graph,
    visited: VisitedSet<'brand>,
    record: VisitRecord<S>,
    budget: TaskBudget,
    stack_size: usize,
    spawned: AtomicUsize,
    /// `(parent, child)` for every claim, in claim order.
    #[cfg(test)]
    tree: std::sync::Mutex<Vec<(usize, usize)>>,
}

/// One node on a task's explicit stack.
struct Frame<'scope> {
    node: usize,
    next: usize,
    children: Vec<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope> Frame<'scope> {
    fn new(node: usize) -> Self {
        Self {
            node,
            next: 0,
            children: Vec::new(),
        }
    }

    /// The per-node join: waits for every task this node started.
    fn join(self) {
        for child in self.children {
            if let Err(payload) = child.join() {
                panic::resume_unwind(payload);
            }
        }
    }
}

impl<'g, 'brand, S: VisitSink + Send> Explorer<'g, 'brand, S> {
    fn new(token: &GhostToken<'brand>, graph: &'g Graph, sink: S, config: &TraversalConfig) -> Self {
        Self {
            graph,
            visited: VisitedSet::for_scope(token, graph.node_count()),
            record: VisitRecord::new(sink),
            budget: TaskBudget::new(config.max_tasks),
            stack_size: config.stack_size,
            spawned: AtomicUsize::new(0),
            #[cfg(test)]
            tree: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Entry guard: a sibling or an earlier task may have claimed `node` since
    /// `parent` looked at it.
    fn claim(&self, parent: Option<usize>, node: usize) -> bool {
        if !self.visited.try_visit(node, Ordering::Relaxed) {
            return false;
        }
        #[cfg(test)]
        if let Some(parent) = parent {
            self.tree
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push((parent, node));
        }
        #[cfg(not(test))]
        let _ = parent;
        self.record.append(node);
        true
    }

    /// Explores the subtree under `node` as one task.
    ///
    /// The walk keeps its own stack, so depth never grows the thread's stack.
    /// Children that get a permit run as tasks on fresh threads; the rest are
    /// pushed and explored here. A node's frame is popped only after its tasks
    /// have been joined.
    fn explore(&self, token: &GhostToken<'brand>, parent: Option<usize>, node: usize) {
        if !self.claim(parent, node) {
            return;
        }

        with_read_scope(token, |scope| {
            let mut stack = vec![Frame::new(node)];
            while let Some(frame) = stack.last_mut() {
                let u = frame.node;
                let Some(&v) = self.graph.neighbors(u).get(frame.next) else {
                    if let Some(done) = stack.pop() {
                        done.join();
                    }
                    continue;
                };
                frame.next += 1;

                // Filter before spawning; the claim in `explore` or below is
                // what rules out a second visit.
                if self.visited.is_visited(v) {
                    continue;
                }
                if let Some(permit) = self.budget.try_acquire() {
                    let task = scope.spawn_with_stack(self.stack_size, move |token| {
                        let _permit = permit;
                        self.explore(token, Some(u), v);
                    });
                    match task {
                        Ok(child) => {
                            self.spawned.fetch_add(1, Ordering::Relaxed);
                            frame.children.push(child);
                            continue;
                        }
                        Err(err) => {
                            trace!(%err, node = v, "task spawn refused, exploring inline");
                        }
                    }
                }
                if self.claim(Some(u), v) {
                    stack.push(Frame::new(v));
                }
            }
        });
    }

    fn finish(self) -> TraversalStats {
        let (_, recorded) = self.record.into_parts();
        assert_consistent(&self.visited, recorded);
        TraversalStats {
            visited: recorded,
            levels: 0,
            workers: self.budget.capacity() + 1,
            spawned_tasks: self.spawned.into_inner(),
        }
    }
}

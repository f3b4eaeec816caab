//! Both engines on a rayon thread pool (feature `parallel`).
//!
//! - BFS: each level is a `par_chunks` fold into per-thread discovery buffers,
//!   reduced into the next frontier. The end of the parallel iterator is the
//!   level barrier.
//! - DFS: each task walks its subtree from an explicit stack inside one
//!   `rayon::scope`, spawning a job for a neighbor that still looks unvisited
//!   while a [`TaskBudget`] permit is free. The scope joins a task's jobs. The
//!   budget also bounds how deeply scopes nest while rayon steals work.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use super::{assert_consistent, TraversalStats};
use crate::{
    concurrency::TaskBudget,
    config::TASKS_PER_THREAD,
    error::{Result, TraversalError},
    graph::{record::VisitRecord, VisitedSet},
    GhostToken, Graph, TraversalConfig,
};

/// Builds a pool of `config.threads` workers with `config.stack_size` stacks.
///
/// # Errors
/// [`TraversalError::InvalidConfig`] for an unusable config,
/// [`TraversalError::ThreadPool`] if rayon cannot start the workers.
pub fn build_pool(config: &TraversalConfig) -> Result<ThreadPool> {
    config.validate()?;
    ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .stack_size(config.stack_size)
        .thread_name(|i| format!("parwalk-{i}"))
        .build()
        .map_err(|e| TraversalError::ThreadPool(e.to_string()))
}

/// Frontier-parallel BFS on a fresh pool built from `config`.
pub fn bfs(graph: &Graph, start: usize, config: &TraversalConfig) -> Result<Vec<usize>> {
    graph.check_start(start)?;
    let pool = build_pool(config)?;
    bfs_in(&pool, graph, start, config.chunk_size).map(|(order, _)| order)
}

/// Task-parallel DFS on a fresh pool built from `config`.
pub fn dfs(graph: &Graph, start: usize, config: &TraversalConfig) -> Result<Vec<usize>> {
    graph.check_start(start)?;
    let pool = build_pool(config)?;
    dfs_in(&pool, graph, start).map(|(order, _)| order)
}

/// Frontier-parallel BFS on an existing pool.
///
/// # Errors
/// [`TraversalError::StartOutOfRange`] for a bad start,
/// [`TraversalError::InvalidConfig`] for a zero `chunk_size`.
pub fn bfs_in(
    pool: &ThreadPool,
    graph: &Graph,
    start: usize,
    chunk_size: usize,
) -> Result<(Vec<usize>, TraversalStats)> {
    graph.check_start(start)?;
    if chunk_size == 0 {
        return Err(TraversalError::InvalidConfig(
            "chunk_size must be > 0".into(),
        ));
    }

    let out = GhostToken::new(|token| {
        let visited = VisitedSet::for_scope(&token, graph.node_count());
        visited.try_visit(start, Ordering::Relaxed);
        let record = VisitRecord::new(Vec::with_capacity(graph.node_count()));

        let mut frontier = vec![start];
        let mut levels = 0usize;
        pool.install(|| {
            while !frontier.is_empty() {
                frontier = frontier
                    .par_chunks(chunk_size)
                    .fold(Vec::new, |mut local, chunk| {
                        for &u in chunk {
                            record.append(u);
                            for &v in graph.neighbors(u) {
                                if visited.try_visit(v, Ordering::Relaxed) {
                                    local.push(v);
                                }
                            }
                        }
                        local
                    })
                    .reduce(Vec::new, |mut a, mut b| {
                        a.append(&mut b);
                        a
                    });
                levels += 1;
            }
        });

        let (order, recorded) = record.into_parts();
        assert_consistent(&visited, recorded);
        let stats = TraversalStats {
            visited: recorded,
            levels,
            workers: pool.current_num_threads(),
            spawned_tasks: 0,
        };
        (order, stats)
    });

    debug!(visited = out.1.visited, levels = out.1.levels, "pool bfs finished");
    Ok(out)
}

/// Task-parallel DFS on an existing pool.
///
/// # Errors
/// [`TraversalError::StartOutOfRange`] for a bad start.
pub fn dfs_in(
    pool: &ThreadPool,
    graph: &Graph,
    start: usize,
) -> Result<(Vec<usize>, TraversalStats)> {
    graph.check_start(start)?;

    let out = GhostToken::new(|token| {
        let explorer = PoolExplorer {
            graph,
            visited: VisitedSet::for_scope(&token, graph.node_count()),
            record: VisitRecord::new(Vec::with_capacity(graph.node_count())),
            budget: TaskBudget::new(pool.current_num_threads() * TASKS_PER_THREAD),
            spawned: AtomicUsize::new(0),
        };
        pool.install(|| explorer.explore(start));

        let (order, recorded) = explorer.record.into_parts();
        assert_consistent(&explorer.visited, recorded);
        let stats = TraversalStats {
            visited: recorded,
            levels: 0,
            workers: pool.current_num_threads(),
            spawned_tasks: explorer.spawned.into_inner(),
        };
        (order, stats)
    });

    debug!(
        visited = out.1.visited,
        spawned_tasks = out.1.spawned_tasks,
        "pool dfs finished"
    );
    Ok(out)
}

struct PoolExplorer<'g, 'brand> {
    graph: &'g Graph,
    visited: VisitedSet<'brand>,
    record: VisitRecord<Vec<usize>>,
    budget: TaskBudget,
    spawned: AtomicUsize,
}

impl PoolExplorer<'_, '_> {
    fn claim(&self, node: usize) -> bool {
        let claimed = self.visited.try_visit(node, Ordering::Relaxed);
        if claimed {
            self.record.append(node);
        }
        claimed
    }

    fn explore(&self, node: usize) {
        if !self.claim(node) {
            return;
        }
        rayon::scope(|s| {
            let mut stack = vec![(node, 0usize)];
            while let Some((u, next)) = stack.last_mut() {
                let u = *u;
                let Some(&v) = self.graph.neighbors(u).get(*next) else {
                    stack.pop();
                    continue;
                };
                *next += 1;

                if self.visited.is_visited(v) {
                    continue;
                }
                if let Some(permit) = self.budget.try_acquire() {
                    self.spawned.fetch_add(1, Ordering::Relaxed);
                    s.spawn(move |_| {
                        let _permit = permit;
                        self.explore(v);
                    });
                    continue;
                }
                if self.claim(v) {
                    stack.push((v, 0));
                }
            }
        });
    }
}

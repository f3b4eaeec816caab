//! Level-synchronous, frontier-parallel breadth-first search.
//!
//! A fixed crew of scoped workers lives for the whole call. Per level:
//!
//! 1. workers claim `chunk_size` slices of the frontier from a shared cursor,
//!    record each node and test-and-set its neighbors into a private buffer;
//! 2. everyone meets at the barrier, whose leader merges the buffers into the
//!    next frontier and decides whether the crew stops;
//! 3. a second barrier publishes both before anyone reads them.
//!
//! No node of level `k + 1` can be recorded before the first barrier of level `k`
//! has released, which is what orders the record by distance.
//!
//! Spawned workers hold at a latch until the caller knows how many of them the
//! OS actually started; the barrier is sized to that crew.

use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use crossbeam_utils::CachePadded;
use tracing::{debug, trace, warn};

use super::{assert_consistent, TraversalStats};
use crate::{
    concurrency::{scoped::with_read_scope, GhostBarrier, GhostLatch},
    error::Result,
    graph::{record::VisitRecord, VisitSink, VisitedSet},
    GhostToken, Graph, TraversalConfig,
};

/// Frontier-parallel BFS engine.
#[derive(Debug, Clone, Default)]
pub struct FrontierBfs {
    config: TraversalConfig,
}

impl FrontierBfs {
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

    /// Returns the frontiers from `start`: entry `k` holds the nodes at distance `k`.
    pub fn run_levels(&self, graph: &Graph, start: usize) -> Result<Vec<Vec<usize>>> {
        let (_, levels) = self.traverse(graph, start, Discard, true)?;
        Ok(levels)
    }

    /// Streams the visitation order from `start` into `sink`.
    ///
    /// `sink` is called under the record lock, from whichever worker visits the node.
    pub fn run_with_sink<S>(&self, graph: &Graph, start: usize, sink: &mut S) -> Result<TraversalStats>
    where
        S: VisitSink + Send,
    {
        let (stats, _) = self.traverse(graph, start, sink, false)?;
        Ok(stats)
    }

    fn traverse<S>(
        &self,
        graph: &Graph,
        start: usize,
        sink: S,
        keep_levels: bool,
    ) -> Result<(TraversalStats, Vec<Vec<usize>>)>
    where
        S: VisitSink + Send,
    {
        graph.check_start(start)?;
        self.config.validate()?;

        let workers = self.config.threads.min(graph.node_count());
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            start,
            workers,
            "frontier bfs started"
        );

        let (stats, levels) = GhostToken::new(|token| {
            let shared = Frontier::new(
                &token,
                graph,
                start,
                sink,
                workers,
                self.config.chunk_size,
                keep_levels,
            );
            with_read_scope(&token, |scope| {
                let mut crew = 1;
                for id in 1..workers {
                    let shared = &shared;
                    match scope.try_spawn(move |token| shared.work(token, id)) {
                        Ok(_) => crew += 1,
                        Err(err) => {
                            warn!(
                                %err,
                                requested = workers,
                                crew,
                                "bfs worker refused, continuing with a smaller crew"
                            );
                            break;
                        }
                    }
                }
                shared.launch(crew);
                shared.work(scope.token(), 0);
            });
            shared.finish()
        });

        debug!(
            visited = stats.visited,
            levels = stats.levels,
            "frontier bfs finished"
        );
        Ok((stats, levels))
    }
}

/// A sink for callers that only want the levels.
struct Discard;

impl VisitSink for Discard {
    #[inline]
    fn visit(&mut self, _node: usize) {}
}

/// State shared by the workers of one BFS call.
struct Frontier<'g, 'brand, S> {
    graph: &'g Graph,
    visited: VisitedSet<'brand>,
    record: VisitRecord<S>,
    crew: GhostLatch<'brand, GhostBarrier<'brand>>,
    current: RwLock<Vec<usize>>,
    cursor: AtomicUsize,
    discovered: Vec<CachePadded<Mutex<Vec<usize>>>>,
    chunk_size: usize,
    depth: AtomicUsize,
    levels: Option<Mutex<Vec<Vec<usize>>>>,
    /// Written by the barrier leader between the two waits of a level.
    done: AtomicBool,
    panicked: AtomicBool,
    panic_payload: Mutex<Option<Box<dyn Any + Send>>>,
}

impl<'g, 'brand, S: VisitSink> Frontier<'g, 'brand, S> {
    fn new(
        token: &GhostToken<'brand>,
        graph: &'g Graph,
        start: usize,
        sink: S,
        workers: usize,
        chunk_size: usize,
        keep_levels: bool,
    ) -> Self {
        let visited = VisitedSet::for_scope(token, graph.node_count());
        let claimed = visited.try_visit(start, Ordering::Relaxed);
        debug_assert!(claimed, "fresh visited set already contains the start node");

        Self {
            graph,
            visited,
            record: VisitRecord::new(sink),
            crew: GhostLatch::new(),
            current: RwLock::new(vec![start]),
            cursor: AtomicUsize::new(0),
            discovered: (0..workers)
                .map(|_| CachePadded::new(Mutex::new(Vec::new())))
                .collect(),
            chunk_size,
            depth: AtomicUsize::new(0),
            levels: keep_levels.then(|| Mutex::new(Vec::new())),
            done: AtomicBool::new(false),
            panicked: AtomicBool::new(false),
            panic_payload: Mutex::new(None),
        }
    }

    /// Releases the `crew` workers that started, worker 0 included.
    fn launch(&self, crew: usize) {
        self.crew.open(GhostBarrier::new(crew));
    }

    /// One worker's loop. All workers leave it on the same iteration.
    fn work(&self, token: &GhostToken<'brand>, id: usize) {
        let barrier = self.crew.wait(token);
        let mut local = Vec::new();
        loop {
            if !self.panicked.load(Ordering::Acquire) {
                let expanded = panic::catch_unwind(AssertUnwindSafe(|| self.expand(&mut local)));
                if let Err(payload) = expanded {
                    self.fail(payload);
                }
            }
            // Hand over this level's discoveries, take back the drained buffer.
            mem::swap(&mut *lock(&self.discovered[id]), &mut local);

            // Every expansion of this level has ended, so `panicked` is stable
            // until the second wait releases.
            if barrier.wait(token).is_leader() {
                let failed = self.panicked.load(Ordering::Acquire);
                if !failed {
                    self.advance();
                }
                let done = failed || read(&self.current).is_empty();
                self.done.store(done, Ordering::Release);
            }
            barrier.wait(token);

            if self.done.load(Ordering::Acquire) {
                break;
            }
        }
    }

    /// Expands frontier chunks until the cursor runs past the end.
    fn expand(&self, local: &mut Vec<usize>) {
        let frontier = read(&self.current);
        let len = frontier.len();
        // Each worker overshoots `len` at most once, so the cursor stays below
        // `(crew + 1) * len` and cannot wrap.
        let chunk = self.chunk_size.min(len);
        loop {
            let begin = self.cursor.fetch_add(chunk, Ordering::Relaxed);
            if begin >= len {
                break;
            }
            let end = begin + chunk.min(len - begin);
            for &u in &frontier[begin..end] {
                self.record.append(u);
                for &v in self.graph.neighbors(u) {
                    if self.visited.try_visit(v, Ordering::Relaxed) {
                        local.push(v);
                    }
                }
            }
        }
    }

    /// Leader-only: merges every worker's discoveries into the next frontier.
    fn advance(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let total: usize = self.discovered.iter().map(|slot| lock(slot).len()).sum();
        let mut next = Vec::with_capacity(total);
        for slot in &self.discovered {
            next.append(&mut lock(slot));
        }

        let finished = mem::replace(&mut *current, next);
        self.cursor.store(0, Ordering::Relaxed);
        let level = self.depth.fetch_add(1, Ordering::Relaxed);
        trace!(
            level,
            expanded = finished.len(),
            discovered = current.len(),
            "frontier level complete"
        );

        if let Some(levels) = &self.levels {
            lock(levels).push(finished);
        }
    }

    fn fail(&self, payload: Box<dyn Any + Send>) {
        self.panicked.store(true, Ordering::Release);
        let mut slot = lock(&self.panic_payload);
        if slot.is_none() {
            *slot = Some(payload);
        }
    }

    fn finish(self) -> (TraversalStats, Vec<Vec<usize>>) {
        let payload = self
            .panic_payload
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(payload) = payload {
            panic::resume_unwind(payload);
        }

        let (_, recorded) = self.record.into_parts();
        assert_consistent(&self.visited, recorded);

        let stats = TraversalStats {
            visited: recorded,
            levels: self.depth.into_inner(),
            workers: self.crew.get().map_or(1, GhostBarrier::parties),
            spawned_tasks: 0,
        };
        let levels = self
            .levels
            .map(|levels| levels.into_inner().unwrap_or_else(PoisonError::into_inner))
            .unwrap_or_default();
        (stats, levels)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

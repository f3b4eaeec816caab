//! Tries to provoke double visits: dense graphs full of duplicate edges and
//! self-loops, tiny chunks, many workers, many repetitions.

mod common;

use std::collections::BTreeSet;

use common::{assert_discovered_after_parent, assert_level_order, assert_visits_reachable_once};
use parwalk::{FrontierBfs, Graph, TaskDfs, TraversalConfig};

/// Every node points at `fanout` pseudo-random targets, itself, and node 0 twice.
fn dense(nodes: usize, fanout: usize) -> Graph {
    let adjacency: Vec<Vec<usize>> = (0..nodes)
        .map(|i| {
            let mut nbrs: Vec<usize> = (0..fanout).map(|j| (i * 31 + j * 7 + 1) % nodes).collect();
            nbrs.extend([i, 0, 0]);
            nbrs
        })
        .collect();
    Graph::from_adjacency(&adjacency).unwrap()
}

/// Hub 0 points at every leaf; every leaf points back at the hub and its neighbors.
fn star(leaves: usize) -> Graph {
    let n = leaves + 1;
    let mut adjacency = vec![(1..n).collect::<Vec<_>>()];
    for leaf in 1..n {
        adjacency.push(vec![0, 1 + leaf % leaves, 1 + (leaf + 1) % leaves, leaf]);
    }
    Graph::from_adjacency(&adjacency).unwrap()
}

#[test]
fn bfs_under_contention() {
    let g = dense(2_000, 24);
    let bfs = FrontierBfs::new(TraversalConfig::new().with_threads(8).with_chunk_size(1));
    for _ in 0..20 {
        let order = bfs.run(&g, 5).unwrap();
        assert_visits_reachable_once(&g, 5, &order);
        assert_level_order(&g, 5, &order);
    }
}

#[test]
fn dfs_under_contention() {
    let g = dense(1_000, 12);
    let dfs = TaskDfs::new(TraversalConfig::new().with_max_tasks(32));
    for _ in 0..10 {
        let order = dfs.run(&g, 5).unwrap();
        assert_visits_reachable_once(&g, 5, &order);
        assert_discovered_after_parent(&g, 5, &order);
    }
}

#[test]
fn wide_fan_out_is_capped_and_complete() {
    let g = star(5_000);
    let config = TraversalConfig::new().with_threads(8).with_chunk_size(2).with_max_tasks(16);

    let order = FrontierBfs::new(config.clone()).run(&g, 0).unwrap();
    assert_eq!(order.len(), 5_001);
    assert_level_order(&g, 0, &order);

    let mut order = Vec::new();
    let stats = TaskDfs::new(config).run_with_sink(&g, 0, &mut order).unwrap();
    assert_eq!(stats.visited, 5_001);
    assert_eq!(stats.workers, 17);
    assert_discovered_after_parent(&g, 0, &order);
}

#[test]
fn concurrent_calls_share_the_graph_but_not_the_visited_set() {
    let g = dense(1_500, 8);
    let expected: BTreeSet<usize> = common::reachable(&g, 0);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let g = &g;
                scope.spawn(move || {
                    let config = TraversalConfig::new()
                        .with_threads(3)
                        .with_chunk_size(4)
                        .with_max_tasks(4);
                    if i % 2 == 0 {
                        FrontierBfs::new(config).run(g, 0).unwrap()
                    } else {
                        TaskDfs::new(config).run(g, 0).unwrap()
                    }
                })
            })
            .collect();
        for handle in handles {
            let order = handle.join().unwrap();
            assert_eq!(order.len(), expected.len());
            assert_eq!(order.into_iter().collect::<BTreeSet<_>>(), expected);
        }
    });
}

//! Shared fixtures and oracles for the traversal tests.
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};

use parwalk::{Graph, TraversalConfig};
use petgraph::graph::{DiGraph, NodeIndex};

/// `{0:[1,2], 1:[0,3,4], 2:[0,4], 3:[1,5], 4:[1,2,5], 5:[3,4]}`
pub fn sample() -> Graph {
    Graph::from_adjacency(&[
        vec![1, 2],
        vec![0, 3, 4],
        vec![0, 4],
        vec![1, 5],
        vec![1, 2, 5],
        vec![3, 4],
    ])
    .unwrap()
}

/// Configurations every engine test runs under.
pub fn configs() -> Vec<TraversalConfig> {
    vec![
        TraversalConfig::sequential(),
        TraversalConfig::new().with_threads(2).with_chunk_size(1).with_max_tasks(2),
        TraversalConfig::new().with_threads(4).with_chunk_size(1).with_max_tasks(8),
        TraversalConfig::new().with_threads(8).with_chunk_size(3).with_max_tasks(32),
        TraversalConfig::new().with_threads(4).with_chunk_size(64).with_max_tasks(0),
    ]
}

pub fn to_petgraph(graph: &Graph) -> DiGraph<(), ()> {
    let mut g = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    for _ in 0..graph.node_count() {
        g.add_node(());
    }
    for u in 0..graph.node_count() {
        for &v in graph.neighbors(u) {
            g.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
        }
    }
    g
}

/// Hop distance from `start` to every reachable node.
pub fn distances(graph: &Graph, start: usize) -> HashMap<usize, usize> {
    let g = to_petgraph(graph);
    petgraph::algo::dijkstra(&g, NodeIndex::new(start), None, |_| 1usize)
        .into_iter()
        .map(|(node, dist)| (node.index(), dist))
        .collect()
}

pub fn reachable(graph: &Graph, start: usize) -> BTreeSet<usize> {
    distances(graph, start).into_keys().collect()
}

/// Every reachable node exactly once, nothing else, `start` first.
pub fn assert_visits_reachable_once(graph: &Graph, start: usize, order: &[usize]) {
    assert_eq!(order.first(), Some(&start), "start must be recorded first");
    let seen: BTreeSet<usize> = order.iter().copied().collect();
    assert_eq!(seen.len(), order.len(), "a node was recorded twice: {order:?}");
    assert_eq!(seen, reachable(graph, start), "visited set != reachable set");
}

/// Distances along the record never decrease.
pub fn assert_level_order(graph: &Graph, start: usize, order: &[usize]) {
    let dist = distances(graph, start);
    for pair in order.windows(2) {
        assert!(
            dist[&pair[0]] <= dist[&pair[1]],
            "node {} (distance {}) recorded before node {} (distance {}) in {order:?}",
            pair[0],
            dist[&pair[0]],
            pair[1],
            dist[&pair[1]],
        );
    }
}

/// Every non-start node has an in-neighbor recorded before it.
pub fn assert_discovered_after_parent(graph: &Graph, start: usize, order: &[usize]) {
    let mut position = vec![usize::MAX; graph.node_count()];
    for (i, &node) in order.iter().enumerate() {
        position[node] = i;
    }
    let mut preds = vec![Vec::new(); graph.node_count()];
    for u in 0..graph.node_count() {
        for &v in graph.neighbors(u) {
            preds[v].push(u);
        }
    }
    for &v in order.iter().filter(|&&v| v != start) {
        assert!(
            preds[v].iter().any(|&u| position[u] < position[v]),
            "node {v} recorded before any node that could have discovered it: {order:?}"
        );
    }
}

/// Positions of `nodes` in `order`.
pub fn positions(order: &[usize], nodes: &[usize]) -> Vec<usize> {
    nodes
        .iter()
        .map(|n| order.iter().position(|x| x == n).expect("node missing from order"))
        .collect()
}

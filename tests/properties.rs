mod common;

use std::collections::BTreeSet;

use common::{assert_discovered_after_parent, assert_level_order, assert_visits_reachable_once};
use parwalk::{FrontierBfs, Graph, TaskDfs, TraversalConfig};
use proptest::prelude::*;

/// Random adjacency lists (duplicates and self-loops allowed) with a valid start.
fn arb_graph() -> impl Strategy<Value = (Vec<Vec<usize>>, usize)> {
    (1usize..48).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::collection::vec(0..n, 0..5), n),
            0..n,
        )
    })
}

fn parallel() -> TraversalConfig {
    TraversalConfig::new()
        .with_threads(4)
        .with_chunk_size(1)
        .with_max_tasks(8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn bfs_visits_reachable_nodes_in_level_order((adjacency, start) in arb_graph()) {
        let g = Graph::from_adjacency(&adjacency).unwrap();
        let order = FrontierBfs::new(parallel()).run(&g, start).unwrap();
        assert_visits_reachable_once(&g, start, &order);
        assert_level_order(&g, start, &order);
    }

    #[test]
    fn bfs_levels_flatten_to_a_valid_order((adjacency, start) in arb_graph()) {
        let g = Graph::from_adjacency(&adjacency).unwrap();
        let levels = FrontierBfs::new(parallel()).run_levels(&g, start).unwrap();
        let dist = common::distances(&g, start);
        for (depth, level) in levels.iter().enumerate() {
            prop_assert!(!level.is_empty());
            for node in level {
                prop_assert_eq!(dist[node], depth);
            }
        }
        let flat: Vec<usize> = levels.concat();
        assert_visits_reachable_once(&g, start, &flat);
    }

    #[test]
    fn dfs_visits_reachable_nodes_after_a_parent((adjacency, start) in arb_graph()) {
        let g = Graph::from_adjacency(&adjacency).unwrap();
        let order = TaskDfs::new(parallel()).run(&g, start).unwrap();
        assert_visits_reachable_once(&g, start, &order);
        assert_discovered_after_parent(&g, start, &order);
    }

    #[test]
    fn worker_count_does_not_change_the_visited_set((adjacency, start) in arb_graph()) {
        let g = Graph::from_adjacency(&adjacency).unwrap();
        let set = |order: Vec<usize>| order.into_iter().collect::<BTreeSet<_>>();

        let bfs_one = set(FrontierBfs::new(TraversalConfig::sequential()).run(&g, start).unwrap());
        let bfs_many = set(FrontierBfs::new(parallel()).run(&g, start).unwrap());
        let dfs_one = set(TaskDfs::new(TraversalConfig::sequential()).run(&g, start).unwrap());
        let dfs_many = set(TaskDfs::new(parallel()).run(&g, start).unwrap());

        prop_assert_eq!(&bfs_one, &bfs_many);
        prop_assert_eq!(&dfs_one, &dfs_many);
        prop_assert_eq!(&bfs_one, &dfs_one);
    }
}

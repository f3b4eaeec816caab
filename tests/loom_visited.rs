//! Exhaustive interleaving checks; run with `RUSTFLAGS="--cfg loom" cargo test --test loom_visited`.
#![cfg(loom)]

use std::sync::atomic::Ordering;

use loom::sync::atomic::AtomicUsize;
use loom::sync::Arc;
use loom::thread;
use parwalk::concurrency::TaskBudget;
use parwalk::graph::VisitedSet;

#[test]
fn racing_claims_have_exactly_one_winner() {
    loom::model(|| {
        let visited = Arc::new(VisitedSet::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let visited = Arc::clone(&visited);
                thread::spawn(move || visited.try_visit(1, Ordering::Relaxed))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(winners, 1);
        assert!(!visited.is_visited(0));
        assert_eq!(visited.visited_count(), 1);
    });
}

#[test]
fn claims_on_a_shared_word_do_not_clobber_each_other() {
    loom::model(|| {
        // Nodes 3 and 4 share a bitset word.
        let visited = Arc::new(VisitedSet::new(8));
        let a = {
            let visited = Arc::clone(&visited);
            thread::spawn(move || visited.try_visit(3, Ordering::Relaxed))
        };
        let b = {
            let visited = Arc::clone(&visited);
            thread::spawn(move || visited.try_visit(4, Ordering::Relaxed))
        };
        assert!(a.join().unwrap());
        assert!(b.join().unwrap());
        assert_eq!(visited.visited_count(), 2);
    });
}

#[test]
fn budget_never_over_issues() {
    loom::model(|| {
        let budget = Arc::new(TaskBudget::new(1));
        let holding = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let budget = Arc::clone(&budget);
                let holding = Arc::clone(&holding);
                thread::spawn(move || {
                    if let Some(_permit) = budget.try_acquire() {
                        assert_eq!(holding.fetch_add(1, Ordering::SeqCst), 0);
                        holding.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(budget.available(), 1);
    });
}

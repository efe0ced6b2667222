//! Greedy First-Fit Baseline
//!
//! Deterministic heuristic packing used as the upper-bound comparison point
//! for learned predictions. Tasks are placed hardest-first: the harmonic mean
//! of a demand vector rewards large, balanced demand across all axes, and
//! placing those tasks early avoids fragmenting node capacity. Tasks with a
//! zero component score 0 and are placed last (they fit anywhere trivially).
//!
//! Placement scans real nodes in original index order and commits to the
//! first one that accepts the full subtraction; tasks no node accepts stay at
//! the sink. The result is re-emitted in original task order: the priority
//! sort decides placement order only.

use packset_core::{Distribution, QueueSet, Target};

/// Pack the queue set with the harmonic-mean-ordered first-fit heuristic.
///
/// Deterministic: the priority sort is stable with ties broken by original
/// task index, and node scan order is fixed.
pub fn first_fit(queues: &QueueSet) -> Distribution {
    let mut order: Vec<usize> = (0..queues.len()).collect();
    order.sort_by(|&a, &b| {
        queues
            .task(b)
            .harmonic_mean()
            .total_cmp(&queues.task(a).harmonic_mean())
    });

    let mut capacities = queues.capacities();
    let mut targets = vec![Target::Sink; queues.len()];
    for &task in &order {
        let demand = queues.task(task);
        for node in 0..queues.len() {
            if capacities.try_assign(node, demand) {
                targets[task] = Target::Node(node);
                break;
            }
        }
    }

    Distribution::new(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn places_hardest_tasks_first() {
        // Nodes [10, 5], tasks [4, 6]. Task 1 scores higher (6 > 4) and is
        // placed first on node 0 (remainder 4); task 0 then fills it.
        let queues = QueueSet::from_flat(&[10, 5, 4, 6], 1).unwrap();
        let dist = first_fit(&queues);
        assert_eq!(dist.targets(), &[Target::Node(0), Target::Node(0)]);
        assert_eq!(queues.waste(&dist), 0);
    }

    #[test]
    fn overloaded_tasks_fall_back_to_the_sink() {
        let queues = QueueSet::from_flat(&[5, 5, 6, 6], 1).unwrap();
        let dist = first_fit(&queues);
        assert_eq!(dist, Distribution::all_sink(2));
        assert_eq!(queues.waste(&dist), 12);
    }

    #[test]
    fn output_is_in_original_task_order() {
        // Task 1 has the higher score, is placed first, and takes node 0;
        // task 0 spills to node 1. The result still lists task 0 first.
        let queues = QueueSet::from_flat(&[9, 9, 2, 8], 1).unwrap();
        let dist = first_fit(&queues);
        assert_eq!(dist.targets(), &[Target::Node(1), Target::Node(0)]);
    }

    #[test]
    fn zero_component_tasks_are_placed_last() {
        // Task 0 has a zero component (score 0); task 1 is balanced. If the
        // zero-scored task went first it would steal node 0 on axis 1.
        let queues = QueueSet::from_flat(&[4, 9, 0, 9, 0, 9, 4, 4], 2).unwrap();
        let dist = first_fit(&queues);
        // Task 1 (4,4) claims node 0 first; task 0 (0,9) no longer fits its
        // remaining (0,5) and lands on node 1.
        assert_eq!(dist.targets(), &[Target::Node(1), Target::Node(0)]);
        assert!(queues.is_valid(&dist));
    }

    #[test]
    fn deterministic_across_runs() {
        let queues =
            QueueSet::from_flat(&[60, 30, 40, 50, 20, 70, 30, 30, 45, 10, 15, 60], 2).unwrap();
        let first = first_fit(&queues);
        let second = first_fit(&queues);
        assert_eq!(first, second);
        assert_eq!(
            first.to_one_hot(queues.len()),
            second.to_one_hot(queues.len())
        );
    }
}

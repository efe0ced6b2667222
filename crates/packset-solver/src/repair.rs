//! Prediction Feasibility Repair
//!
//! Makes an externally supplied distribution resource-feasible by forcing
//! infeasible task assignments to the sink. This is not a re-optimization:
//! tasks are visited in original index order, first come first served, so a
//! small late task can be rejected because an earlier task already consumed
//! the node. That order-dependence is the modeling choice that distinguishes
//! repair from the first-fit baseline, which orders tasks by a packing
//! heuristic instead. Do not "fix" it.

use packset_core::{Distribution, QueueSet, Target};

/// Single left-to-right pass over the prediction against a running capacity
/// table. Sink targets are kept as-is; node targets are committed if the
/// subtraction stays non-negative on every axis and downgraded to the sink
/// otherwise. Repairing an already-feasible distribution returns it
/// unchanged.
pub fn repair(queues: &QueueSet, prediction: &Distribution) -> Distribution {
    let mut capacities = queues.capacities();
    let targets = prediction
        .targets()
        .iter()
        .enumerate()
        .map(|(task, &target)| match target {
            Target::Sink => Target::Sink,
            Target::Node(node) => {
                if capacities.try_assign(node, queues.task(task)) {
                    target
                } else {
                    Target::Sink
                }
            }
        })
        .collect();
    Distribution::new(targets)
}

//! Exact Assignment Search
//!
//! Exhaustive depth-first backtracking over tasks in index order, returning a
//! minimum-waste distribution for one queue set.
//!
//! # Algorithm
//!
//! 1. Start from the all-sink distribution; its waste is the initial best.
//! 2. For task `t`, try every real node in index order, then the sink. A node
//!    branch subtracts the task's demand from the live capacity table before
//!    recursing and restores it afterwards, so sibling branches always see
//!    the pre-subtraction state. The sink branch consumes no capacity.
//! 3. A task with zero demand can never contribute to waste: skip branching
//!    and recurse directly with its target left at the sink.
//! 4. At depth `L`, keep the distribution if its waste strictly improves on
//!    the best seen so far. The first distribution to reach a given minimum
//!    wins ties.
//!
//! Branching factor is up to `L + 1` at depth `L`, so the worst case is
//! `O((L+1)^L)`. There is no lower-bound pruning; the search is intended for
//! dataset generation at small `L`, not production-time scheduling.

use packset_core::{Capacities, Distribution, QueueSet, Target};

/// A solved sample: the minimum-waste distribution and its waste.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub distribution: Distribution,
    pub waste: u64,
}

/// Exhaustive minimum-waste solver.
pub struct ExactSolver;

impl ExactSolver {
    pub fn new() -> Self {
        Self
    }

    /// Search every assignment of the queue set and return one with minimum
    /// waste. Always terminates and always finds at least the all-sink
    /// distribution.
    pub fn solve(&self, queues: &QueueSet) -> Annotation {
        let all_sink = vec![Target::Sink; queues.len()];
        let mut search = Search {
            queues,
            capacities: queues.capacities(),
            current: all_sink.clone(),
            best_waste: waste_of(queues, &all_sink),
            best: all_sink,
        };
        search.descend(0);

        Annotation {
            waste: search.best_waste,
            distribution: Distribution::new(search.best),
        }
    }
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared mutable search state. `capacities` and `current` are mutated on
/// the way down and must be restored exactly on every way back up.
struct Search<'a> {
    queues: &'a QueueSet,
    capacities: Capacities,
    current: Vec<Target>,
    best: Vec<Target>,
    best_waste: u64,
}

impl<'a> Search<'a> {
    fn descend(&mut self, task: usize) {
        if task == self.queues.len() {
            let waste = waste_of(self.queues, &self.current);
            if waste < self.best_waste {
                self.best_waste = waste;
                self.best.clone_from(&self.current);
            }
            return;
        }

        let demand = self.queues.task(task);

        // Zero demand never wastes anything; leave the target at the sink.
        if demand.is_zero() {
            self.descend(task + 1);
            return;
        }

        for node in 0..self.queues.len() {
            if self.capacities.try_assign(node, demand) {
                self.current[task] = Target::Node(node);
                self.descend(task + 1);
                self.capacities.release(node, demand);
                self.current[task] = Target::Sink;
            }
        }

        // The sink branch is always feasible.
        self.descend(task + 1);
    }
}

fn waste_of(queues: &QueueSet, targets: &[Target]) -> u64 {
    targets
        .iter()
        .enumerate()
        .filter(|(_, target)| target.is_sink())
        .map(|(task, _)| queues.task(task).total())
        .sum()
}

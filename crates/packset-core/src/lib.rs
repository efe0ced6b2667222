//! # packset-core
//!
//! Core data model for the packset bin-packing dataset builder.
//!
//! This crate provides:
//! - Domain types: `ResourceVec`, `QueueSet`, `Capacities`, `Target`, `Distribution`
//! - Compact and one-hot distribution codecs
//! - Flat-record batch parsing for training and prediction files
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use packset_core::{Distribution, QueueSet, Target};
//!
//! // One sample: 2 nodes, 2 tasks, 1 resource dimension.
//! let queues = QueueSet::from_flat(&[10, 5, 4, 6], 1)?;
//! let dist = Distribution::new(vec![Target::Node(1), Target::Node(0)]);
//! assert!(queues.is_valid(&dist));
//! assert_eq!(queues.waste(&dist), 0);
//! # Ok::<(), packset_core::ShapeError>(())
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod codec;

pub use codec::{PredictionBatch, TrainingBatch, TrainingSample};

// ============================================================================
// Resource Vectors
// ============================================================================

/// Demand or capacity along `D` independent resource axes.
///
/// Components are non-negative by construction (`u32`). A node's vector is
/// its remaining capacity; a task's vector is its demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVec(Vec<u32>);

impl ResourceVec {
    pub fn new(components: Vec<u32>) -> Self {
        Self(components)
    }

    /// An all-zero vector of the given dimension.
    pub fn zero(dim: usize) -> Self {
        Self(vec![0; dim])
    }

    /// Number of resource axes.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// True if every component is zero. A zero-demand task fits anywhere and
    /// can never contribute to waste.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Sum of all components.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Harmonic mean of the components: `D / sum(1/c)`.
    ///
    /// Ranks tasks with large, balanced demand across all axes as hardest to
    /// place. Any zero component would make the mean undefined; those vectors
    /// score `0.0` so they sort last (they fit anywhere trivially).
    pub fn harmonic_mean(&self) -> f64 {
        if self.0.iter().any(|&c| c == 0) {
            return 0.0;
        }
        let sum: f64 = self.0.iter().map(|&c| 1.0 / f64::from(c)).sum();
        self.0.len() as f64 / sum
    }
}

impl From<Vec<u32>> for ResourceVec {
    fn from(components: Vec<u32>) -> Self {
        Self(components)
    }
}

// ============================================================================
// Queue Sets
// ============================================================================

/// One bin-packing problem instance: `L` node capacity vectors followed by
/// `L` task demand vectors, all of dimension `D`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSet {
    dim: usize,
    nodes: Vec<ResourceVec>,
    tasks: Vec<ResourceVec>,
}

impl QueueSet {
    /// Build a queue set from a flat record of `2 * L * D` values:
    /// node capacities first, then task demands, `dim` consecutive values per
    /// vector.
    pub fn from_flat(values: &[u32], dim: usize) -> Result<Self, ShapeError> {
        if dim == 0 {
            return Err(ShapeError::ZeroDimension);
        }
        if values.is_empty() || values.len() % (2 * dim) != 0 {
            return Err(ShapeError::QueueRecordLength {
                len: values.len(),
                dim,
            });
        }
        let len = values.len() / (2 * dim);
        let vectors = |range: &[u32]| {
            range
                .chunks(dim)
                .map(|chunk| ResourceVec::new(chunk.to_vec()))
                .collect::<Vec<_>>()
        };
        Ok(Self {
            dim,
            nodes: vectors(&values[..len * dim]),
            tasks: vectors(&values[len * dim..]),
        })
    }

    /// Flatten back to the on-disk record layout.
    pub fn to_flat(&self) -> Vec<u32> {
        self.nodes
            .iter()
            .chain(self.tasks.iter())
            .flat_map(|v| v.components().iter().copied())
            .collect()
    }

    /// Queue length `L`: number of nodes, which equals the number of tasks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn node(&self, i: usize) -> &ResourceVec {
        &self.nodes[i]
    }

    pub fn task(&self, i: usize) -> &ResourceVec {
        &self.tasks[i]
    }

    pub fn nodes(&self) -> &[ResourceVec] {
        &self.nodes
    }

    pub fn tasks(&self) -> &[ResourceVec] {
        &self.tasks
    }

    /// Fresh mutable capacity table holding every node's full capacity.
    pub fn capacities(&self) -> Capacities {
        Capacities {
            nodes: self.nodes.clone(),
        }
    }

    /// Total demand of every task the distribution leaves at the sink.
    pub fn waste(&self, dist: &Distribution) -> u64 {
        debug_assert_eq!(dist.len(), self.len());
        self.tasks
            .iter()
            .zip(dist.targets())
            .filter(|(_, target)| matches!(target, Target::Sink))
            .map(|(task, _)| task.total())
            .sum()
    }

    /// True if replaying the distribution never overdraws any node on any
    /// axis. A distribution that sends every task to the sink is always valid.
    pub fn is_valid(&self, dist: &Distribution) -> bool {
        let mut capacities = self.capacities();
        self.tasks
            .iter()
            .zip(dist.targets())
            .all(|(task, target)| match target {
                Target::Sink => true,
                Target::Node(n) => capacities.try_assign(*n, task),
            })
    }
}

// ============================================================================
// Capacities
// ============================================================================

/// The live, mutable per-node capacity table shared by the solver, the
/// repairer and the first-fit baseline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capacities {
    nodes: Vec<ResourceVec>,
}

impl Capacities {
    /// Subtract `demand` from node `node` component-wise.
    ///
    /// If any component would go negative the table is left untouched and
    /// `false` is returned; otherwise the subtraction is committed.
    pub fn try_assign(&mut self, node: usize, demand: &ResourceVec) -> bool {
        let capacity = &self.nodes[node].0;
        let fits = capacity
            .iter()
            .zip(demand.components())
            .all(|(&have, &need)| have >= need);
        if fits {
            for (have, &need) in self.nodes[node].0.iter_mut().zip(demand.components()) {
                *have -= need;
            }
        }
        fits
    }

    /// Undo a committed assignment, restoring the node's capacity.
    pub fn release(&mut self, node: usize, demand: &ResourceVec) {
        for (have, &need) in self.nodes[node].0.iter_mut().zip(demand.components()) {
            *have += need;
        }
    }

    pub fn node(&self, i: usize) -> &ResourceVec {
        &self.nodes[i]
    }
}

// ============================================================================
// Targets and Distributions
// ============================================================================

/// Where a task is placed: a real node (0-based index) or the virtual sink.
///
/// The sink has infinite capacity and represents "unassigned"; tasks placed
/// there contribute their full demand to waste. External encodings reserve
/// index 0 for the sink and number real nodes from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Sink,
    Node(usize),
}

impl Target {
    pub fn is_sink(self) -> bool {
        matches!(self, Self::Sink)
    }
}

/// A complete task-to-target mapping for one queue set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution(Vec<Target>);

impl Distribution {
    pub fn new(targets: Vec<Target>) -> Self {
        Self(targets)
    }

    /// The worst-case distribution: every task unassigned.
    pub fn all_sink(len: usize) -> Self {
        Self(vec![Target::Sink; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn targets(&self) -> &[Target] {
        &self.0
    }

    pub fn target(&self, task: usize) -> Target {
        self.0[task]
    }

    /// Compact external form: one value per task, `0` = sink, `k > 0` = node
    /// `k` (1-based).
    pub fn to_compact(&self) -> Vec<u32> {
        self.0
            .iter()
            .map(|target| match target {
                Target::Sink => 0,
                Target::Node(n) => *n as u32 + 1,
            })
            .collect()
    }

    /// Decode the compact form. `len` is the queue length; any value above
    /// `len` names a node that does not exist.
    pub fn from_compact(values: &[u32], len: usize) -> Result<Self, ShapeError> {
        values
            .iter()
            .enumerate()
            .map(|(task, &value)| match value {
                0 => Ok(Target::Sink),
                n if (n as usize) <= len => Ok(Target::Node(n as usize - 1)),
                n => Err(ShapeError::TargetOutOfRange {
                    task,
                    target: n,
                    len,
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// One-hot form: `L` groups of `L + 1` flags, flag 0 = sink,
    /// flags `1..=L` = nodes.
    pub fn to_one_hot(&self, len: usize) -> Vec<u32> {
        let mut flags = vec![0; self.0.len() * (len + 1)];
        for (task, target) in self.0.iter().enumerate() {
            let slot = match target {
                Target::Sink => 0,
                Target::Node(n) => n + 1,
            };
            flags[task * (len + 1) + slot] = 1;
        }
        flags
    }

    /// Decode one-hot rows. A group with no flag set defaults to the sink; a
    /// group with more than one flag set is malformed.
    pub fn from_one_hot(flags: &[u32], len: usize) -> Result<Self, ShapeError> {
        let stride = len + 1;
        if flags.len() != len * stride {
            return Err(ShapeError::RecordLength {
                len: flags.len(),
                stride: len * stride,
            });
        }
        let mut targets = Vec::with_capacity(len);
        for (task, group) in flags.chunks(stride).enumerate() {
            let mut chosen = None;
            for (slot, &flag) in group.iter().enumerate() {
                if flag == 1 {
                    if chosen.is_some() {
                        return Err(ShapeError::AmbiguousGroup { task });
                    }
                    chosen = Some(slot);
                }
            }
            targets.push(match chosen {
                None | Some(0) => Target::Sink,
                Some(slot) => Target::Node(slot - 1),
            });
        }
        Ok(Self(targets))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Malformed input shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("resource dimension must be at least 1")]
    ZeroDimension,

    #[error("queue record of {len} values is not a positive multiple of 2 * dim ({dim})")]
    QueueRecordLength { len: usize, dim: usize },

    #[error("record of {len} values is not a positive multiple of the sample stride {stride}")]
    RecordLength { len: usize, stride: usize },

    #[error("one-hot group for task {task} has more than one flag set")]
    AmbiguousGroup { task: usize },

    #[error("task {task} names target {target}, but only {len} nodes exist")]
    TargetOutOfRange { task: usize, target: u32, len: usize },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn queue_set_from_flat() {
        let queues = QueueSet::from_flat(&[100, 71, 5, 22, 1, 20, 0, 0], 2).unwrap();
        assert_eq!(queues.len(), 2);
        assert_eq!(queues.dim(), 2);
        assert_eq!(queues.node(0).components(), &[100, 71]);
        assert_eq!(queues.node(1).components(), &[5, 22]);
        assert_eq!(queues.task(0).components(), &[1, 20]);
        assert!(queues.task(1).is_zero());
    }

    #[test]
    fn queue_set_flat_round_trip() {
        let flat = vec![10, 5, 4, 6];
        let queues = QueueSet::from_flat(&flat, 1).unwrap();
        assert_eq!(queues.to_flat(), flat);
    }

    #[test]
    fn queue_set_rejects_ragged_record() {
        assert_eq!(
            QueueSet::from_flat(&[1, 2, 3], 2),
            Err(ShapeError::QueueRecordLength { len: 3, dim: 2 })
        );
        assert_eq!(QueueSet::from_flat(&[1, 2], 0), Err(ShapeError::ZeroDimension));
    }

    #[test]
    fn try_assign_commits_only_when_it_fits() {
        let queues = QueueSet::from_flat(&[10, 5, 4, 6], 1).unwrap();
        let mut capacities = queues.capacities();

        assert!(capacities.try_assign(0, queues.task(1)));
        assert_eq!(capacities.node(0).components(), &[4]);

        // 6 > 5: rejected, and node 1 is untouched
        assert!(!capacities.try_assign(1, queues.task(1)));
        assert_eq!(capacities.node(1).components(), &[5]);

        capacities.release(0, queues.task(1));
        assert_eq!(capacities.node(0).components(), &[10]);
    }

    #[test]
    fn waste_counts_only_sink_tasks() {
        let queues = QueueSet::from_flat(&[10, 5, 4, 6], 1).unwrap();
        assert_eq!(queues.waste(&Distribution::all_sink(2)), 10);
        let dist = Distribution::new(vec![Target::Node(1), Target::Sink]);
        assert_eq!(queues.waste(&dist), 6);
        let dist = Distribution::new(vec![Target::Node(1), Target::Node(0)]);
        assert_eq!(queues.waste(&dist), 0);
    }

    #[test]
    fn validity_checks_every_dimension() {
        let queues = QueueSet::from_flat(&[10, 1, 5, 10, 4, 1, 6, 1], 2).unwrap();
        // Task 0 (4, 1) fits node 0 (10, 1) exactly on the second axis.
        let fits = Distribution::new(vec![Target::Node(0), Target::Sink]);
        assert!(queues.is_valid(&fits));
        // task 1 demands (6, 1); node 1 has (5, 10): axis 0 overdraws.
        let overdraws = Distribution::new(vec![Target::Sink, Target::Node(1)]);
        assert!(!queues.is_valid(&overdraws));
        assert!(queues.is_valid(&Distribution::all_sink(2)));
    }

    #[test]
    fn harmonic_mean_scores() {
        assert_eq!(ResourceVec::new(vec![4, 4]).harmonic_mean(), 4.0);
        // Zero component: defined fallback, sorts last.
        assert_eq!(ResourceVec::new(vec![0, 50]).harmonic_mean(), 0.0);
        assert_eq!(ResourceVec::zero(3).harmonic_mean(), 0.0);
        // Unbalanced vectors score below balanced ones of the same total.
        let balanced = ResourceVec::new(vec![50, 50]).harmonic_mean();
        let skewed = ResourceVec::new(vec![99, 1]).harmonic_mean();
        assert!(balanced > skewed);
    }

    #[test]
    fn compact_codec_round_trip() {
        let dist = Distribution::new(vec![Target::Sink, Target::Node(0), Target::Node(2)]);
        let compact = dist.to_compact();
        assert_eq!(compact, vec![0, 1, 3]);
        assert_eq!(Distribution::from_compact(&compact, 3).unwrap(), dist);
    }

    #[test]
    fn compact_codec_rejects_unknown_node() {
        assert_eq!(
            Distribution::from_compact(&[0, 4], 3),
            Err(ShapeError::TargetOutOfRange {
                task: 1,
                target: 4,
                len: 3
            })
        );
    }

    #[test]
    fn one_hot_codec_round_trip() {
        let dist = Distribution::new(vec![Target::Node(1), Target::Sink]);
        let flags = dist.to_one_hot(2);
        assert_eq!(flags, vec![0, 0, 1, 1, 0, 0]);
        assert_eq!(Distribution::from_one_hot(&flags, 2).unwrap(), dist);
    }

    #[test]
    fn one_hot_empty_group_defaults_to_sink() {
        let dist = Distribution::from_one_hot(&[0, 0, 0, 0, 1, 0], 2).unwrap();
        assert_eq!(
            dist.targets(),
            &[Target::Sink, Target::Node(0)]
        );
    }

    #[test]
    fn one_hot_double_flag_is_malformed() {
        assert_eq!(
            Distribution::from_one_hot(&[1, 1, 0, 0, 0, 1], 2),
            Err(ShapeError::AmbiguousGroup { task: 0 })
        );
    }
}

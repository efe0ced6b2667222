//! # packset-solver
//!
//! The combinatorial engine behind packset's labeled bin-packing datasets.
//!
//! This crate provides:
//! - Exhaustive backtracking search for ground-truth optimal assignments
//! - A deterministic harmonic-mean first-fit baseline
//! - Feasibility repair for externally predicted assignments
//! - Normalized waste statistics for batch evaluation
//!
//! ## Example
//!
//! ```rust
//! use packset_core::QueueSet;
//! use packset_solver::ExactSolver;
//!
//! let queues = QueueSet::from_flat(&[10, 5, 4, 6], 1)?;
//! let annotation = ExactSolver::new().solve(&queues);
//! assert_eq!(annotation.waste, 0);
//! # Ok::<(), packset_core::ShapeError>(())
//! ```

pub mod exact;
pub mod first_fit;
pub mod repair;
pub mod stats;

pub use exact::{Annotation, ExactSolver};
pub use first_fit::first_fit;
pub use repair::repair;
pub use stats::{evaluate, BatchComparison, EvalError, RunningStats, WasteBracket, WasteStats};

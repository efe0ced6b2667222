//! Waste & Statistics Engine
//!
//! Scores predicted distributions against the recorded optimum and the
//! all-sink worst case, then aggregates normalized waste across the batch.
//!
//! Per sample `i` the normalized waste is
//! `(waste_pred_i - waste_opt_i) / max(1, waste_worst_i - waste_opt_i)`.
//! The optimum is the lower bound of the bracket, the all-sink distribution
//! the upper bound; the divider is floored at 1 so a collapsed bracket
//! (optimum == worst) never divides by zero. Consistent inputs land in
//! `[0, 1]`; anything outside that range means a waste computation upstream
//! is wrong and is reported as a diagnostic, never as a failure.
//!
//! Aggregation is a single numerically stable pass (Welford's update), so no
//! large sums accumulate and no second pass over the data is needed.

use packset_core::{Distribution, PredictionBatch, QueueSet, TrainingBatch};
use thiserror::Error;
use tracing::warn;

use crate::first_fit::first_fit;
use crate::repair::repair;

/// Per-sample waste bracket: the optimum (lower bound) and the all-sink
/// worst case (upper bound).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WasteBracket {
    pub optimum: u64,
    pub worst: u64,
}

impl WasteBracket {
    pub fn of(queues: &QueueSet, optimum: &Distribution) -> Self {
        Self {
            optimum: queues.waste(optimum),
            worst: queues.waste(&Distribution::all_sink(queues.len())),
        }
    }

    /// Normalize a predicted waste into this bracket.
    pub fn normalize(&self, predicted: u64) -> f64 {
        let divider = (self.worst.saturating_sub(self.optimum)).max(1) as f64;
        let normalized = (predicted as f64 - self.optimum as f64) / divider;
        if !(0.0..=1.0).contains(&normalized) {
            warn!(
                optimum = self.optimum,
                worst = self.worst,
                predicted,
                normalized,
                "normalized waste outside [0, 1]; upstream waste computation is inconsistent"
            );
        }
        normalized
    }
}

/// Single-pass running mean and variance (Welford).
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let prev_mean = self.mean;
        self.mean += (x - prev_mean) / self.count as f64;
        self.m2 += (x - prev_mean) * (x - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance `M2 / count`, zero for an empty series.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Aggregated normalized waste for one algorithm across a batch.
#[derive(Clone, Copy, Debug)]
pub struct WasteStats {
    pub mean: f64,
    pub std_dev: f64,
    pub samples: u64,
}

impl WasteStats {
    /// Normalize each predicted waste into its bracket and aggregate.
    pub fn from_wastes(brackets: &[WasteBracket], predicted: &[u64]) -> Self {
        let mut stats = RunningStats::new();
        for (bracket, &waste) in brackets.iter().zip(predicted) {
            stats.push(bracket.normalize(waste));
        }
        Self {
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            samples: stats.count(),
        }
    }
}

/// Side-by-side comparison of a predicted batch and the first-fit baseline,
/// both normalized against the same optimum/worst brackets.
#[derive(Clone, Copy, Debug)]
pub struct BatchComparison {
    pub prediction: WasteStats,
    pub first_fit: WasteStats,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("prediction batch has {predictions} samples but the training set has {training}")]
    SampleCountMismatch { training: usize, predictions: usize },
}

/// Evaluate a prediction batch against its training set.
///
/// For every sample the prediction is first made feasible by [`repair`],
/// then scored together with the first-fit baseline inside the sample's
/// optimum/worst bracket.
pub fn evaluate(
    training: &TrainingBatch,
    predictions: &PredictionBatch,
) -> Result<BatchComparison, EvalError> {
    if training.len() != predictions.len() {
        return Err(EvalError::SampleCountMismatch {
            training: training.len(),
            predictions: predictions.len(),
        });
    }

    let mut brackets = Vec::with_capacity(training.len());
    let mut predicted_wastes = Vec::with_capacity(training.len());
    let mut first_fit_wastes = Vec::with_capacity(training.len());

    for (sample, prediction) in training.samples.iter().zip(&predictions.distributions) {
        let queues = &sample.queues;
        brackets.push(WasteBracket::of(queues, &sample.optimum));
        predicted_wastes.push(queues.waste(&repair(queues, prediction)));
        first_fit_wastes.push(queues.waste(&first_fit(queues)));
    }

    Ok(BatchComparison {
        prediction: WasteStats::from_wastes(&brackets, &predicted_wastes),
        first_fit: WasteStats::from_wastes(&brackets, &first_fit_wastes),
    })
}

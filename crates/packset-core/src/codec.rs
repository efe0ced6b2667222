//! Flat-record batch parsing.
//!
//! Training and prediction files are streams of whitespace-separated
//! integers with no count field or length prefix: the number of samples is
//! always derived by dividing the total record length by the per-sample
//! stride.
//!
//! - Training sample stride: `2*L*D` queue values followed by `L*(L+1)`
//!   one-hot optimum flags.
//! - Prediction sample stride: `L*(L+1)` one-hot flags only.

use crate::{Distribution, QueueSet, ShapeError};

/// One training sample: a queue set and the one-hot optimum recorded for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingSample {
    pub queues: QueueSet,
    pub optimum: Distribution,
}

/// A parsed training file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingBatch {
    pub samples: Vec<TrainingSample>,
}

impl TrainingBatch {
    /// Per-sample stride in the flat record: `2*L*D + L*(L+1)`.
    pub fn stride(len: usize, dim: usize) -> usize {
        2 * len * dim + len * (len + 1)
    }

    /// Split a flat record stream into samples.
    pub fn parse(values: &[u32], len: usize, dim: usize) -> Result<Self, ShapeError> {
        let stride = Self::stride(len, dim);
        if values.is_empty() || values.len() % stride != 0 {
            return Err(ShapeError::RecordLength {
                len: values.len(),
                stride,
            });
        }
        let queue_values = 2 * len * dim;
        let samples = values
            .chunks(stride)
            .map(|sample| {
                Ok(TrainingSample {
                    queues: QueueSet::from_flat(&sample[..queue_values], dim)?,
                    optimum: Distribution::from_one_hot(&sample[queue_values..], len)?,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A parsed prediction file: one one-hot distribution per sample, aligned
/// with the training batch it is evaluated against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionBatch {
    pub distributions: Vec<Distribution>,
}

impl PredictionBatch {
    /// Per-sample stride in the flat record: `L*(L+1)`.
    pub fn stride(len: usize) -> usize {
        len * (len + 1)
    }

    pub fn parse(values: &[u32], len: usize) -> Result<Self, ShapeError> {
        let stride = Self::stride(len);
        if values.is_empty() || values.len() % stride != 0 {
            return Err(ShapeError::RecordLength {
                len: values.len(),
                stride,
            });
        }
        let distributions = values
            .chunks(stride)
            .map(|sample| Distribution::from_one_hot(sample, len))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { distributions })
    }

    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Target;
    use pretty_assertions::assert_eq;

    // L = 2, D = 1: stride is 4 queue values + 6 one-hot flags.
    const SAMPLE: [u32; 10] = [10, 5, 4, 6, 0, 1, 0, 0, 0, 1];

    #[test]
    fn training_batch_stride() {
        assert_eq!(TrainingBatch::stride(2, 1), 10);
        assert_eq!(TrainingBatch::stride(10, 2), 150);
    }

    #[test]
    fn parse_training_batch() {
        let mut values = Vec::new();
        values.extend_from_slice(&SAMPLE);
        values.extend_from_slice(&SAMPLE);

        let batch = TrainingBatch::parse(&values, 2, 1).unwrap();
        assert_eq!(batch.len(), 2);
        let sample = &batch.samples[0];
        assert_eq!(sample.queues.node(0).components(), &[10]);
        assert_eq!(
            sample.optimum.targets(),
            &[Target::Node(0), Target::Node(1)]
        );
    }

    #[test]
    fn training_batch_rejects_partial_sample() {
        let err = TrainingBatch::parse(&SAMPLE[..7], 2, 1).unwrap_err();
        assert_eq!(err, ShapeError::RecordLength { len: 7, stride: 10 });
    }

    #[test]
    fn parse_prediction_batch() {
        let values = [0, 1, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0];
        let batch = PredictionBatch::parse(&values, 2).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.distributions[0].targets(),
            &[Target::Node(0), Target::Sink]
        );
        assert_eq!(
            batch.distributions[1].targets(),
            &[Target::Sink, Target::Sink]
        );
    }

    #[test]
    fn prediction_batch_rejects_partial_sample() {
        let err = PredictionBatch::parse(&[1, 0, 0, 1], 2).unwrap_err();
        assert_eq!(err, ShapeError::RecordLength { len: 4, stride: 6 });
    }
}

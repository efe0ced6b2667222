//! Batch evaluation against the first-fit baseline.
//!
//! Reads a training file (queue records followed by one-hot optimum rows)
//! and a prediction file (one-hot rows only), repairs the predictions to
//! feasibility, and prints normalized waste statistics for the predictions
//! and for first-fit side by side. Files are whitespace-separated integers;
//! each line contributes at most one sample stride, as written by the
//! annotation tooling.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use packset_core::{PredictionBatch, TrainingBatch};
use packset_solver::{evaluate, BatchComparison};

pub fn run(file_tr: &Path, file_pr: &Path, dim: usize, length: usize) -> Result<()> {
    if dim == 0 {
        bail!("please add the set's dimension");
    }
    if length == 0 {
        bail!("please add the set's queue length");
    }

    let training_values = read_values(file_tr, TrainingBatch::stride(length, dim))
        .with_context(|| format!("failed to read training set {}", file_tr.display()))?;
    let training = TrainingBatch::parse(&training_values, length, dim)?;

    let prediction_values = read_values(file_pr, PredictionBatch::stride(length))
        .with_context(|| format!("failed to read predictions {}", file_pr.display()))?;
    let predictions = PredictionBatch::parse(&prediction_values, length)?;

    let comparison = evaluate(&training, &predictions)?;
    print!("{}", report(&comparison));
    Ok(())
}

/// Line-oriented integer reader: each line contributes at most `stride`
/// values, so a trailing comment or overlong line cannot shift every
/// subsequent sample.
fn read_values(path: &Path, stride: usize) -> Result<Vec<u32>> {
    let file = File::open(path)?;
    let mut values = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        for item in line.split_whitespace().take(stride) {
            values.push(
                item.parse::<u32>()
                    .with_context(|| format!("'{item}' is not a non-negative integer"))?,
            );
        }
    }
    Ok(values)
}

fn report(comparison: &BatchComparison) -> String {
    format!(
        "\nComparison of wasted resources for First Fit (FF) and provided matches.\n\
         \nThe waste is normalized. Optimal solution has 0 mean and 0 std.\n\
         \nFF\n\nMean: {}\nStandard deviation: {}\n\
         \nCustom Algorithm\n\nMean: {}\nStandard deviation: {}\n",
        comparison.first_fit.mean,
        comparison.first_fit.std_dev,
        comparison.prediction.mean,
        comparison.prediction.std_dev,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use packset_solver::WasteStats;
    use std::io::Write;

    #[test]
    fn reader_truncates_overlong_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 2 3 4 5").unwrap();
        writeln!(file, "6 7").unwrap();
        let values = read_values(file.path(), 3).unwrap();
        assert_eq!(values, vec![1, 2, 3, 6, 7]);
    }

    #[test]
    fn reader_rejects_non_integers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 x 3").unwrap();
        assert!(read_values(file.path(), 3).is_err());
    }

    #[test]
    fn report_lists_both_algorithms() {
        let stats = WasteStats {
            mean: 0.25,
            std_dev: 0.1,
            samples: 4,
        };
        let rendered = report(&BatchComparison {
            prediction: stats,
            first_fit: stats,
        });
        assert!(rendered.contains("FF"));
        assert!(rendered.contains("Custom Algorithm"));
        assert!(rendered.contains("Mean: 0.25"));
    }
}

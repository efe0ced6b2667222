//! Interactive and automatic annotation.
//!
//! Reads one bracketed queue record from stdin, pretty-prints the nodes and
//! jobs side by side, collects a job distribution (either typed in by a
//! human annotator or computed by the exact solver), and appends the record
//! plus its annotations to the training file. Unassignable jobs go to node
//! 0, the virtual sink.

use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use packset_core::QueueSet;
use packset_solver::ExactSolver;

pub fn run(file: &Path, dim: usize, auto: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read queue record from stdin")?;

    let values = parse_bracketed(line.trim())?;
    let queues = QueueSet::from_flat(&values, dim.max(1))?;

    print!("{}", pretty_queues(&queues));

    let annotations = if auto {
        let annotation = ExactSolver::new().solve(&queues);
        let compact = annotation.distribution.to_compact();
        for (job, target) in compact.iter().enumerate() {
            println!("Job {}. : {}", job + 1, target);
        }
        compact
    } else {
        prompt_annotations(queues.len())?
    };

    append_record(file, &values, &annotations)
        .with_context(|| format!("failed to append to {}", file.display()))?;
    Ok(())
}

/// Parse a record of the form `[1, 2, 3]`.
pub fn parse_bracketed(line: &str) -> Result<Vec<u32>> {
    let body = line
        .strip_prefix('[')
        .context("input error: record should start with '['")?
        .strip_suffix(']')
        .context("input error: record should end with ']'")?;
    body.split(',')
        .map(|item| {
            item.trim()
                .parse::<u32>()
                .with_context(|| format!("input error: '{}' is not a non-negative integer", item.trim()))
        })
        .collect()
}

/// Boxed side-by-side rendering of the node and job queues.
///
/// ```text
/// Nodes
///
///    1.         2.
///  -----      -----
/// | 100 |    |   5 |
/// |  71 |    |  22 |
///  -----      -----
/// ```
pub fn pretty_queues(queues: &QueueSet) -> String {
    let mut out = String::new();
    out.push_str("\nNodes\n\n");
    out.push_str(&pretty_queue(queues.nodes(), queues.dim()));
    out.push_str("\nJobs\n\n");
    out.push_str(&pretty_queue(queues.tasks(), queues.dim()));
    out
}

fn pretty_queue(vectors: &[packset_core::ResourceVec], dim: usize) -> String {
    let mut out = String::new();

    for i in 0..vectors.len() {
        out.push_str(&format!("{:>4}.      ", i + 1));
    }
    out.push('\n');

    let rule: String = " -----     ".repeat(vectors.len());
    out.push_str(&rule);
    out.push('\n');

    for d in 0..dim {
        for vector in vectors {
            out.push_str(&format!("| {:>3} |    ", vector.components()[d]));
        }
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// Ask the annotator for one target per job. 0 means unassigned.
fn prompt_annotations(len: usize) -> Result<Vec<u32>> {
    println!("\nAnnotate the best distribution of the jobs on the given nodes.\n");
    println!("Give the assigned node number for each job. (0 means unassigned)\n");

    let stdin = std::io::stdin();
    let mut annotations = Vec::with_capacity(len);
    for job in 0..len {
        print!("Job {}. :  ", job + 1);
        std::io::stdout().flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            bail!("no annotations");
        }
        annotations.push(
            trimmed
                .parse::<u32>()
                .with_context(|| format!("'{trimmed}' is not a valid node number"))?,
        );
    }
    Ok(annotations)
}

/// One training line: the queue record followed by its annotations,
/// space-separated.
pub fn record_line(queues: &[u32], annotations: &[u32]) -> String {
    queues
        .iter()
        .chain(annotations.iter())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn append_record(path: &Path, queues: &[u32], annotations: &[u32]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", record_line(queues, annotations))?;
    Ok(())
}

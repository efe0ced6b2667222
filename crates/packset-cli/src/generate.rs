//! Random instance generation.
//!
//! Each generated record is a flat sequence of `2 * length * dim` integers:
//! `length` node capacity vectors followed by `length` job demand vectors.
//! A configurable fraction of the `2 * length` items is forced to the zero
//! vector ("null" items); every other component is drawn uniformly from
//! `0..=100`.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub struct Options {
    pub length: usize,
    pub dim: usize,
    pub ratio: f64,
    pub size: usize,
    pub naked: bool,
    pub seed: Option<u64>,
}

pub fn run(opts: &Options) -> Result<()> {
    // Clamp rather than reject nonsense values, matching the option
    // defaults' spirit: there is always something to generate.
    let length = opts.length.max(1);
    let dim = opts.dim.max(1);
    let ratio = opts.ratio.clamp(0.0, 1.0);
    let size = opts.size.max(1);

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for _ in 0..size {
        let record = generate_record(&mut rng, length, dim, ratio);
        if opts.naked {
            println!("{}", format_naked(&record));
        } else {
            println!("{}", format_bracketed(&record));
        }
    }
    Ok(())
}

/// Generate one flat queue record.
pub fn generate_record<R: Rng>(rng: &mut R, length: usize, dim: usize, ratio: f64) -> Vec<u32> {
    let nulls = null_item_mask(rng, length, ratio);

    let mut record = Vec::with_capacity(2 * length * dim);
    for item in 0..2 * length {
        for _ in 0..dim {
            if nulls[item] {
                record.push(0);
            } else {
                record.push(rng.random_range(0..=100));
            }
        }
    }
    record
}

/// A shuffled mask marking `floor(ratio * 2 * length)` of the items null.
fn null_item_mask<R: Rng>(rng: &mut R, length: usize, ratio: f64) -> Vec<bool> {
    let items = 2 * length;
    let nulls = (ratio * items as f64) as usize;
    let mut mask = vec![false; items];
    for slot in mask.iter_mut().take(nulls) {
        *slot = true;
    }
    mask.shuffle(rng);
    mask
}

pub fn format_bracketed(record: &[u32]) -> String {
    let body = record
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{body}]")
}

pub fn format_naked(record: &[u32]) -> String {
    record
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

//! packset CLI - Bin-Packing Dataset Builder
//!
//! Command-line interface for generating problem instances, annotating them
//! with ground-truth optimal assignments, and evaluating predicted
//! assignments against the first-fit baseline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod annotate;
mod evaluate;
mod generate;

#[derive(Parser)]
#[command(name = "packset")]
#[command(author, version, about = "Bin-packing dataset builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random node and job queues
    Generate {
        /// Length of the queues
        #[arg(short, long, default_value_t = 10)]
        length: usize,

        /// Dimension of the items
        #[arg(short, long, default_value_t = 2)]
        dim: usize,

        /// Fraction of empty nodes and/or jobs, distributed randomly
        #[arg(short, long, default_value_t = 0.2)]
        ratio: f64,

        /// Number of generated queue pairs
        #[arg(short, long, default_value_t = 1)]
        size: usize,

        /// Naked output: no '[', ',', ']'
        #[arg(short, long)]
        naked: bool,

        /// Seed for reproducible output (entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Annotate one queue pair with an optimal job distribution
    Annotate {
        /// Results are appended to this file
        #[arg(short, long, default_value = "ann.txt")]
        file: std::path::PathBuf,

        /// Dimension of the items
        #[arg(short, long, default_value_t = 2)]
        dim: usize,

        /// Automatically find one optimal solution (exponential runtime!)
        #[arg(short, long)]
        auto: bool,
    },

    /// Compare predicted solutions to the first-fit baseline
    Evaluate {
        /// Training set file with optimal solutions
        #[arg(short = 't', long)]
        file_tr: std::path::PathBuf,

        /// Predicted solutions
        #[arg(short = 'p', long)]
        file_pr: std::path::PathBuf,

        /// Dimension of the items
        #[arg(short, long)]
        dim: usize,

        /// Length of the queues
        #[arg(short, long)]
        length: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            length,
            dim,
            ratio,
            size,
            naked,
            seed,
        } => generate::run(&generate::Options {
            length,
            dim,
            ratio,
            size,
            naked,
            seed,
        }),
        Commands::Annotate { file, dim, auto } => annotate::run(&file, dim, auto),
        Commands::Evaluate {
            file_tr,
            file_pr,
            dim,
            length,
        } => evaluate::run(&file_tr, &file_pr, dim, length),
    }
}

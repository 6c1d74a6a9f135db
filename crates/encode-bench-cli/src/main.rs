//! encode-bench CLI - external image encoder benchmark

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// Benchmark an external image encoder over a directory of images.
#[derive(Parser)]
#[command(name = "encode-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode every image in a directory and report timing and size statistics
    Run(RunArgs),

    /// Show statistics from a saved JSON report
    Stats {
        /// JSON report written by `run --json`
        input: PathBuf,

        /// List every file, not just the summary
        #[arg(long)]
        files: bool,
    },
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Directory containing input images (.png, .jpg, .jpeg)
    images_dir: PathBuf,

    /// Output CSV file path
    output_csv: PathBuf,

    /// Path to the encoder executable
    #[arg(long, env = "ENCODE_BENCH_ENCODER")]
    encoder: PathBuf,

    /// Tolerance value forwarded to the encoder
    #[arg(long, env = "ENCODE_BENCH_TOLERANCE")]
    tolerance: Option<f64>,

    /// Keep encoded output files after the run
    #[arg(long)]
    keep_artifacts: bool,

    /// Directory for encoded output files
    #[arg(long, default_value = encode_bench::eval::session::DEFAULT_ARTIFACT_DIR)]
    artifact_dir: PathBuf,

    /// Extension of encoded output files
    #[arg(long, default_value = encode_bench::eval::session::DEFAULT_OUTPUT_EXTENSION)]
    extension: String,

    /// Also write a JSON report with per-file metrics and statistics
    #[arg(long)]
    json: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "encode_bench=debug" } else { "encode_bench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Stats { input, files } => commands::stats::run(input, files, cli.verbose),
    }
}

//! Benchmark run command.

use anyhow::{Context, Result};
use encode_bench::{BenchConfig, BenchSession, FileStatus, Progress, write_csv};

use crate::RunArgs;
use crate::output;

pub fn run(args: RunArgs, verbose: bool) -> Result<()> {
    let config = BenchConfig::builder()
        .input_dir(&args.images_dir)
        .encoder_path(&args.encoder)
        .report_path(&args.output_csv)
        .json_path(args.json.clone())
        .tolerance(args.tolerance)
        .keep_artifacts(args.keep_artifacts)
        .artifact_dir(&args.artifact_dir)
        .output_extension(&args.extension)
        .build()
        .context("Invalid configuration")?;

    let session = BenchSession::external(config).context("Cannot start benchmark")?;
    let corpus = session
        .discover()
        .with_context(|| format!("Cannot read images from {}", args.images_dir.display()))?;

    if verbose {
        eprintln!("Found {} images in {}", corpus.len(), args.images_dir.display());
    }

    let run = session.run_corpus(&corpus, |progress| match progress {
        Progress::Started { index, total, name } => {
            println!("[{}/{}] Processing {}...", index + 1, total, name);
        }
        Progress::Finished { metric, .. } => match metric.status {
            FileStatus::Ok => {
                if verbose {
                    output::file_ok(metric);
                }
            }
            FileStatus::NoOutput => output::warning(&format!(
                "{}: encoder exited successfully but wrote no output",
                metric.name
            )),
            FileStatus::Error => {
                output::error(metric.error_message.as_deref().unwrap_or("encode failed"));
            }
        },
    })?;

    let report_path = &session.config().report_path;
    write_csv(report_path, &run.metrics)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    let stats = run.statistics();
    output::summary(&stats);

    if let Some(json_path) = &session.config().json_path {
        session
            .report(&run)
            .save_json(json_path)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        println!("JSON report written to {}", json_path.display());
    }

    println!("Results written to {}", report_path.display());
    if session.config().keep_artifacts {
        println!("Encoded files kept in {}", session.config().artifact_dir.display());
    }

    Ok(())
}

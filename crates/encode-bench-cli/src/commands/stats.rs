//! Statistics command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use encode_bench::RunReport;

use crate::output;

pub fn run(input: PathBuf, files: bool, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("Loading report from: {}", input.display());
    }

    let report = RunReport::load_json(&input)
        .with_context(|| format!("Failed to load report {}", input.display()))?;

    println!("Encoder: {}", report.encoder);
    println!("Input: {}", report.input_dir.display());
    if let Some(t) = report.tolerance {
        println!("Tolerance: {t}");
    }
    println!("Generated: {}", report.timestamp.to_rfc3339());

    if files {
        println!();
        output::file_table(&report.files);
    }

    output::summary(&report.statistics);
    Ok(())
}

//! Console output formatting.

use colored::Colorize;
use encode_bench::{FileMetric, FileStatus, RunStatistics, Summary};

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print an error message
pub(crate) fn error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

/// Print a one-line result for an encoded file
pub(crate) fn file_ok(metric: &FileMetric) {
    println!(
        "{} {} -> {} bytes ({}), {} ms, {} passes",
        "[OK]".green().bold(),
        metric.name,
        opt(metric.final_bytes),
        metric.savings_pct.map_or("-".to_string(), |p| format!("{p:.2}% saved")),
        metric.encoding_time_ms.map_or("-".to_string(), |t| format!("{t:.2}")),
        opt(metric.passes),
    );
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or("-".to_string(), |v| v.to_string())
}

/// Human-readable byte count.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

fn dispersion(summary: &Summary, precision: usize) -> String {
    if summary.is_empty() {
        return "-".to_string();
    }
    format!(
        "avg {:.p$} ± {:.p$}, median {:.p$} (min {:.p$}, max {:.p$}, n={})",
        summary.mean,
        summary.std_dev,
        summary.median,
        summary.min,
        summary.max,
        summary.count,
        p = precision
    )
}

/// Print the run summary
pub(crate) fn summary(stats: &RunStatistics) {
    section("Files");
    kv("Processed", stats.counts.total);
    kv("OK", stats.counts.ok.to_string().green());
    kv("No output", stats.counts.no_output.to_string().yellow());
    kv("Errors", stats.counts.error.to_string().red());

    section("Throughput");
    kv("Wall time", format!("{:.2} s", stats.wall_elapsed_s));
    kv("Images/s", format!("{:.2}", stats.images_per_sec));
    kv("Input", format!("{}/s", format_bytes(stats.input_bytes_per_sec as u64)));
    kv("Output", format!("{}/s", format_bytes(stats.output_bytes_per_sec as u64)));

    section("Compression");
    kv("Original", format_bytes(stats.original_total_bytes));
    kv("Final", format_bytes(stats.final_total_bytes));
    kv("Saved", format_bytes(stats.savings_total_bytes));
    kv("Saved overall", format!("{:.2}%", stats.pct_saved_overall));
    kv("Saved (geomean)", geomean_savings(stats));

    section("Encoding");
    kv("Time (ms)", dispersion(&stats.encoding_time_ms, 2));
    kv("Passes", dispersion(&stats.passes, 2));

    if stats.counts.ok == 0 {
        warning("No successfully encoded images; statistics are empty");
    }
}

/// Geometric-mean savings, noting ok files whose empty output was left out.
pub(crate) fn geomean_savings(stats: &RunStatistics) -> String {
    let value = stats
        .geomean_savings_pct
        .map_or("-".to_string(), |p| format!("{p:.2}%"));
    match stats.geomean_excluded {
        0 => value,
        1 => format!("{value} (1 empty output excluded)"),
        n => format!("{value} ({n} empty outputs excluded)"),
    }
}

/// Print one row per file
pub(crate) fn file_table(files: &[FileMetric]) {
    println!(
        "{:<30} {:>12} {:>12} {:>9} {:>10} {:>7} {:>10}",
        "Image", "Original", "Final", "Saved %", "Time ms", "Passes", "Status"
    );
    println!("{:-<96}", "");

    for f in files {
        let name = if f.name.chars().count() > 28 {
            let tail_start = f.name.char_indices().rev().nth(24).map_or(0, |(i, _)| i);
            format!("...{}", &f.name[tail_start..])
        } else {
            f.name.clone()
        };
        let status = match f.status {
            FileStatus::Ok => f.status.as_str().green(),
            FileStatus::NoOutput => f.status.as_str().yellow(),
            FileStatus::Error => f.status.as_str().red(),
        };
        println!(
            "{:<30} {:>12} {:>12} {:>9} {:>10} {:>7} {:>10}",
            name,
            f.original_bytes,
            opt(f.final_bytes),
            f.savings_pct.map_or("-".to_string(), |p| format!("{p:.2}")),
            f.encoding_time_ms.map_or("-".to_string(), |t| format!("{t:.2}")),
            opt(f.passes),
            status,
        );
    }
}

//! # encode-bench
//!
//! Benchmark harness for external image encoders.
//!
//! The harness runs an encoder executable once per image in a directory,
//! records elapsed time, the encoder's reported pass count and the resulting
//! file size, then folds the per-file records into run statistics:
//! throughput, size-weighted and geometric-mean savings, and timing
//! dispersion.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use encode_bench::{BenchConfig, BenchSession, write_csv};
//!
//! let config = BenchConfig::builder()
//!     .input_dir("./images")
//!     .encoder_path("./oavif")
//!     .report_path("results.csv")
//!     .tolerance(Some(1.0))
//!     .build()?;
//!
//! let session = BenchSession::external(config)?;
//! let run = session.run(|_| {})?;
//! write_csv(&session.config().report_path, &run.metrics)?;
//!
//! let stats = run.statistics();
//! println!("{:.2}% saved", stats.pct_saved_overall);
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`corpus`]: Input image discovery
//! - [`encoder`]: Encoder invocation and diagnostic parsing
//! - [`eval`]: Per-file metrics, benchmark session and reports
//! - [`stats`]: Run-level aggregation

pub mod corpus;
pub mod encoder;
pub mod error;
pub mod eval;
pub mod stats;

#[cfg(all(test, unix))]
mod testutil;

// Re-export commonly used types
pub use corpus::{Corpus, CorpusImage};
pub use encoder::{EncodeOutcome, Encoder, ExternalEncoder, parse_passes};
pub use error::{Error, Result};
pub use eval::{
    BenchConfig, BenchRun, BenchSession, FileMetric, FileStatus, Progress, RunReport, write_csv,
};
pub use stats::{RunStatistics, StatusCounts, Summary};

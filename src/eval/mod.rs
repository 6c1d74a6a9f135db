//! Benchmark pipeline and report generation.
//!
//! - [`metric`]: Per-file measurement records ([`FileMetric`], [`FileStatus`])
//! - [`session::BenchSession`]: Runs an encoder over a directory of images
//! - [`session::BenchConfig`]: Configuration for a run
//! - [`report`]: CSV and JSON output

pub mod metric;
pub mod report;
pub mod session;

pub use metric::{FileMetric, FileStatus};
pub use report::{RunReport, write_csv};
pub use session::{BenchConfig, BenchConfigBuilder, BenchRun, BenchSession, Progress};

//! Subprocess-backed encoder.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

use tracing::debug;

use super::{EncodeOutcome, Encoder};

/// Runs an encoder executable once per image.
///
/// The command line is `<executable> [--tolerance <value>] <input> <output>`.
/// Diagnostic text is read from stderr. No timeout is applied, so a hung
/// encoder blocks the caller.
#[derive(Debug, Clone)]
pub struct ExternalEncoder {
    executable: PathBuf,
    tolerance: Option<f64>,
    id: String,
}

impl ExternalEncoder {
    /// Create an encoder for the given executable.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let id = executable
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("encoder")
            .to_string();
        Self {
            executable,
            tolerance: None,
            id,
        }
    }

    /// Forward a tolerance value to the encoder.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Path to the executable.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Tolerance forwarded to the encoder, if any.
    #[must_use]
    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        if let Some(tolerance) = self.tolerance {
            cmd.arg("--tolerance").arg(tolerance.to_string());
        }
        cmd.arg(input).arg(output);
        cmd
    }
}

impl Encoder for ExternalEncoder {
    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, input: &Path, output: &Path) -> EncodeOutcome {
        let mut cmd = self.command(input, output);
        debug!(encoder = %self.executable.display(), input = %input.display(), "invoking encoder");

        let start = Instant::now();
        let result = cmd.output();
        let elapsed = start.elapsed();

        match result {
            Err(e) => EncodeOutcome::Failed {
                error_detail: format!(
                    "Failed to run {}: {e}",
                    self.executable.display()
                ),
                diagnostic_text: String::new(),
            },
            Ok(out) => {
                let diagnostic_text = diagnostic_text(&out);
                if out.status.success() {
                    EncodeOutcome::Ok {
                        elapsed,
                        diagnostic_text,
                    }
                } else {
                    let error_detail = match diagnostic_text.trim() {
                        "" => format!("Error processing {}: {}", input.display(), out.status),
                        text => format!(
                            "Error processing {}: {}: {}",
                            input.display(),
                            out.status,
                            text
                        ),
                    };
                    EncodeOutcome::Failed {
                        error_detail,
                        diagnostic_text,
                    }
                }
            }
        }
    }
}

/// Stderr, or stdout when the encoder wrote nothing to stderr.
fn diagnostic_text(out: &Output) -> String {
    if out.stderr.is_empty() {
        String::from_utf8_lossy(&out.stdout).into_owned()
    } else {
        String::from_utf8_lossy(&out.stderr).into_owned()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::testutil::{fake_encoder, write_input};

    #[test]
    fn test_id_from_file_name() {
        let enc = ExternalEncoder::new("/usr/local/bin/oavif");
        assert_eq!(enc.id(), "oavif");
        assert_eq!(enc.tolerance(), None);
    }

    #[test]
    fn test_command_args() {
        let enc = ExternalEncoder::new("enc").with_tolerance(Some(0.5));
        let cmd = enc.command(Path::new("in.png"), Path::new("out.avif"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["--tolerance", "0.5", "in.png", "out.avif"]);

        let enc = ExternalEncoder::new("enc");
        let cmd = enc.command(Path::new("in.png"), Path::new("out.avif"));
        assert_eq!(cmd.get_args().count(), 2);
    }

    #[test]
    fn test_successful_encode() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.png", b"IMG", 1000);
        let output = dir.path().join("a.avif");

        let outcome = ExternalEncoder::new(fake_encoder()).encode(&input, &output);
        match outcome {
            EncodeOutcome::Ok { diagnostic_text, .. } => {
                assert!(diagnostic_text.contains("3 passes"));
            }
            EncodeOutcome::Failed { error_detail, .. } => panic!("unexpected failure: {error_detail}"),
        }
        assert_eq!(std::fs::metadata(&output).unwrap().len(), 400);
    }

    #[test]
    fn test_tolerance_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.png", b"IMG", 10);
        let output = dir.path().join("a.avif");

        let outcome = ExternalEncoder::new(fake_encoder())
            .with_tolerance(Some(2.5))
            .encode(&input, &output);
        assert!(outcome.diagnostic_text().contains("tolerance=2.5"));
    }

    #[test]
    fn test_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "bad.png", b"FAIL", 10);
        let output = dir.path().join("bad.avif");

        let outcome = ExternalEncoder::new(fake_encoder()).encode(&input, &output);
        match outcome {
            EncodeOutcome::Failed { error_detail, diagnostic_text } => {
                assert!(error_detail.contains("bad.png"));
                assert!(diagnostic_text.contains("cannot decode"));
            }
            EncodeOutcome::Ok { .. } => panic!("expected failure"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_success_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "done.png", b"SKIP", 10);
        let output = dir.path().join("done.avif");

        let outcome = ExternalEncoder::new(fake_encoder()).encode(&input, &output);
        assert!(outcome.is_ok());
        assert!(outcome.diagnostic_text().contains("already optimal"));
        assert!(!output.exists());

        let metric = crate::eval::FileMetric::build("done.png", 10, &outcome, &output);
        assert_eq!(metric.status, crate::eval::FileStatus::NoOutput);
        assert_eq!(metric.final_bytes, None);
    }

    #[test]
    fn test_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = ExternalEncoder::new(dir.path().join("missing-encoder"))
            .encode(Path::new("a.png"), Path::new("a.avif"));
        match outcome {
            EncodeOutcome::Failed { error_detail, .. } => {
                assert!(error_detail.starts_with("Failed to run"));
            }
            EncodeOutcome::Ok { .. } => panic!("expected launch failure"),
        }
    }
}

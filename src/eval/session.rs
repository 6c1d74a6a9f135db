//! Benchmark session: the sequential encode-and-measure pipeline.
//!
//! [`BenchSession`] walks a [`Corpus`] one image at a time, hands each image to
//! an [`Encoder`], and turns every outcome into an immutable [`FileMetric`].
//! The finished list, together with the wall-clock time of the whole loop, is
//! returned as a [`BenchRun`] for aggregation.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::corpus::{Corpus, CorpusImage};
use crate::encoder::{EncodeOutcome, Encoder, ExternalEncoder};
use crate::error::{Error, Result};
use crate::eval::report::RunReport;
use crate::eval::{FileMetric, FileStatus};
use crate::stats::RunStatistics;

/// Default directory for encoder output files.
pub const DEFAULT_ARTIFACT_DIR: &str = "encode-bench-output";

/// Default extension for encoder output files.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "avif";

/// Configuration for a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Directory containing input images.
    pub input_dir: PathBuf,

    /// Encoder executable.
    pub encoder_path: PathBuf,

    /// CSV report destination.
    pub report_path: PathBuf,

    /// Optional JSON report destination.
    pub json_path: Option<PathBuf>,

    /// Tolerance forwarded to the encoder.
    pub tolerance: Option<f64>,

    /// Keep encoder output files after the run.
    pub keep_artifacts: bool,

    /// Directory for encoder output files.
    pub artifact_dir: PathBuf,

    /// Extension appended to encoder output files.
    pub output_extension: String,
}

impl BenchConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder::default()
    }

    /// Check that the encoder and input directory exist.
    pub fn validate(&self) -> Result<()> {
        if !self.encoder_path.is_file() {
            return Err(Error::EncoderNotFound {
                path: self.encoder_path.clone(),
            });
        }
        if !self.input_dir.exists() {
            return Err(Error::InputDirNotFound {
                path: self.input_dir.clone(),
            });
        }
        if !self.input_dir.is_dir() {
            return Err(Error::NotADirectory {
                path: self.input_dir.clone(),
            });
        }
        Ok(())
    }

    /// Where the encoder should write output for `image`.
    ///
    /// The input's full file name is kept, so `a.png` and `a.jpg` map to
    /// different artifacts.
    #[must_use]
    pub fn artifact_path(&self, image: &CorpusImage) -> PathBuf {
        self.artifact_dir
            .join(format!("{}.{}", image.name(), self.output_extension))
    }

    /// Build the subprocess encoder described by this configuration.
    #[must_use]
    pub fn external_encoder(&self) -> ExternalEncoder {
        ExternalEncoder::new(&self.encoder_path).with_tolerance(self.tolerance)
    }
}

/// Builder for [`BenchConfig`].
#[derive(Debug, Default)]
pub struct BenchConfigBuilder {
    input_dir: Option<PathBuf>,
    encoder_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
    tolerance: Option<f64>,
    keep_artifacts: bool,
    artifact_dir: Option<PathBuf>,
    output_extension: Option<String>,
}

impl BenchConfigBuilder {
    /// Set the input image directory.
    #[must_use]
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }

    /// Set the encoder executable.
    #[must_use]
    pub fn encoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoder_path = Some(path.into());
        self
    }

    /// Set the CSV report path.
    #[must_use]
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Also write a JSON report.
    #[must_use]
    pub fn json_path(mut self, path: Option<PathBuf>) -> Self {
        self.json_path = path;
        self
    }

    /// Set the tolerance forwarded to the encoder.
    #[must_use]
    pub fn tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Keep encoder output files after the run.
    #[must_use]
    pub fn keep_artifacts(mut self, keep: bool) -> Self {
        self.keep_artifacts = keep;
        self
    }

    /// Set the directory for encoder output files.
    #[must_use]
    pub fn artifact_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(path.into());
        self
    }

    /// Set the output file extension (without the dot).
    #[must_use]
    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.output_extension = Some(ext.into());
        self
    }

    /// Build the configuration.
    ///
    /// Fails if a required path is missing, the tolerance is not finite,
    /// or the extension is empty.
    pub fn build(self) -> Result<BenchConfig> {
        let input_dir = self
            .input_dir
            .ok_or_else(|| Error::Config("input_dir is required".to_string()))?;
        let encoder_path = self
            .encoder_path
            .ok_or_else(|| Error::Config("encoder_path is required".to_string()))?;
        let report_path = self
            .report_path
            .ok_or_else(|| Error::Config("report_path is required".to_string()))?;

        if let Some(t) = self.tolerance {
            if !t.is_finite() {
                return Err(Error::Config(format!("tolerance must be finite, got {t}")));
            }
        }

        let output_extension = self
            .output_extension
            .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string())
            .trim_start_matches('.')
            .to_string();
        if output_extension.is_empty() {
            return Err(Error::Config("output extension must not be empty".to_string()));
        }

        Ok(BenchConfig {
            input_dir,
            encoder_path,
            report_path,
            json_path: self.json_path,
            tolerance: self.tolerance,
            keep_artifacts: self.keep_artifacts,
            artifact_dir: self
                .artifact_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR)),
            output_extension,
        })
    }
}

/// Progress notification emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// About to encode an image.
    Started {
        /// Zero-based position in the corpus.
        index: usize,
        /// Number of images in the corpus.
        total: usize,
        /// Image file name.
        name: &'a str,
    },
    /// Finished an image.
    Finished {
        /// Zero-based position in the corpus.
        index: usize,
        /// Number of images in the corpus.
        total: usize,
        /// Resulting metric.
        metric: &'a FileMetric,
    },
}

/// Completed benchmark run.
#[derive(Debug, Clone)]
pub struct BenchRun {
    /// Per-file metrics in processing order.
    pub metrics: Vec<FileMetric>,

    /// Wall-clock time around the whole image sequence.
    pub wall_elapsed: Duration,
}

impl BenchRun {
    /// Aggregate the run.
    #[must_use]
    pub fn statistics(&self) -> RunStatistics {
        RunStatistics::compute(&self.metrics, self.wall_elapsed)
    }
}

/// Benchmark session driving one encoder over one corpus.
///
/// # Example
///
/// ```rust,ignore
/// use encode_bench::{BenchConfig, BenchSession};
///
/// let config = BenchConfig::builder()
///     .input_dir("./images")
///     .encoder_path("./oavif")
///     .report_path("results.csv")
///     .build()?;
///
/// let session = BenchSession::external(config)?;
/// let run = session.run(|_| {})?;
/// println!("{:.2} images/s", run.statistics().images_per_sec);
/// ```
pub struct BenchSession<E: Encoder> {
    config: BenchConfig,
    encoder: E,
}

impl BenchSession<ExternalEncoder> {
    /// Create a session for the configured encoder executable.
    ///
    /// Validates the configuration first.
    pub fn external(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let encoder = config.external_encoder();
        Ok(Self { config, encoder })
    }
}

impl<E: Encoder> BenchSession<E> {
    /// Create a session with a caller-provided encoder.
    #[must_use]
    pub fn with_encoder(config: BenchConfig, encoder: E) -> Self {
        Self { config, encoder }
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// The encoder under test.
    #[must_use]
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Discover the input images.
    ///
    /// Fails before any encoding if the directory is missing or has no images.
    pub fn discover(&self) -> Result<Corpus> {
        Corpus::discover(&self.config.input_dir)
    }

    /// Encode every image in the input directory, one at a time.
    ///
    /// Per-image failures are recorded in the returned metrics; only
    /// discovery and artifact directory problems abort the run.
    pub fn run(&self, on_progress: impl FnMut(Progress<'_>)) -> Result<BenchRun> {
        let corpus = self.discover()?;
        self.run_corpus(&corpus, on_progress)
    }

    /// Encode every image in an already discovered corpus.
    pub fn run_corpus(
        &self,
        corpus: &Corpus,
        mut on_progress: impl FnMut(Progress<'_>),
    ) -> Result<BenchRun> {
        let created_dir = !self.config.artifact_dir.exists();
        std::fs::create_dir_all(&self.config.artifact_dir)?;
        info!(
            encoder = self.encoder.id(),
            images = corpus.len(),
            dir = %corpus.root_path.display(),
            "starting benchmark run"
        );

        let total = corpus.len();
        let mut metrics = Vec::with_capacity(total);
        let start = Instant::now();

        for (index, image) in corpus.images.iter().enumerate() {
            on_progress(Progress::Started {
                index,
                total,
                name: image.name(),
            });
            let metric = self.process_image(image);
            on_progress(Progress::Finished {
                index,
                total,
                metric: &metric,
            });
            metrics.push(metric);
        }

        let wall_elapsed = start.elapsed();
        info!(
            elapsed_s = wall_elapsed.as_secs_f64(),
            images = metrics.len(),
            "benchmark run finished"
        );

        if !self.config.keep_artifacts {
            self.remove_artifacts(corpus, created_dir);
        }

        Ok(BenchRun {
            metrics,
            wall_elapsed,
        })
    }

    fn process_image(&self, image: &CorpusImage) -> FileMetric {
        let name = image.name();
        let output = self.config.artifact_path(image);
        remove_stale(&output);

        let original_bytes = match image.file_size() {
            Ok(size) => size,
            Err(e) => {
                warn!(image = name, error = %e, "cannot read input size");
                let outcome = EncodeOutcome::Failed {
                    error_detail: format!("Failed to read {}: {e}", image.path.display()),
                    diagnostic_text: String::new(),
                };
                return FileMetric::from_parts(name, 0, &outcome, None);
            }
        };

        let outcome = self.encoder.encode(&image.path, &output);
        let metric = FileMetric::build(name, original_bytes, &outcome, &output);

        match metric.status {
            FileStatus::Ok => debug!(
                image = name,
                final_bytes = metric.final_bytes,
                time_ms = metric.encoding_time_ms,
                passes = metric.passes,
                "encoded"
            ),
            FileStatus::NoOutput => {
                debug!(image = name, output = %output.display(), "encoder produced no output");
            }
            FileStatus::Error => debug!(
                image = name,
                error = metric.error_message.as_deref().unwrap_or(""),
                "encode failed"
            ),
        }

        metric
    }

    fn remove_artifacts(&self, corpus: &Corpus, created_dir: bool) {
        for image in &corpus.images {
            remove_stale(&self.config.artifact_path(image));
        }
        // A directory that existed before the run belongs to the caller.
        if !created_dir {
            return;
        }
        // Only succeeds if nothing else lives there.
        if std::fs::remove_dir(&self.config.artifact_dir).is_ok() {
            debug!(dir = %self.config.artifact_dir.display(), "removed artifact directory");
        }
    }

    /// Bundle a finished run into a [`RunReport`].
    #[must_use]
    pub fn report(&self, run: &BenchRun) -> RunReport {
        RunReport {
            timestamp: chrono::Utc::now(),
            encoder: self.encoder.id().to_string(),
            tolerance: self.config.tolerance,
            input_dir: self.config.input_dir.clone(),
            statistics: run.statistics(),
            files: run.metrics.clone(),
        }
    }
}

fn remove_stale(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "cannot remove artifact"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Encoder that writes a fixed fraction of the input and records calls.
    struct HalfEncoder {
        calls: RefCell<Vec<String>>,
    }

    impl Encoder for HalfEncoder {
        fn id(&self) -> &str {
            "half"
        }

        fn encode(&self, input: &Path, output: &Path) -> EncodeOutcome {
            let name = input.file_name().unwrap().to_string_lossy().into_owned();
            self.calls.borrow_mut().push(name.clone());
            if name.starts_with("bad") {
                return EncodeOutcome::Failed {
                    error_detail: format!("Error processing {name}"),
                    diagnostic_text: String::new(),
                };
            }
            if !name.starts_with("skip") {
                let len = std::fs::metadata(input).unwrap().len() / 2;
                std::fs::write(output, vec![0u8; len as usize]).unwrap();
            }
            EncodeOutcome::Ok {
                elapsed: Duration::from_millis(5),
                diagnostic_text: "2 passes".to_string(),
            }
        }
    }

    fn config(input: &Path, artifacts: &Path, keep: bool) -> BenchConfig {
        BenchConfig::builder()
            .input_dir(input)
            .encoder_path("/unused")
            .report_path(input.join("out.csv"))
            .artifact_dir(artifacts)
            .keep_artifacts(keep)
            .build()
            .unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = BenchConfig::builder()
            .input_dir("imgs")
            .encoder_path("bin/oavif")
            .report_path("out.csv")
            .tolerance(Some(1.5))
            .output_extension(".jxl")
            .build()
            .unwrap();

        assert_eq!(config.artifact_dir, PathBuf::from(DEFAULT_ARTIFACT_DIR));
        assert_eq!(config.output_extension, "jxl");
        assert_eq!(config.tolerance, Some(1.5));
        assert!(!config.keep_artifacts);
        assert_eq!(
            config.artifact_path(&CorpusImage::new("imgs/a.png")),
            PathBuf::from(DEFAULT_ARTIFACT_DIR).join("a.png.jxl")
        );
    }

    #[test]
    fn test_config_builder_errors() {
        let err = BenchConfig::builder().encoder_path("e").report_path("r").build().unwrap_err();
        assert!(err.is_config());

        let err = BenchConfig::builder()
            .input_dir("i")
            .encoder_path("e")
            .report_path("r")
            .tolerance(Some(f64::NAN))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_missing_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig::builder()
            .input_dir(dir.path())
            .encoder_path(dir.path().join("nope"))
            .report_path("r.csv")
            .build()
            .unwrap();
        assert!(matches!(config.validate(), Err(Error::EncoderNotFound { .. })));
        assert!(BenchSession::external(config).is_err());
    }

    #[test]
    fn test_validate_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = dir.path().join("enc");
        std::fs::write(&encoder, b"").unwrap();
        let config = BenchConfig::builder()
            .input_dir(dir.path().join("missing"))
            .encoder_path(&encoder)
            .report_path("r.csv")
            .build()
            .unwrap();
        assert!(matches!(config.validate(), Err(Error::InputDirNotFound { .. })));
    }

    #[test]
    fn test_run_mixed_outcomes() {
        let input = tempfile::tempdir().unwrap();
        let artifacts = tempfile::tempdir().unwrap();
        for (name, size) in [("c.png", 1000), ("bad.jpg", 300), ("skip.jpeg", 50), ("a.png", 200)] {
            std::fs::write(input.path().join(name), vec![1u8; size]).unwrap();
        }

        let encoder = HalfEncoder { calls: RefCell::new(Vec::new()) };
        let session =
            BenchSession::with_encoder(config(input.path(), artifacts.path(), true), encoder);

        let mut started = Vec::new();
        let run = session
            .run(|p| {
                if let Progress::Started { name, .. } = p {
                    started.push(name.to_string());
                }
            })
            .unwrap();

        let order = vec!["a.png", "bad.jpg", "c.png", "skip.jpeg"];
        assert_eq!(started, order);
        assert_eq!(*session.encoder().calls.borrow(), order);

        let statuses: Vec<FileStatus> = run.metrics.iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![FileStatus::Ok, FileStatus::Error, FileStatus::Ok, FileStatus::NoOutput]
        );
        assert_eq!(run.metrics[2].final_bytes, Some(500));
        assert_eq!(run.metrics[1].original_bytes, 300);

        let stats = run.statistics();
        assert_eq!(stats.counts.ok, 2);
        assert_eq!(stats.original_total_bytes, 1200);
        assert_eq!(stats.final_total_bytes, 600);
        assert!((stats.geomean_savings_pct.unwrap() - 50.0).abs() < 1e-9);

        // Artifacts kept.
        assert!(artifacts.path().join("c.png.avif").exists());
    }

    #[test]
    fn test_run_removes_artifacts() {
        let input = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let artifacts = scratch.path().join("out");
        std::fs::write(input.path().join("a.png"), vec![1u8; 100]).unwrap();

        let encoder = HalfEncoder { calls: RefCell::new(Vec::new()) };
        let session = BenchSession::with_encoder(config(input.path(), &artifacts, false), encoder);
        let run = session.run(|_| {}).unwrap();

        assert_eq!(run.metrics[0].status, FileStatus::Ok);
        assert!(!artifacts.exists());
    }

    #[test]
    fn test_run_keeps_existing_artifact_dir() {
        let input = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let artifacts = scratch.path().join("mine");
        std::fs::create_dir(&artifacts).unwrap();
        std::fs::write(input.path().join("a.png"), vec![1u8; 100]).unwrap();

        let encoder = HalfEncoder { calls: RefCell::new(Vec::new()) };
        let session = BenchSession::with_encoder(config(input.path(), &artifacts, false), encoder);
        let run = session.run(|_| {}).unwrap();

        assert_eq!(run.metrics[0].status, FileStatus::Ok);
        assert!(artifacts.is_dir());
        assert!(!artifacts.join("a.png.avif").exists());
    }

    #[test]
    fn test_stale_artifact_is_not_counted() {
        let input = tempfile::tempdir().unwrap();
        let artifacts = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("skip.png"), vec![1u8; 100]).unwrap();
        std::fs::write(artifacts.path().join("skip.png.avif"), b"old").unwrap();

        let encoder = HalfEncoder { calls: RefCell::new(Vec::new()) };
        let session =
            BenchSession::with_encoder(config(input.path(), artifacts.path(), true), encoder);
        let run = session.run(|_| {}).unwrap();

        assert_eq!(run.metrics[0].status, FileStatus::NoOutput);
    }

    #[test]
    fn test_run_fails_without_images() {
        let input = tempfile::tempdir().unwrap();
        let encoder = HalfEncoder { calls: RefCell::new(Vec::new()) };
        let session =
            BenchSession::with_encoder(config(input.path(), input.path(), true), encoder);
        let err = session.run(|_| {}).unwrap_err();
        assert!(matches!(err, Error::NoImages { .. }));
        assert!(session.encoder().calls.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_external_session_scenario() {
        use crate::testutil::{fake_encoder, write_input};

        let input = tempfile::tempdir().unwrap();
        let artifacts = tempfile::tempdir().unwrap();
        write_input(input.path(), "photo.png", b"IMG", 1000);
        write_input(input.path(), "broken.jpg", b"FAIL", 500);
        write_input(input.path(), "skip.png", b"SKIP", 800);

        let config = BenchConfig::builder()
            .input_dir(input.path())
            .encoder_path(fake_encoder())
            .report_path(input.path().join("out.csv"))
            .artifact_dir(artifacts.path())
            .build()
            .unwrap();
        let session = BenchSession::external(config).unwrap();
        let run = session.run(|_| {}).unwrap();

        let broken = &run.metrics[0];
        assert_eq!(broken.name, "broken.jpg");
        assert_eq!(broken.status, FileStatus::Error);
        assert!(broken.error_message.is_some());

        let photo = &run.metrics[1];
        assert_eq!(photo.status, FileStatus::Ok);
        assert_eq!(photo.original_bytes, 1000);
        assert_eq!(photo.final_bytes, Some(400));
        assert_eq!(photo.savings_bytes, Some(600));
        assert_eq!(photo.savings_pct, Some(60.0));
        assert_eq!(photo.passes, Some(3));

        let skipped = &run.metrics[2];
        assert_eq!(skipped.name, "skip.png");
        assert_eq!(skipped.status, FileStatus::NoOutput);
        assert_eq!(skipped.final_bytes, None);
        assert_eq!(skipped.error_message, None);

        let report = session.report(&run);
        assert_eq!(report.encoder, "fake-encoder.sh");
        assert_eq!(report.statistics.counts.error, 1);
        assert_eq!(report.statistics.counts.no_output, 1);
        assert_eq!(report.statistics.counts.ok, 1);
        assert!(artifacts.path().is_dir());
    }
}

//! Encoder invocation.
//!
//! An [`Encoder`] turns one input image into one output file and reports how
//! it went as an [`EncodeOutcome`]. The harness only ever talks to the trait,
//! so the process-backed [`ExternalEncoder`] can be swapped for another
//! implementation without touching metric building or aggregation.
//!
//! - [`ExternalEncoder`]: runs an encoder executable as a subprocess
//! - [`parse_passes`]: pulls the pass count out of diagnostic text

mod diagnostic;
mod external;

use std::path::Path;
use std::time::Duration;

pub use diagnostic::parse_passes;
pub use external::ExternalEncoder;

/// Result of a single encode attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeOutcome {
    /// The encoder exited successfully.
    ///
    /// An output file is not guaranteed; the caller checks for it.
    Ok {
        /// Wall-clock time spent in the invocation.
        elapsed: Duration,
        /// Diagnostic text captured from the encoder.
        diagnostic_text: String,
    },

    /// The encoder could not be launched or exited unsuccessfully.
    Failed {
        /// What went wrong.
        error_detail: String,
        /// Diagnostic text produced before the failure, possibly empty.
        diagnostic_text: String,
    },
}

impl EncodeOutcome {
    /// Whether the invocation succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Elapsed time in milliseconds, for successful invocations.
    #[must_use]
    pub fn elapsed_ms(&self) -> Option<f64> {
        match self {
            Self::Ok { elapsed, .. } => Some(elapsed.as_secs_f64() * 1000.0),
            Self::Failed { .. } => None,
        }
    }

    /// Captured diagnostic text.
    #[must_use]
    pub fn diagnostic_text(&self) -> &str {
        match self {
            Self::Ok { diagnostic_text, .. } | Self::Failed { diagnostic_text, .. } => {
                diagnostic_text.as_str()
            }
        }
    }
}

/// Something that can encode one image file into another.
pub trait Encoder {
    /// Short identifier used in logs and reports.
    fn id(&self) -> &str;

    /// Encode `input` into `output`.
    ///
    /// Exactly one attempt is made. Implementations must not panic on
    /// encoder failure; failures are returned as [`EncodeOutcome::Failed`].
    fn encode(&self, input: &Path, output: &Path) -> EncodeOutcome;
}

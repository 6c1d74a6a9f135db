//! Input image discovery.
//!
//! A [`Corpus`] is the ordered list of candidate images found in a single
//! directory. Order is lexicographic by path so repeated runs over the same
//! directory process files in the same sequence.
//!
//! ## Example
//!
//! ```rust,ignore
//! use encode_bench::corpus::Corpus;
//!
//! let corpus = Corpus::discover("./test_images")?;
//! for image in &corpus.images {
//!     println!("{}", image.name());
//! }
//! ```

mod discovery;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use discovery::{SUPPORTED_EXTENSIONS, discover_images, is_candidate};

use crate::error::Result;

/// Candidate images from one input directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// Directory that was scanned.
    pub root_path: PathBuf,

    /// Images in processing order.
    pub images: Vec<CorpusImage>,
}

/// An image in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusImage {
    /// Full path to the image.
    pub path: PathBuf,
}

impl CorpusImage {
    /// Create an entry for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the image name (filename without directory).
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Current size of the file on disk.
    pub fn file_size(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

impl Corpus {
    /// Discover candidate images in a directory.
    ///
    /// Fails if the directory is missing or contains no PNG/JPEG files.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref();
        let images = discover_images(root)?
            .into_iter()
            .map(CorpusImage::new)
            .collect();
        Ok(Self {
            root_path: root.to_path_buf(),
            images,
        })
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the corpus is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

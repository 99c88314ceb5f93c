//! Error types for the pdfscrub library.
//!
//! Three error types reflect three failure scopes:
//!
//! * [`ScrubError`] — **Fatal**: the batch cannot proceed at all (job
//!   directory already exists, output collision under the `Error` policy,
//!   unreadable input tree). Returned as `Err(ScrubError)` from
//!   [`crate::job::run_job`].
//!
//! * [`ExtractError`] — **Per document**: one PDF could not be read. The
//!   document is skipped and reported to the diagnostic sink; the batch
//!   moves on to the next file.
//!
//! * [`PageError`] — **Per page**: both extraction modes failed for a single
//!   page. The page contributes no text and the document continues.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// All fatal errors returned by the pdfscrub library.
#[derive(Debug, Error)]
pub enum ScrubError {
    // ── Job directory errors ──────────────────────────────────────────────
    /// The output directory for this job id is already present.
    #[error("output job directory '{path}' already exists.\nPick a fresh --job-id or remove the directory.")]
    JobDirectoryExists { path: PathBuf },

    /// A target output file already exists and the overwrite policy is `Error`.
    #[error("overwriting existing data at '{path}'\nTwo inputs map to the same output name; see --overwrite and --mirror.")]
    OutputCollision { path: PathBuf },

    // ── Input errors ──────────────────────────────────────────────────────
    /// The input root does not exist or is not a directory.
    #[error("input directory not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// A directory in the input tree could not be listed.
    #[error("failed to read directory '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the job directory (or a mirrored subdirectory).
    #[error("failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write an output text file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide so the dynamic loader can find it.\n"
    )]
    PdfiumBindingFailed(String),
}

/// A non-fatal error for a whole document.
///
/// The document produces no output file; the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ExtractError {
    /// The PDF structure could not be parsed at all.
    #[error("bad pdf syntax in '{path}'. skipping entire file: {detail}")]
    Malformed { path: PathBuf, detail: String },

    /// Any other failure while reading the document (I/O, password,
    /// a panic inside the backend, ...).
    #[error("other failure while processing '{path}', skipping: {detail}")]
    Other { path: PathBuf, detail: String },
}

impl ExtractError {
    /// Path of the document that failed.
    pub fn path(&self) -> &Path {
        match self {
            ExtractError::Malformed { path, .. } | ExtractError::Other { path, .. } => path,
        }
    }
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Layout mode failed, then plain mode failed too.
    #[error("bad page {page}: layout mode failed ({layout}); plain mode failed ({plain})")]
    BothModesFailed {
        page: usize,
        layout: String,
        plain: String,
    },
}

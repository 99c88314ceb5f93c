//! # pdfscrub
//!
//! Turn a directory of threat-intelligence PDF reports into plain-text files
//! suitable for language-model input.
//!
//! ## Why this crate?
//!
//! Vendor reports are prose mixed with malware listings, hex dumps and long
//! lists of URLs. Fed to a language model as-is, those fragments drown the
//! narrative. This crate extracts each report's text, drops regions that
//! look like source code, collapses whitespace and removes URLs and
//! indicator paths, writing one `.txt` per report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Discover  recursive walk for *.pdf under the input root
//!  ├─ 2. Extract   pdfium, layout mode per page, plain mode on failure
//!  ├─ 3. Code      line-based classifier drops code-like regions
//!  ├─ 4. Squash    every whitespace run of 2+ chars becomes one space
//!  ├─ 5. Redact    URLs, hxxp URLs, /wp-content/ paths, token.com/ paths
//!  └─ 6. Output    <output_root>/<job_id>/<name>.txt, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfscrub::{run_job, JobConfig, PdfiumBackend, TracingSink};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // INPUT_PATH / OUTPUT_PATH, defaulting to /tireports and /results
//!     let config = JobConfig::from_env();
//!     let backend = PdfiumBackend::bind()?;
//!     let report = run_job(&pdfscrub::new_job_id(), &config, &backend, &TracingSink)?;
//!     eprintln!("{} written, {} failed", report.written.len(), report.failed.len());
//!     Ok(())
//! }
//! ```
//!
//! Sanitizing text that is already extracted needs no pdfium at all:
//!
//! ```rust
//! let clean = pdfscrub::sanitize_text("see   http://evil.example/payload now");
//! assert_eq!(clean, "see  now");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfscrub` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfscrub = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod job;
pub mod output;
pub mod pipeline;
pub mod sanitize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{JobConfig, JobConfigBuilder, OutputLayout, OverwritePolicy, SignatureMatching};
pub use diagnostics::{ConsoleSink, DiagnosticSink, NoopSink, SharedSink, TracingSink};
pub use error::{ExtractError, PageError, ScrubError};
pub use job::{new_job_id, run_job};
pub use output::{
    DocumentRecord, ExtractedDocument, ExtractionMode, JobReport, PageOutcome, SanitizedText,
    SkippedDocument,
};
pub use pipeline::code_blocks::{remove_code_blocks, CodeBlockRemover, LanguageFamily};
pub use pipeline::extract::{extract_document, page_texts, PdfBackend, PdfPages};
pub use pipeline::pdfium::{bind_pdfium, PdfiumBackend};
pub use pipeline::redact::redact_indicators;
pub use pipeline::whitespace::normalize_whitespace;
pub use sanitize::{sanitize_text, Sanitizer};

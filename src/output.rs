//! Result types produced by extraction and by a job run.

use crate::error::{ExtractError, PageError};
use crate::pipeline::code_blocks::RemovalStats;
use crate::pipeline::redact::RedactionReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which extraction mode produced a page's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMode {
    /// Column/whitespace positions preserved.
    Layout,
    /// Text layer as-is, used after layout mode failed.
    Plain,
}

/// Outcome of extracting one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Extracted {
        /// 1-indexed page number.
        page: usize,
        mode: ExtractionMode,
        text: String,
    },
    Failed(PageError),
}

/// All text extracted from one document, plus per-page bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub path: PathBuf,
    /// Page texts concatenated in page order, no separators added.
    pub text: String,
    pub page_count: usize,
    pub layout_pages: usize,
    pub plain_pages: usize,
    pub failed_pages: Vec<PageError>,
}

/// Output of the sanitization pipeline for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedText {
    pub text: String,
    pub code: RemovalStats,
    pub redactions: RedactionReport,
}

/// A document that produced an output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub input: PathBuf,
    pub output: PathBuf,
    pub pages: usize,
    pub failed_pages: usize,
    pub code_lines_dropped: usize,
    pub redactions: usize,
    pub chars: usize,
}

/// A document whose text was discarded because its output name was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub input: PathBuf,
    pub output: PathBuf,
    pub reason: String,
}

/// Summary of a finished job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: String,
    pub output_dir: PathBuf,
    pub written: Vec<DocumentRecord>,
    pub failed: Vec<ExtractError>,
    pub skipped: Vec<SkippedDocument>,
    pub duration_ms: u64,
}

impl JobReport {
    /// Documents found in the input tree.
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len() + self.skipped.len()
    }
}

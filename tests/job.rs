//! Integration tests for the batch job runner.
//!
//! These tests never touch pdfium. A fake backend treats each `.pdf` file
//! as UTF-8 text:
//!
//! * `MALFORMED`          → the document fails to parse
//! * `PANIC`              → the backend panics while opening
//! * otherwise pages are separated by form feeds (`\x0c`); a page starting
//!   with `#nolayout ` fails layout mode, `#broken` fails both modes.

use pdfscrub::{
    run_job, DiagnosticSink, ExtractError, JobConfig, JobReport, OutputLayout, OverwritePolicy,
    PageError, PdfBackend, PdfPages, ScrubError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// ── Fake backend ─────────────────────────────────────────────────────────────

struct TextPdf {
    pages: Vec<String>,
}

impl PdfPages for TextPdf {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn layout_text(&self, index: usize) -> Result<String, String> {
        let page = &self.pages[index];
        if page.starts_with("#nolayout ") || page.starts_with("#broken") {
            return Err("no positioned glyphs".into());
        }
        Ok(page.clone())
    }

    fn plain_text(&self, index: usize) -> Result<String, String> {
        let page = &self.pages[index];
        if page.starts_with("#broken") {
            return Err("text layer unreadable".into());
        }
        Ok(page.trim_start_matches("#nolayout ").to_string())
    }
}

struct TextBackend;

impl PdfBackend for TextBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfPages + 'a>, ExtractError> {
        let raw = fs::read_to_string(path).map_err(|e| ExtractError::Other {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        match raw.as_str() {
            "MALFORMED" => Err(ExtractError::Malformed {
                path: path.to_path_buf(),
                detail: "FormatError".into(),
            }),
            "PANIC" => panic!("fake backend blew up"),
            _ => Ok(Box::new(TextPdf {
                pages: raw.split('\x0c').map(str::to_string).collect(),
            })),
        }
    }
}

// ── Recording sink ───────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl DiagnosticSink for Recorder {
    fn on_job_start(&self, _job_id: &str, total_documents: usize) {
        self.events.lock().unwrap().push(format!("start {total_documents}"));
    }

    fn on_page_failed(&self, path: &Path, error: &PageError) {
        let PageError::BothModesFailed { page, .. } = error;
        self.events
            .lock()
            .unwrap()
            .push(format!("page {} {page}", name(path)));
    }

    fn on_document_failed(&self, error: &ExtractError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("failed {}", name(error.path())));
    }

    fn on_document_skipped(&self, path: &Path, _output: &Path, _reason: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("skipped {}", name(path)));
    }

    fn on_document_written(&self, path: &Path, _output: &Path, _chars: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("written {}", name(path)));
    }

    fn on_job_complete(&self, report: &JobReport) {
        self.events
            .lock()
            .unwrap()
            .push(format!("complete {}", report.total()));
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        Self {
            _dir: dir,
            input,
            output,
        }
    }

    fn add(&self, rel: &str, contents: &str) {
        let path = self.input.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(&self, overwrite: OverwritePolicy, layout: OutputLayout) -> JobConfig {
        JobConfig::builder()
            .input_root(&self.input)
            .output_root(&self.output)
            .overwrite(overwrite)
            .layout(layout)
            .build()
            .unwrap()
    }

    fn default_config(&self) -> JobConfig {
        self.config(OverwritePolicy::Error, OutputLayout::Flatten)
    }

    fn read(&self, job: &str, rel: &str) -> String {
        fs::read_to_string(self.output.join(job).join(rel)).unwrap()
    }

    fn listing(&self, job: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.output.join(job))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_flattened_outputs_are_sanitized() {
    let fx = Fixture::new();
    fx.add(
        "vendor/apt.pdf",
        "The group   targets\n\nenergy firms.\x0cC2 at http://evil.example/gate now.",
    );
    fx.add("loader.pdf", "Loader stage:\n1 import os\n2 os.system(cmd)\n\n\nDone.");
    fx.add("notes.txt", "not a pdf");
    fx.add("SHOUTY.PDF", "ignored, suffix is case-sensitive");

    let report = run_job("job1", &fx.default_config(), &TextBackend, &Recorder::default()).unwrap();

    assert_eq!(report.written.len(), 2);
    assert!(report.failed.is_empty());
    assert_eq!(fx.listing("job1"), vec!["apt.txt", "loader.txt"]);
    assert_eq!(
        fx.read("job1", "apt.txt"),
        "The group targets energy firms.C2 at  now."
    );
    assert_eq!(fx.read("job1", "loader.txt"), "Loader stage: Done.");
}

#[test]
fn test_existing_job_directory_writes_nothing() {
    let fx = Fixture::new();
    fx.add("a.pdf", "text");
    fs::create_dir_all(fx.output.join("taken")).unwrap();

    let err = run_job("taken", &fx.default_config(), &TextBackend, &Recorder::default())
        .unwrap_err();

    assert!(matches!(err, ScrubError::JobDirectoryExists { .. }));
    assert!(fx.listing("taken").is_empty());
}

#[test]
fn test_missing_input_root_creates_no_job_directory() {
    let fx = Fixture::new();
    let config = JobConfig::builder()
        .input_root(fx.input.join("absent"))
        .output_root(&fx.output)
        .build()
        .unwrap();

    let err = run_job("j", &config, &TextBackend, &Recorder::default()).unwrap_err();
    assert!(matches!(err, ScrubError::InputNotFound { .. }));
    assert!(!fx.output.join("j").exists());
}

#[test]
fn test_duplicate_basename_errors_by_default() {
    let fx = Fixture::new();
    fx.add("a/report.pdf", "first");
    fx.add("b/report.pdf", "second");

    let err = run_job("dup", &fx.default_config(), &TextBackend, &Recorder::default())
        .unwrap_err();

    match err {
        ScrubError::OutputCollision { path } => assert!(path.ends_with("dup/report.txt")),
        other => panic!("expected OutputCollision, got {other:?}"),
    }
    assert_eq!(fx.read("dup", "report.txt"), "first");
}

#[test]
fn test_duplicate_basename_skip_keeps_first() {
    let fx = Fixture::new();
    fx.add("a/report.pdf", "first");
    fx.add("b/report.pdf", "second");
    let sink = Recorder::default();

    let config = fx.config(OverwritePolicy::Skip, OutputLayout::Flatten);
    let report = run_job("dup", &config, &TextBackend, &sink).unwrap();

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].input.ends_with("b/report.pdf"));
    assert_eq!(fx.read("dup", "report.txt"), "first");
    assert!(sink.events().contains(&"skipped report.pdf".to_string()));
}

#[test]
fn test_duplicate_basename_overwrite_keeps_last() {
    let fx = Fixture::new();
    fx.add("a/report.pdf", "first");
    fx.add("b/report.pdf", "second");

    let config = fx.config(OverwritePolicy::Overwrite, OutputLayout::Flatten);
    let report = run_job("dup", &config, &TextBackend, &Recorder::default()).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(fx.read("dup", "report.txt"), "second");
    assert_eq!(fx.listing("dup"), vec!["report.txt"]);
}

#[test]
fn test_mirror_layout_avoids_collisions() {
    let fx = Fixture::new();
    fx.add("a/report.pdf", "first");
    fx.add("b/report.pdf", "second");

    let config = fx.config(OverwritePolicy::Error, OutputLayout::Mirror);
    let report = run_job("m", &config, &TextBackend, &Recorder::default()).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(fx.read("m", "a/report.txt"), "first");
    assert_eq!(fx.read("m", "b/report.txt"), "second");
}

#[test]
fn test_bad_documents_are_skipped_and_batch_continues() {
    let fx = Fixture::new();
    fx.add("1-good.pdf", "fine");
    fx.add("2-malformed.pdf", "MALFORMED");
    fx.add("3-panics.pdf", "PANIC");
    fx.add("4-good.pdf", "also fine");
    let sink = Recorder::default();

    let report = run_job("bad", &fx.default_config(), &TextBackend, &sink).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failed.len(), 2);
    assert!(matches!(report.failed[0], ExtractError::Malformed { .. }));
    assert!(matches!(report.failed[1], ExtractError::Other { .. }));
    assert_eq!(fx.listing("bad"), vec!["1-good.txt", "4-good.txt"]);
    assert_eq!(
        sink.events(),
        vec![
            "start 4",
            "written 1-good.pdf",
            "failed 2-malformed.pdf",
            "failed 3-panics.pdf",
            "written 4-good.pdf",
            "complete 4",
        ]
    );
}

#[test]
fn test_page_fallback_and_page_failures() {
    let fx = Fixture::new();
    fx.add(
        "pages.pdf",
        "one \x0c#nolayout two \x0c#broken three\x0cfour",
    );
    let sink = Recorder::default();

    let report = run_job("p", &fx.default_config(), &TextBackend, &sink).unwrap();

    assert_eq!(fx.read("p", "pages.txt"), "one two four");
    let record = &report.written[0];
    assert_eq!(record.pages, 4);
    assert_eq!(record.failed_pages, 1);
    assert!(sink.events().contains(&"page pages.pdf 3".to_string()));
}

#[test]
fn test_empty_input_tree_creates_empty_job_directory() {
    let fx = Fixture::new();
    let report = run_job("empty", &fx.default_config(), &TextBackend, &Recorder::default()).unwrap();
    assert_eq!(report.total(), 0);
    assert!(fx.listing("empty").is_empty());
}

#[test]
fn test_report_serializes_to_json() {
    let fx = Fixture::new();
    fx.add("x.pdf", "see hxxp://bad.tld/x");
    let report = run_job("json", &fx.default_config(), &TextBackend, &Recorder::default()).unwrap();

    let value: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["job_id"], "json");
    assert_eq!(value["written"][0]["redactions"], 1);
    assert_eq!(fx.read("json", "x.txt"), "see  ");
}

#[test]
fn test_invalid_job_id_rejected() {
    let fx = Fixture::new();
    let err = run_job("../escape", &fx.default_config(), &TextBackend, &Recorder::default())
        .unwrap_err();
    assert!(matches!(err, ScrubError::InvalidConfig(_)));
}

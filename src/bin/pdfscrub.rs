//! CLI binary for pdfscrub.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to a `JobConfig`, runs one job and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfscrub::{
    new_job_id, run_job, ConsoleSink, DiagnosticSink, ExtractError, JobConfig, JobReport,
    OutputLayout, OverwritePolicy, PageError, PdfiumBackend, Sanitizer, SharedSink,
    SignatureMatching, TracingSink,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress sink using indicatif ────────────────────────────────────────

/// Terminal sink: one progress bar over documents plus a log line per
/// document. Every event is forwarded to `inner` as well.
struct ProgressSink {
    bar: ProgressBar,
    inner: SharedSink,
    page_failures: AtomicUsize,
}

impl ProgressSink {
    fn new(inner: SharedSink) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Scanning");
        bar.set_message("looking for PDFs…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            inner,
            page_failures: AtomicUsize::new(0),
        })
    }

    /// Stop the spinner without a summary line.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

impl DiagnosticSink for ProgressSink {
    fn on_job_start(&self, job_id: &str, total_documents: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} PDFs  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_length(total_documents as u64);
        self.bar.set_prefix("Scrubbing");
        self.bar
            .println(format!("◆ {}", bold(&format!("Job {job_id}: {total_documents} PDFs"))));
        self.inner.on_job_start(job_id, total_documents);
    }

    fn on_document_start(&self, path: &Path, index: usize, total: usize) {
        self.bar.set_message(Self::file_name(path));
        self.inner.on_document_start(path, index, total);
    }

    fn on_page_failed(&self, path: &Path, error: &PageError) {
        self.page_failures.fetch_add(1, Ordering::SeqCst);
        self.inner.on_page_failed(path, error);
    }

    fn on_document_failed(&self, error: &ExtractError) {
        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            Self::file_name(error.path()),
            red(&error.to_string()),
        ));
        self.bar.inc(1);
        self.inner.on_document_failed(error);
    }

    fn on_document_skipped(&self, path: &Path, output: &Path, reason: &str) {
        self.bar.println(format!(
            "  {} {}  {}",
            yellow("⚠"),
            Self::file_name(path),
            dim(&format!("{reason}: {}", output.display())),
        ));
        self.bar.inc(1);
        self.inner.on_document_skipped(path, output, reason);
    }

    fn on_document_written(&self, path: &Path, output: &Path, chars: usize) {
        self.bar.println(format!(
            "  {} {:<40}  {}",
            green("✓"),
            Self::file_name(path),
            dim(&format!("{chars:>7} chars")),
        ));
        self.bar.inc(1);
        self.inner.on_document_written(path, output, chars);
    }

    fn on_job_complete(&self, report: &JobReport) {
        self.bar.finish_and_clear();
        let pages = self.page_failures.load(Ordering::SeqCst);
        let mark = if report.failed.is_empty() && report.skipped.is_empty() && pages == 0 {
            green("✔")
        } else {
            yellow("⚠")
        };
        eprintln!(
            "{mark} {}/{} PDFs written  ({} failed, {} skipped, {} bad pages)  {}ms",
            bold(&report.written.len().to_string()),
            report.total(),
            report.failed.len(),
            report.skipped.len(),
            pages,
            report.duration_ms,
        );
        self.inner.on_job_complete(report);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scrub every PDF under /tireports into /results/<uuid>/
  pdfscrub

  # Explicit roots and job id
  pdfscrub --input ./reports --output ./out --job-id 2024-q1

  # Keep the first of two same-named reports instead of aborting
  pdfscrub --overwrite skip

  # Mirror input subdirectories instead of flattening
  pdfscrub --mirror

  # Sanitize an already-extracted text file to stdout (no pdfium needed)
  pdfscrub --text report.txt

  # Machine-readable job report
  pdfscrub --json > report.json

ENVIRONMENT VARIABLES:
  INPUT_PATH         Input root (default /tireports)
  OUTPUT_PATH        Output root (default /results)
  PDFIUM_LIB_PATH    Path to an existing libpdfium
  RUST_LOG           Log filter, overrides -v / -q
"#;

/// Extract and sanitize text from a directory of PDF reports.
#[derive(Parser, Debug)]
#[command(
    name = "pdfscrub",
    version,
    about = "Extract and sanitize text from a directory of PDF reports",
    long_about = "Walk an input directory for *.pdf files, extract each report's text with pdfium, \
drop code-like regions, collapse whitespace and remove URLs and indicator paths. Each report \
becomes <output>/<job-id>/<name>.txt.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Job id; names the output subdirectory. Default: a fresh UUID.
    #[arg(long, env = "PDFSCRUB_JOB_ID")]
    job_id: Option<String>,

    /// Directory tree scanned for PDFs.
    #[arg(short, long, env = "INPUT_PATH", default_value = pdfscrub::config::DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Root under which the job directory is created.
    #[arg(short, long, env = "OUTPUT_PATH", default_value = pdfscrub::config::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// What to do when an output file already exists.
    #[arg(long, env = "PDFSCRUB_OVERWRITE", value_enum, default_value = "error")]
    overwrite: OverwriteArg,

    /// Mirror input subdirectories in the job directory.
    #[arg(long, env = "PDFSCRUB_MIRROR")]
    mirror: bool,

    /// Match code signatures case-insensitively.
    #[arg(long, env = "PDFSCRUB_CASE_INSENSITIVE")]
    case_insensitive: bool,

    /// Where document and page failures are reported.
    #[arg(long, env = "PDFSCRUB_SINK", value_enum, default_value = "log")]
    sink: SinkArg,

    /// Sanitize this text file to stdout instead of running a job.
    #[arg(long, value_name = "FILE")]
    text: Option<PathBuf>,

    /// Print the job report (or sanitized text report) as JSON on stdout.
    #[arg(long, env = "PDFSCRUB_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSCRUB_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSCRUB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSCRUB_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OverwriteArg {
    Error,
    Skip,
    Overwrite,
}

impl From<OverwriteArg> for OverwritePolicy {
    fn from(v: OverwriteArg) -> Self {
        match v {
            OverwriteArg::Error => OverwritePolicy::Error,
            OverwriteArg::Skip => OverwritePolicy::Skip,
            OverwriteArg::Overwrite => OverwritePolicy::Overwrite,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SinkArg {
    /// Report through the tracing log.
    Log,
    /// Print plain lines to stderr.
    Console,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs unless -v is given.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.text.is_none();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let matching = if cli.case_insensitive {
        SignatureMatching::CaseInsensitive
    } else {
        SignatureMatching::CaseSensitive
    };

    // ── Text-only mode ───────────────────────────────────────────────────
    if let Some(ref path) = cli.text {
        return sanitize_file(path, matching, cli.json);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = JobConfig::builder()
        .input_root(&cli.input)
        .output_root(&cli.output)
        .overwrite(cli.overwrite.into())
        .layout(if cli.mirror {
            OutputLayout::Mirror
        } else {
            OutputLayout::Flatten
        })
        .signatures(matching)
        .build()
        .context("Invalid configuration")?;

    let job_id = cli.job_id.clone().unwrap_or_else(new_job_id);

    let inner: SharedSink = match cli.sink {
        SinkArg::Log => Arc::new(TracingSink),
        SinkArg::Console => Arc::new(ConsoleSink),
    };
    let progress = show_progress.then(|| ProgressSink::new(inner.clone()));
    let sink: SharedSink = match &progress {
        Some(p) => p.clone() as SharedSink,
        None => inner,
    };

    // ── Run job ──────────────────────────────────────────────────────────
    let result = PdfiumBackend::bind()
        .context("Failed to load the PDF engine")
        .and_then(|backend| {
            run_job(&job_id, &config, &backend, sink.as_ref())
                .with_context(|| format!("Job {job_id} failed"))
        });
    // A fatal error skips on_job_complete; clear the bar before anyhow prints.
    if let (Err(_), Some(p)) = (&result, &progress) {
        p.abandon();
    }
    let report = result?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        eprintln!(
            "Job {}: {}/{} PDFs written to {} in {}ms",
            report.job_id,
            report.written.len(),
            report.total(),
            report.output_dir.display(),
            report.duration_ms
        );
        if !report.failed.is_empty() {
            eprintln!("  {} PDFs failed", report.failed.len());
        }
        if !report.skipped.is_empty() {
            eprintln!("  {} PDFs skipped", report.skipped.len());
        }
    }

    Ok(())
}

/// `--text`: sanitize one text file to stdout.
fn sanitize_file(path: &Path, matching: SignatureMatching, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let sanitized = Sanitizer::new(matching).sanitize_with_report(&raw);

    if json {
        let json =
            serde_json::to_string_pretty(&sanitized).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(sanitized.text.as_bytes())
            .context("Failed to write to stdout")?;
        if !sanitized.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }
    Ok(())
}

//! Configuration types for a sanitization job.
//!
//! All job behaviour is controlled through [`JobConfig`], built via its
//! [`JobConfigBuilder`] or read from the environment with
//! [`JobConfig::from_env`]. The pattern catalogues themselves are not
//! configurable; they are static tables shared by every document.

use crate::error::ScrubError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the directory tree scanned for PDFs.
pub const INPUT_PATH_ENV: &str = "INPUT_PATH";

/// Environment variable naming the root under which job directories are created.
pub const OUTPUT_PATH_ENV: &str = "OUTPUT_PATH";

/// Input root used when [`INPUT_PATH_ENV`] is unset.
pub const DEFAULT_INPUT_PATH: &str = "/tireports";

/// Output root used when [`OUTPUT_PATH_ENV`] is unset.
pub const DEFAULT_OUTPUT_PATH: &str = "/results";

/// Configuration for one batch job.
///
/// # Example
/// ```rust
/// use pdfscrub::{JobConfig, OverwritePolicy};
///
/// let config = JobConfig::builder()
///     .input_root("/data/reports")
///     .output_root("/data/out")
///     .overwrite(OverwritePolicy::Skip)
///     .build()
///     .unwrap();
/// assert_eq!(config.overwrite, OverwritePolicy::Skip);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Directory tree scanned recursively for `*.pdf` files. Default: `/tireports`.
    pub input_root: PathBuf,

    /// Root under which `<output_root>/<job_id>/` is created. Default: `/results`.
    pub output_root: PathBuf,

    /// What to do when two inputs map to the same output file. Default: [`OverwritePolicy::Error`].
    pub overwrite: OverwritePolicy,

    /// Whether output files land flat in the job directory or mirror the
    /// input subdirectories. Default: [`OutputLayout::Flatten`].
    pub layout: OutputLayout,

    /// Case handling for code signature matching. Default: case-sensitive.
    pub signatures: SignatureMatching,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from(DEFAULT_INPUT_PATH),
            output_root: PathBuf::from(DEFAULT_OUTPUT_PATH),
            overwrite: OverwritePolicy::default(),
            layout: OutputLayout::default(),
            signatures: SignatureMatching::default(),
        }
    }
}

impl JobConfig {
    /// Create a new builder for `JobConfig`.
    pub fn builder() -> JobConfigBuilder {
        JobConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read the input and output roots from `INPUT_PATH` / `OUTPUT_PATH`,
    /// falling back to `/tireports` and `/results`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`JobConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, fallback: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(fallback))
        };
        Self {
            input_root: pick(INPUT_PATH_ENV, DEFAULT_INPUT_PATH),
            output_root: pick(OUTPUT_PATH_ENV, DEFAULT_OUTPUT_PATH),
            ..Self::default()
        }
    }

    /// The directory this job writes into.
    pub fn job_dir(&self, job_id: &str) -> PathBuf {
        self.output_root.join(job_id)
    }
}

/// Builder for [`JobConfig`].
#[derive(Debug)]
pub struct JobConfigBuilder {
    config: JobConfig,
}

impl JobConfigBuilder {
    pub fn input_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_root = path.into();
        self
    }

    pub fn output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_root = path.into();
        self
    }

    pub fn overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.config.overwrite = policy;
        self
    }

    pub fn layout(mut self, layout: OutputLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn signatures(mut self, matching: SignatureMatching) -> Self {
        self.config.signatures = matching;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<JobConfig, ScrubError> {
        let c = &self.config;
        if c.input_root.as_os_str().is_empty() {
            return Err(ScrubError::InvalidConfig("input root must not be empty".into()));
        }
        if c.output_root.as_os_str().is_empty() {
            return Err(ScrubError::InvalidConfig("output root must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Policy when an output file already exists within the job directory.
///
/// With [`OutputLayout::Flatten`] this happens whenever two PDFs in
/// different input subdirectories share a base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverwritePolicy {
    /// Abort the whole batch with [`ScrubError::OutputCollision`]. (default)
    #[default]
    Error,
    /// Keep the existing file, report the later document as skipped.
    Skip,
    /// Replace the existing file with the later document's text.
    Overwrite,
}

/// How output paths are derived from input paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputLayout {
    /// Every output lands directly under the job directory. (default)
    #[default]
    Flatten,
    /// Outputs mirror the input subdirectory structure under the job directory.
    Mirror,
}

/// Case handling when testing lines against the code signature catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureMatching {
    /// `import os` matches, `Import duties rose` does not. (default)
    #[default]
    CaseSensitive,
    /// Keywords match in any case.
    CaseInsensitive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_roots() {
        let c = JobConfig::default();
        assert_eq!(c.input_root, PathBuf::from("/tireports"));
        assert_eq!(c.output_root, PathBuf::from("/results"));
        assert_eq!(c.overwrite, OverwritePolicy::Error);
        assert_eq!(c.layout, OutputLayout::Flatten);
    }

    #[test]
    fn from_lookup_uses_variables_when_set() {
        let vars: HashMap<&str, &str> =
            [("INPUT_PATH", "/in"), ("OUTPUT_PATH", "/out")].into_iter().collect();
        let c = JobConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.input_root, PathBuf::from("/in"));
        assert_eq!(c.output_root, PathBuf::from("/out"));
    }

    #[test]
    fn from_lookup_falls_back_when_unset_or_empty() {
        let c = JobConfig::from_lookup(|k| (k == "INPUT_PATH").then(String::new));
        assert_eq!(c.input_root, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(c.output_root, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn job_dir_joins_id() {
        let c = JobConfig::builder().output_root("/tmp/r").build().unwrap();
        assert_eq!(c.job_dir("job-1"), PathBuf::from("/tmp/r/job-1"));
    }

    #[test]
    fn empty_roots_rejected() {
        assert!(JobConfig::builder().input_root("").build().is_err());
        assert!(JobConfig::builder().output_root("").build().is_err());
    }
}

//! Whitespace normalisation.
//!
//! PDF layout extraction pads columns with runs of spaces and separates
//! blocks with stacks of blank lines. After code removal every run of two or
//! more whitespace characters collapses to a single space, which flattens the
//! remaining prose onto (mostly) one line. A lone newline between two
//! non-space characters is a run of one and survives.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Replace every maximal run of 2+ whitespace characters with one space.
pub fn normalize_whitespace(input: &str) -> String {
    RE_WHITESPACE_RUN.replace_all(input, " ").into_owned()
}

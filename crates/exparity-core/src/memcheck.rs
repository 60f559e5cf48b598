//! Memory checker report inspection
//!
//! The checker's report is only scanned for its success marker. Nothing else
//! in it is parsed.

use std::fmt;

/// Substring a clean valgrind report always contains
pub const SUCCESS_MARKER: &str = "ERROR SUMMARY: 0";

/// What a checker report says about the candidate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemcheckVerdict {
    /// Report carries the success marker
    Clean,
    /// Report lacks the success marker; holds the full report text
    Dirty(String),
}

impl MemcheckVerdict {
    pub fn is_clean(&self) -> bool {
        matches!(self, MemcheckVerdict::Clean)
    }
}

/// Whether a dirty report fails the case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemcheckPolicy {
    /// Log the report and keep the case's verdict
    #[default]
    Advisory,
    /// Fail the case
    Strict,
}

impl fmt::Display for MemcheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemcheckPolicy::Advisory => write!(f, "advisory"),
            MemcheckPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Classify a checker report
pub fn inspect_report(log: &str) -> MemcheckVerdict {
    if log.contains(SUCCESS_MARKER) {
        MemcheckVerdict::Clean
    } else {
        MemcheckVerdict::Dirty(log.to_string())
    }
}

/// Surface a verdict on the error channel.
///
/// Returns `true` when the verdict should fail the case under `policy`.
pub fn report(verdict: &MemcheckVerdict, policy: MemcheckPolicy) -> bool {
    match verdict {
        MemcheckVerdict::Clean => false,
        MemcheckVerdict::Dirty(log) => {
            tracing::warn!(%policy, "Valgrind failed:\n{log}");
            policy == MemcheckPolicy::Strict
        }
    }
}

//! Per-case comparison protocol
//!
//! Every case runs the candidate first (under the memory checker when
//! enabled), then the reference, then compares the two. Cases tagged
//! [`CaseKind::InvalidExtension`](crate::corpus::CaseKind::InvalidExtension)
//! skip the reference and check the candidate against the fixed error
//! contract instead.

use crate::config::HarnessConfig;
use crate::corpus::TestCase;
use crate::error::HarnessError;
use crate::memcheck::{self, MemcheckPolicy, MemcheckVerdict};
use crate::output::Output;
use crate::parity::{Mismatch, compare_outputs};
use crate::runner::{Invocation, ProcessRunner};
use std::fmt;
use thiserror::Error;

/// Where a case is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    Discovered,
    RunningCandidate,
    RunningReference,
    Compared,
    Passed,
    Failed,
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseState::Discovered => "discovered",
            CaseState::RunningCandidate => "running candidate",
            CaseState::RunningReference => "running reference",
            CaseState::Compared => "compared",
            CaseState::Passed => "passed",
            CaseState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why a case failed on behavior
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseFailure {
    /// Reference and candidate disagree
    #[error(transparent)]
    Mismatch(#[from] Mismatch),

    /// Candidate broke the contract for inputs with an unsupported extension
    #[error("{0}")]
    Contract(String),

    /// Checker report was dirty under the strict policy.
    ///
    /// Never raised for unsupported-extension cases; their reports are only
    /// logged.
    #[error("Memory checker reported errors:\n{0}")]
    Memcheck(String),
}

/// Outcome of a case that did not pass
#[derive(Error, Debug)]
pub enum CaseError {
    /// The environment is broken; the run must stop
    #[error(transparent)]
    Infrastructure(#[from] HarnessError),

    /// The candidate misbehaved on this case only
    #[error(transparent)]
    Failed(#[from] CaseFailure),
}

impl CaseError {
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, CaseError::Infrastructure(_))
    }
}

/// Details of a passed case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub candidate: Output,
    /// `None` when the reference did not take part
    pub reference: Option<Output>,
    /// `None` when memory checking was disabled
    pub memcheck: Option<MemcheckVerdict>,
}

/// Drives test cases through the runner and comparator
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    config: &'a HarnessConfig,
    runner: ProcessRunner<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self {
            config,
            runner: ProcessRunner::new(&config.memcheck),
        }
    }

    /// Run one case to a verdict.
    ///
    /// Only [`CaseError::Infrastructure`] should stop the surrounding run.
    pub fn run_case(&self, case: &TestCase) -> Result<CaseReport, CaseError> {
        let span = tracing::info_span!("case", name = %case.name());
        let _enter = span.enter();
        transition(CaseState::Discovered);

        let result = self.drive(case);
        match &result {
            Ok(_) => transition(CaseState::Passed),
            Err(_) => transition(CaseState::Failed),
        }
        result
    }

    fn drive(&self, case: &TestCase) -> Result<CaseReport, CaseError> {
        let wrapped = self.config.memcheck.enabled;

        transition(CaseState::RunningCandidate);
        let candidate = self.run_program(&self.config.candidate, case, wrapped)?;

        let reference = if case.kind.uses_reference() {
            transition(CaseState::RunningReference);
            let reference = self.run_program(&self.config.reference, case, false)?;
            compare_outputs(&reference, &candidate).map_err(CaseFailure::from)?;
            Some(reference)
        } else {
            self.check_invalid_extension(&candidate)?;
            None
        };
        transition(CaseState::Compared);

        let policy = if case.kind.uses_reference() {
            self.config.memcheck_policy()
        } else {
            MemcheckPolicy::Advisory
        };
        let verdict = wrapped.then(|| memcheck::inspect_report(candidate.checker_log()));
        if let Some(verdict) = &verdict {
            if memcheck::report(verdict, policy) {
                return Err(CaseFailure::Memcheck(candidate.checker_log().to_string()).into());
            }
        }

        Ok(CaseReport {
            candidate,
            reference,
            memcheck: verdict,
        })
    }

    fn run_program(
        &self,
        program: &std::path::Path,
        case: &TestCase,
        wrapped: bool,
    ) -> Result<Output, HarnessError> {
        let invocation = Invocation::new(program).arg(&case.path).memcheck(wrapped);
        self.runner.run(&invocation)
    }

    fn check_invalid_extension(&self, candidate: &Output) -> Result<(), CaseFailure> {
        let extension = &self.config.expected_extension;
        if candidate.stderr() != self.config.invalid_input_message.as_bytes() {
            return Err(CaseFailure::Contract(format!(
                "A non .{extension} file should result in {:?} error message, got {:?}",
                self.config.invalid_input_message,
                candidate.stderr_text()
            )));
        }
        if candidate.return_code() == 0 {
            return Err(CaseFailure::Contract(format!(
                "A non .{extension} file should result in a non-zero return code"
            )));
        }
        if !candidate.stdout().is_empty() {
            return Err(CaseFailure::Contract(format!(
                "Upon failure, nothing should be emitted to STDOUT, got {:?}",
                candidate.stdout_text()
            )));
        }
        Ok(())
    }
}

fn transition(state: CaseState) {
    tracing::debug!(%state, "case state");
}

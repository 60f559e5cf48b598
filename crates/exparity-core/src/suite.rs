//! Whole-corpus runs outside a test framework
//!
//! Cases run in parallel across rayon's pool; each case stays sequential
//! internally. Results come back in corpus order.

use crate::corpus::{CaseKind, Corpus, TestCase};
use crate::error::Result;
use crate::memcheck::MemcheckVerdict;
use crate::orchestrator::{CaseError, CaseFailure, CaseReport, Orchestrator};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Verdict for one case
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub kind: CaseKind,
    pub outcome: std::result::Result<CaseReport, CaseFailure>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Passed, but the checker report was dirty
    pub fn has_memcheck_warning(&self) -> bool {
        matches!(
            &self.outcome,
            Ok(CaseReport {
                memcheck: Some(MemcheckVerdict::Dirty(_)),
                ..
            })
        )
    }
}

/// Results of a whole-corpus run
#[derive(Debug, Clone)]
pub struct SuiteSummary {
    pub results: Vec<CaseResult>,
    pub duration: Duration,
}

impl SuiteSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn memcheck_warnings(&self) -> usize {
        self.results.iter().filter(|r| r.has_memcheck_warning()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CaseFailure)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|f| (r.name.as_str(), f)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Run every case in `corpus`.
///
/// Behavioral failures are collected; an infrastructure error aborts the run.
pub fn run_suite(orchestrator: &Orchestrator<'_>, corpus: &Corpus) -> Result<SuiteSummary> {
    let start = Instant::now();
    let cases: Vec<&TestCase> = corpus.cases().collect();

    let results = cases
        .par_iter()
        .map(|case| run_one(orchestrator, case))
        .collect::<Result<Vec<_>>>()?;

    let summary = SuiteSummary {
        results,
        duration: start.elapsed(),
    };
    tracing::info!(
        total = summary.total(),
        passed = summary.passed(),
        failed = summary.failed(),
        "suite finished"
    );
    Ok(summary)
}

fn run_one(orchestrator: &Orchestrator<'_>, case: &TestCase) -> Result<CaseResult> {
    let outcome = match orchestrator.run_case(case) {
        Ok(report) => Ok(report),
        Err(CaseError::Failed(failure)) => Err(failure),
        Err(CaseError::Infrastructure(e)) => return Err(e),
    };
    Ok(CaseResult {
        name: case.name(),
        kind: case.kind,
        outcome,
    })
}


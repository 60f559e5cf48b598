//! Per-case protocol against scripted programs
//!
//! Reference and candidate are small shell scripts, so these tests cover the
//! full spawn, capture and compare path without any real program under test.

#![cfg(unix)]

use anyhow::Result;
use exparity_core::{
    CaseError, CaseFailure, CaseKind, CaseReport, Corpus, Field, HarnessError, Mismatch,
    Orchestrator, TestCase,
};
use exparity_tests::{Sandbox, scripts};

fn expect_mismatch(result: std::result::Result<CaseReport, CaseError>) -> Mismatch {
    match result {
        Err(CaseError::Failed(CaseFailure::Mismatch(m))) => m,
        other => panic!("expected a mismatch, got {other:?}"),
    }
}

#[test]
fn test_valid_case_matches_reference() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    let input = sb.valid("sample.csv", "1,2\n3,4\n")?;
    let config = sb.config(&candidate, &reference);

    let report = Orchestrator::new(&config).run_case(&TestCase::new(input, CaseKind::Valid))?;

    assert_eq!(report.candidate.observable(), (0, &b"*,*\n*,*\n"[..], &b""[..]));
    assert_eq!(report.reference.as_ref(), Some(&report.candidate));
    assert_eq!(report.memcheck, None);
    Ok(())
}

#[test]
fn test_malformed_csv_compares_against_reference() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    let input = sb.invalid("malformed.csv", "1,bad\n")?;
    let config = sb.config(&candidate, &reference);

    let report = Orchestrator::new(&config).run_case(&TestCase::new(input, CaseKind::Invalid))?;

    assert_eq!(report.candidate.return_code(), 1);
    assert_eq!(report.candidate.stderr(), b"Invalid input\n");
    assert!(report.reference.is_some());
    Ok(())
}

#[test]
fn test_wrong_extension_skips_reference() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    sb.invalid("notes.txt", "1,2\n")?;
    let config = sb.config(&candidate, &reference);

    let corpus = Corpus::discover(&config)?;
    let case = &corpus.invalid_inputs()[0];
    assert_eq!(case.kind, CaseKind::InvalidExtension);

    // The reference would print a rendering and exit 0 here
    let report = Orchestrator::new(&config).run_case(case)?;
    assert_eq!(report.reference, None);
    assert_eq!(report.candidate.stdout(), b"");
    Ok(())
}

#[test]
fn test_wrong_extension_needs_invalid_input_message() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE_NO_EXTENSION_CHECK)?;
    let input = sb.invalid("notes.txt", "1,2\n")?;
    let config = sb.config(&candidate, &reference);

    let result =
        Orchestrator::new(&config).run_case(&TestCase::new(input, CaseKind::InvalidExtension));

    match result {
        Err(CaseError::Failed(CaseFailure::Contract(msg))) => {
            assert!(msg.starts_with("A non .csv file should result in"), "{msg}");
        }
        other => panic!("expected a contract failure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_extra_newline_is_stdout_mismatch() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE_TRAILING_NEWLINE)?;
    let input = sb.valid("sample.csv", "7\n")?;
    let config = sb.config(&candidate, &reference);

    let mismatch = expect_mismatch(
        Orchestrator::new(&config).run_case(&TestCase::new(input, CaseKind::Valid)),
    );
    assert_eq!(mismatch.field, Field::Stdout);
    assert_eq!(mismatch.reference, r#""*\n""#);
    assert_eq!(mismatch.candidate, r#""*\n\n""#);
    Ok(())
}

#[test]
fn test_exit_code_mismatch_reported_before_streams() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE_WRONG_EXIT)?;
    let input = sb.invalid("malformed.csv", "bad\n")?;
    let config = sb.config(&candidate, &reference);

    let mismatch = expect_mismatch(
        Orchestrator::new(&config).run_case(&TestCase::new(input, CaseKind::Invalid)),
    );
    assert_eq!(mismatch.field, Field::ReturnCode);
    assert_eq!((mismatch.reference.as_str(), mismatch.candidate.as_str()), ("1", "2"));
    Ok(())
}

#[test]
fn test_error_message_case_is_stderr_mismatch() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE_WRONG_MESSAGE)?;
    let input = sb.invalid("malformed.csv", "bad\n")?;
    let config = sb.config(&candidate, &reference);

    let mismatch = expect_mismatch(
        Orchestrator::new(&config).run_case(&TestCase::new(input, CaseKind::Invalid)),
    );
    assert_eq!(mismatch.field, Field::Stderr);
    Ok(())
}

#[test]
fn test_unspawnable_candidate_is_infrastructure_error() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let input = sb.valid("sample.csv", "1\n")?;
    let config = sb.config(&sb.path().join("bin/missing"), &reference);

    let err = Orchestrator::new(&config)
        .run_case(&TestCase::new(input, CaseKind::Valid))
        .unwrap_err();
    assert!(err.is_infrastructure());
    assert!(matches!(
        err,
        CaseError::Infrastructure(HarnessError::Spawn { .. })
    ));
    Ok(())
}

#[test]
fn test_rerun_is_identical() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    let input = sb.valid("sample.csv", "3,1,4\n1,5,9\n")?;
    let config = sb.config(&candidate, &reference);
    let case = TestCase::new(input, CaseKind::Valid);

    let orchestrator = Orchestrator::new(&config);
    let first = orchestrator.run_case(&case)?;
    let second = orchestrator.run_case(&case)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_one_failure_does_not_stop_the_rest() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE_TRAILING_NEWLINE)?;
    sb.valid("a.csv", "1\n")?;
    sb.invalid("b.csv", "bad\n")?;
    let config = sb.config(&candidate, &reference);

    let corpus = Corpus::discover(&config)?;
    let orchestrator = Orchestrator::new(&config);
    let verdicts: Vec<(String, bool)> = corpus
        .cases()
        .map(|case| (case.name(), orchestrator.run_case(case).is_ok()))
        .collect();

    assert_eq!(
        verdicts,
        [
            ("valid::a.csv".to_string(), false),
            ("invalid::b.csv".to_string(), true),
        ]
    );
    Ok(())
}

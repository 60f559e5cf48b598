//! Whole-corpus runs and configuration files

#![cfg(unix)]

use anyhow::Result;
use exparity_core::{
    CaseFailure, CaseKind, Corpus, HarnessConfig, HarnessError, Orchestrator, run_suite,
};
use exparity_tests::{Sandbox, scripts};

fn populate(sb: &Sandbox) -> Result<()> {
    sb.valid("mandelbrot.csv", "1,2,3\n")?;
    sb.valid("sierpinski.csv", "4\n5\n")?;
    sb.invalid("malformed.csv", "1,bad\n")?;
    sb.invalid("notes.txt", "1,2\n")?;
    Ok(())
}

#[test]
fn test_matching_candidate_passes_everything() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    populate(&sb)?;
    let config = sb.config(&candidate, &reference);
    config.preflight()?;

    let corpus = Corpus::discover(&config)?;
    let summary = run_suite(&Orchestrator::new(&config), &corpus)?;

    assert_eq!(summary.total(), 4);
    assert!(summary.is_success());
    assert_eq!(summary.memcheck_warnings(), 0);
    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "valid::mandelbrot.csv",
            "valid::sierpinski.csv",
            "invalid::malformed.csv",
            "invalid::notes.txt",
        ]
    );
    Ok(())
}

#[test]
fn test_failures_are_collected_per_case() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE_NO_EXTENSION_CHECK)?;
    populate(&sb)?;
    let config = sb.config(&candidate, &reference);

    let corpus = Corpus::discover(&config)?;
    let summary = run_suite(&Orchestrator::new(&config), &corpus)?;

    assert_eq!((summary.passed(), summary.failed()), (3, 1));
    let failures: Vec<_> = summary.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "invalid::notes.txt");
    assert!(matches!(failures[0].1, CaseFailure::Contract(_)));

    let kinds: Vec<CaseKind> = summary.results.iter().map(|r| r.kind).collect();
    assert_eq!(kinds[3], CaseKind::InvalidExtension);
    Ok(())
}

#[test]
fn test_leaky_candidate_counts_warnings() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    let checker = sb.script("checker", &scripts::checker_leaky())?;
    populate(&sb)?;
    let config = sb.config_with_checker(&candidate, &reference, &checker);

    let corpus = Corpus::discover(&config)?;
    let summary = run_suite(&Orchestrator::new(&config), &corpus)?;

    assert!(summary.is_success());
    assert_eq!(summary.memcheck_warnings(), 4);
    assert_eq!(sb.reports_left()?, 0);
    Ok(())
}

#[test]
fn test_infrastructure_error_aborts_suite() -> Result<()> {
    let sb = Sandbox::new()?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    populate(&sb)?;
    let config = sb.config(&candidate, &sb.path().join("bin/SchoolFractalDrawer"));

    assert!(matches!(
        config.preflight(),
        Err(HarnessError::MissingExecutable { role: "reference", .. })
    ));

    let corpus = Corpus::discover(&config)?;
    let result = run_suite(&Orchestrator::new(&config), &corpus);
    assert!(matches!(result, Err(HarnessError::Spawn { .. })));
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> Result<()> {
    let sb = Sandbox::new()?;
    let reference = sb.script("reference", scripts::REFERENCE)?;
    let candidate = sb.script("candidate", scripts::CANDIDATE)?;
    let mut config = sb.config(&candidate, &reference);
    config.invalid_input_message = "Bad file\n".into();

    let path = sb.write_config(&config)?;
    let loaded = HarnessConfig::from_file(&path)?;
    assert_eq!(loaded, config);

    let from_env = HarnessConfig::from_lookup(|key| {
        (key == exparity_core::config::vars::CONFIG).then(|| path.to_string_lossy().into_owned())
    })?;
    assert_eq!(from_env, config);
    Ok(())
}

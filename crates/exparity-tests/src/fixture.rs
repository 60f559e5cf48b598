//! Fixture corpus runner shared by the `fixture_parity` test target and the
//! `exparity-fixtures` binary
//!
//! One libtest-mimic trial per file in the valid and invalid corpus
//! directories. Configuration always comes from the `EXPARITY_*` environment
//! on top of the built-in defaults; there is no unconfigured mode. A missing
//! executable or corpus directory exits with [`INFRA_EXIT_CODE`] before any
//! trial runs, as does a program that cannot be spawned mid-run.

use exparity_core::{CaseError, Corpus, HarnessConfig, INFRA_EXIT_CODE, Orchestrator, TestCase};
use libtest_mimic::{Arguments, Failed, Trial};
use std::sync::Arc;

/// Parse libtest arguments from the command line, run the corpus and exit
pub fn main() -> ! {
    let args = Arguments::from_args();
    crate::init_tracing("info");

    let (config, corpus) = match setup() {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(INFRA_EXIT_CODE);
        }
    };
    if corpus.is_empty() {
        tracing::warn!("No cases collected");
    }

    let config = Arc::new(config);
    let trials = corpus
        .cases()
        .cloned()
        .map(|case| {
            let config = Arc::clone(&config);
            let name = case.name();
            let kind = case.kind.category();
            Trial::test(name, move || run_trial(&config, &case)).with_kind(kind)
        })
        .collect();

    libtest_mimic::run(&args, trials).exit()
}

fn setup() -> exparity_core::Result<(HarnessConfig, Corpus)> {
    let config = HarnessConfig::from_env()?;
    config.preflight()?;
    let corpus = Corpus::discover(&config)?;
    Ok((config, corpus))
}

fn run_trial(config: &HarnessConfig, case: &TestCase) -> Result<(), Failed> {
    match Orchestrator::new(config).run_case(case) {
        Ok(_) => Ok(()),
        Err(CaseError::Failed(failure)) => Err(failure.to_string().into()),
        Err(CaseError::Infrastructure(e)) => {
            eprintln!("error: {e}");
            std::process::exit(INFRA_EXIT_CODE);
        }
    }
}

//! exparity CLI entry point
//!
//! Runs a whole fixture corpus outside the test framework and prints a
//! summary. Exit codes: 0 all cases passed, 1 some case failed, 255 the
//! environment is broken (missing executable or directory, spawn failure).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exparity_core::{Corpus, HarnessConfig, INFRA_EXIT_CODE, Orchestrator, SuiteSummary, run_suite};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "exparity")]
#[command(about = "Compare a candidate executable against a reference over a fixture corpus")]
#[command(version)]
struct Cli {
    /// JSON configuration file (defaults to EXPARITY_* environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not wrap candidate runs with the memory checker
    #[arg(long, global = true)]
    no_memcheck: bool,

    /// Fail cases whose memory checker report is not clean
    #[arg(long, global = true, conflicts_with = "no_memcheck")]
    strict_memcheck: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered cases and the policy applied to each
    List,
    /// Run every case and print a summary
    Run {
        /// Worker threads (defaults to one per CPU)
        #[arg(long, short)]
        jobs: Option<usize>,
    },
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(INFRA_EXIT_CODE as u8)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => HarnessConfig::from_env().context("failed to load configuration")?,
    };
    if cli.no_memcheck {
        config.memcheck.enabled = false;
    }
    if cli.strict_memcheck {
        config.memcheck.strict = true;
    }

    match cli.command {
        Commands::List => {
            let corpus = Corpus::discover(&config)?;
            for case in corpus.cases() {
                let policy = if case.kind.uses_reference() {
                    "reference"
                } else {
                    "contract"
                };
                println!("{}\t{}", case.name(), policy);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { jobs } => {
            config.preflight()?;
            if let Some(jobs) = jobs {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build_global()
                    .context("failed to configure worker threads")?;
            }

            let corpus = Corpus::discover(&config)?;
            if corpus.is_empty() {
                eprintln!("No cases collected");
            }
            let summary = run_suite(&Orchestrator::new(&config), &corpus)?;
            print_summary(&summary);

            Ok(if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn print_summary(summary: &SuiteSummary) {
    for result in &summary.results {
        let status = if result.passed() { "PASSED" } else { "FAILED" };
        println!("{} ... {}", result.name, status);
    }

    for (name, failure) in summary.failures() {
        println!("\n---- {name} ----\n{failure}");
    }

    let mut parts = vec![format!("{} passed", summary.passed())];
    if summary.failed() > 0 {
        parts.push(format!("{} failed", summary.failed()));
    }
    if summary.memcheck_warnings() > 0 {
        parts.push(format!("{} memcheck warnings", summary.memcheck_warnings()));
    }
    println!(
        "\n====== {} in {:.2}s ======",
        parts.join(", "),
        summary.duration.as_secs_f64()
    );
}

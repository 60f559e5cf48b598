//! # exparity
//!
//! Differential parity harness for executables.
//!
//! Runs a candidate program and a trusted reference program on every file of
//! a fixture corpus and requires byte-identical exit code, stdout and stderr.
//! Candidate runs can be wrapped with a memory checker (valgrind by default)
//! whose report is screened for errors.
//!
//! ## Pipeline
//!
//! 1. [`HarnessConfig`]: executable paths, corpus directories, memcheck settings
//! 2. [`Corpus`]: fixture discovery and per-file [`CaseKind`] tagging
//! 3. [`ProcessRunner`]: spawning, capture, checker wrapping
//! 4. [`compare_outputs`]: reference vs candidate field comparison
//! 5. [`memcheck`]: checker report screening
//! 6. [`Orchestrator`]: the per-case protocol
//!
//! ## Quick Start
//!
//! ```no_run
//! use exparity_core::{Corpus, HarnessConfig, Orchestrator};
//!
//! let config = HarnessConfig::from_env()?;
//! config.preflight()?;
//! let corpus = Corpus::discover(&config)?;
//!
//! let orchestrator = Orchestrator::new(&config);
//! for case in corpus.cases() {
//!     match orchestrator.run_case(case) {
//!         Ok(_) => println!("{} ok", case.name()),
//!         Err(e) => println!("{} FAILED: {e}", case.name()),
//!     }
//! }
//! # Ok::<(), exparity_core::HarnessError>(())
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod memcheck;
pub mod orchestrator;
pub mod output;
pub mod parity;
pub mod runner;
pub mod suite;

pub use config::{HarnessConfig, MemcheckConfig};
pub use corpus::{CaseKind, Corpus, TestCase};
pub use error::{HarnessError, Result};
pub use memcheck::{MemcheckPolicy, MemcheckVerdict};
pub use orchestrator::{CaseError, CaseFailure, CaseReport, CaseState, Orchestrator};
pub use output::Output;
pub use parity::{Field, Mismatch, compare_outputs};
pub use runner::{Invocation, ProcessRunner};
pub use suite::{CaseResult, SuiteSummary, run_suite};

/// Version of exparity
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit code for infrastructure errors (`-1` as seen by the shell)
pub const INFRA_EXIT_CODE: i32 = 255;

//! Error types for exparity
//!
//! Everything in [`HarnessError`] means the test environment is broken, not
//! that the candidate misbehaved. Behavioral mismatches live in
//! [`crate::parity`] and [`crate::orchestrator`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Infrastructure errors that abort the whole run
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HarnessError {
    /// A program under test is not where the configuration says it is
    #[error("Couldn't find {role} executable at {}", path.display())]
    MissingExecutable { role: &'static str, path: PathBuf },

    /// A corpus directory is missing
    #[error("Couldn't find {category} corpus directory at {}", path.display())]
    MissingDirectory {
        category: &'static str,
        path: PathBuf,
    },

    /// The process could not be started at all
    #[error("Error while running subprocess {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The checker report could not be created or read back
    #[error("Checker report error: {0}")]
    CheckerLog(#[source] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration value could not be interpreted
    #[error("Invalid value {value:?} for {key}")]
    ConfigValue { key: &'static str, value: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! # exparity-tests
//!
//! Fixture parity entry point and integration tests for exparity.
//!
//! - `tests/fixture_parity.rs` is the test-framework entry point: one trial
//!   per corpus file, configured through `EXPARITY_*` environment variables.
//!   The `exparity-fixtures` binary runs the same [`fixture::main`]
//! - The other integration tests drive the harness against small `/bin/sh`
//!   programs standing in for the reference, the candidate and the checker
//!
//! This library holds what those tests share.

pub mod fixture;
pub mod sandbox;
pub mod scripts;

pub use sandbox::Sandbox;

/// Install a stderr `fmt` subscriber, `RUST_LOG` overriding `default_filter`
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `Command` for `program` with every inherited `EXPARITY_*` variable removed
pub fn harness_command(program: impl AsRef<std::ffi::OsStr>) -> std::process::Command {
    let mut cmd = std::process::Command::new(program);
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("EXPARITY_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

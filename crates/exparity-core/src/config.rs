//! Harness configuration
//!
//! A [`HarnessConfig`] is built once at start and then only borrowed. It comes
//! from built-in defaults, an optional JSON file, and environment overrides,
//! in that order.

use crate::error::{HarnessError, Result};
use crate::memcheck::MemcheckPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables read by [`HarnessConfig::from_lookup`]
pub mod vars {
    /// Path to a JSON configuration file
    pub const CONFIG: &str = "EXPARITY_CONFIG";
    /// Base directory for relative default and override paths
    pub const ROOT: &str = "EXPARITY_ROOT";
    pub const CANDIDATE: &str = "EXPARITY_CANDIDATE";
    pub const REFERENCE: &str = "EXPARITY_REFERENCE";
    pub const VALID_DIR: &str = "EXPARITY_VALID_DIR";
    pub const INVALID_DIR: &str = "EXPARITY_INVALID_DIR";
    pub const EXTENSION: &str = "EXPARITY_EXTENSION";
    pub const MEMCHECK: &str = "EXPARITY_MEMCHECK";
    pub const MEMCHECK_PROGRAM: &str = "EXPARITY_MEMCHECK_PROGRAM";
    pub const MEMCHECK_STRICT: &str = "EXPARITY_MEMCHECK_STRICT";
}

/// Memory checker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemcheckConfig {
    /// Wrap candidate runs with the checker
    pub enabled: bool,
    /// Checker executable
    pub program: String,
    /// Flags passed before `--log-file=<report>`
    pub args: Vec<String>,
    /// Fail the case on a dirty report instead of only logging it
    pub strict: bool,
    /// Directory for report files; the system temp dir when unset
    pub report_dir: Option<PathBuf>,
}

impl Default for MemcheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "valgrind".into(),
            args: vec!["--leak-check=yes".into()],
            strict: false,
            report_dir: None,
        }
    }
}

/// Everything the harness needs to know about its environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Program under test
    pub candidate: PathBuf,
    /// Trusted program whose behavior is the oracle
    pub reference: PathBuf,
    /// Inputs both programs are expected to accept
    pub valid_dir: PathBuf,
    /// Inputs both programs are expected to reject
    pub invalid_dir: PathBuf,
    /// Extension (without the dot) the programs accept
    pub expected_extension: String,
    /// Exact stderr required for inputs with any other extension
    pub invalid_input_message: String,
    pub memcheck: MemcheckConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            candidate: PathBuf::from("../cmake-build-debug/FractalDrawer"),
            reference: PathBuf::from("./SchoolFractalDrawer"),
            valid_dir: PathBuf::from("valid"),
            invalid_dir: PathBuf::from("invalid"),
            expected_extension: "csv".into(),
            invalid_input_message: "Invalid input\n".into(),
            memcheck: MemcheckConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    ///
    /// Paths from the config file resolve against the file's directory. Paths
    /// from defaults and `EXPARITY_*` overrides resolve against
    /// `EXPARITY_ROOT`, or the current directory when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(vars::CONFIG) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        let base = match lookup(vars::ROOT) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir()?,
        };
        config.resolve_paths(&base);
        Ok(config)
    }

    /// Load a JSON file, resolving relative paths against its directory
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::parse_file(path)?;
        config.resolve_paths(&parent_dir(path));
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup(vars::CANDIDATE) {
            self.candidate = v.into();
        }
        if let Some(v) = lookup(vars::REFERENCE) {
            self.reference = v.into();
        }
        if let Some(v) = lookup(vars::VALID_DIR) {
            self.valid_dir = v.into();
        }
        if let Some(v) = lookup(vars::INVALID_DIR) {
            self.invalid_dir = v.into();
        }
        if let Some(v) = lookup(vars::EXTENSION) {
            self.expected_extension = v.trim_start_matches('.').to_string();
        }
        if let Some(v) = lookup(vars::MEMCHECK) {
            self.memcheck.enabled = parse_flag(vars::MEMCHECK, &v)?;
        }
        if let Some(v) = lookup(vars::MEMCHECK_PROGRAM) {
            self.memcheck.program = v;
        }
        if let Some(v) = lookup(vars::MEMCHECK_STRICT) {
            self.memcheck.strict = parse_flag(vars::MEMCHECK_STRICT, &v)?;
        }
        Ok(())
    }

    /// Make every relative path absolute against `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.candidate,
            &mut self.reference,
            &mut self.valid_dir,
            &mut self.invalid_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Check that both executables and both corpus directories exist
    pub fn preflight(&self) -> Result<()> {
        for (role, path) in [("your", &self.candidate), ("reference", &self.reference)] {
            if !path.is_file() {
                return Err(HarnessError::MissingExecutable {
                    role,
                    path: path.clone(),
                });
            }
        }
        for (category, path) in [("valid", &self.valid_dir), ("invalid", &self.invalid_dir)] {
            if !path.is_dir() {
                return Err(HarnessError::MissingDirectory {
                    category,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// How a dirty checker report affects the verdict
    pub fn memcheck_policy(&self) -> MemcheckPolicy {
        if self.memcheck.strict {
            MemcheckPolicy::Strict
        } else {
            MemcheckPolicy::Advisory
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(HarnessError::ConfigValue {
            key,
            value: value.to_string(),
        }),
    }
}

//! Test corpus management
//!
//! Discovers the fixture files for both input categories and tags each one
//! with the policy the orchestrator will apply to it.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Expected-outcome category of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// From the valid directory; full reference comparison
    Valid,
    /// From the invalid directory with the expected extension; full reference comparison
    Invalid,
    /// From the invalid directory with any other extension; fixed error contract
    InvalidExtension,
}

impl CaseKind {
    /// Directory-level category name
    pub fn category(self) -> &'static str {
        match self {
            CaseKind::Valid => "valid",
            CaseKind::Invalid | CaseKind::InvalidExtension => "invalid",
        }
    }

    /// Whether the reference program takes part in this case
    pub fn uses_reference(self) -> bool {
        !matches!(self, CaseKind::InvalidExtension)
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// One input file paired with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub path: PathBuf,
    pub kind: CaseKind,
}

impl TestCase {
    pub fn new(path: impl Into<PathBuf>, kind: CaseKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Stable name of the form `valid::sample.csv`
    pub fn name(&self) -> String {
        let file = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("{}::{}", self.kind.category(), file)
    }
}

/// Fixture files for both categories, read-only after discovery
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    valid: Vec<TestCase>,
    invalid: Vec<TestCase>,
}

impl Corpus {
    /// Discover both directories named by `config`
    pub fn discover(config: &HarnessConfig) -> Result<Self> {
        let valid = list_files("valid", &config.valid_dir)?
            .into_iter()
            .map(|path| TestCase::new(path, CaseKind::Valid))
            .collect();

        let invalid = list_files("invalid", &config.invalid_dir)?
            .into_iter()
            .map(|path| {
                let kind = if has_extension(&path, &config.expected_extension) {
                    CaseKind::Invalid
                } else {
                    CaseKind::InvalidExtension
                };
                TestCase::new(path, kind)
            })
            .collect();

        let corpus = Self { valid, invalid };
        tracing::info!(
            valid = corpus.valid.len(),
            invalid = corpus.invalid.len(),
            "corpus discovered"
        );
        Ok(corpus)
    }

    pub fn valid_inputs(&self) -> &[TestCase] {
        &self.valid
    }

    pub fn invalid_inputs(&self) -> &[TestCase] {
        &self.invalid
    }

    /// Valid cases first, then invalid ones
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.valid.iter().chain(self.invalid.iter())
    }

    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Regular files directly inside `dir`, sorted by path
fn list_files(category: &'static str, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(HarnessError::MissingDirectory {
            category,
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Case-sensitive check of the final extension
fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension().is_some_and(|e| e == expected)
}

//! Scratch workspace with a corpus, scripted programs and a report directory

use anyhow::{Context, Result};
use exparity_core::HarnessConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory laid out like a harness checkout:
/// `valid/`, `invalid/`, `bin/` and `reports/`
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create sandbox")?;
        for sub in ["valid", "invalid", "bin", "reports"] {
            std::fs::create_dir(dir.path().join(sub))
                .with_context(|| format!("failed to create {sub}/"))?;
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an executable `/bin/sh` script into `bin/`
    pub fn script(&self, name: &str, body: &str) -> Result<PathBuf> {
        let path = self.path().join("bin").join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}"))
            .with_context(|| format!("failed to write script {name}"))?;
        make_executable(&path)?;
        Ok(path)
    }

    /// Add a fixture to `valid/`
    pub fn valid(&self, name: &str, contents: &str) -> Result<PathBuf> {
        self.fixture("valid", name, contents)
    }

    /// Add a fixture to `invalid/`
    pub fn invalid(&self, name: &str, contents: &str) -> Result<PathBuf> {
        self.fixture("invalid", name, contents)
    }

    fn fixture(&self, category: &str, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(category).join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write fixture {category}/{name}"))?;
        Ok(path)
    }

    /// Config pointing at this sandbox's corpus with memcheck off
    pub fn config(&self, candidate: &Path, reference: &Path) -> HarnessConfig {
        let mut config = HarnessConfig {
            candidate: candidate.to_path_buf(),
            reference: reference.to_path_buf(),
            ..HarnessConfig::default()
        };
        config.memcheck.enabled = false;
        config.memcheck.report_dir = Some(self.reports_dir());
        config.resolve_paths(self.path());
        config
    }

    /// Config with memcheck on, wrapping the candidate with `checker`
    pub fn config_with_checker(
        &self,
        candidate: &Path,
        reference: &Path,
        checker: &Path,
    ) -> HarnessConfig {
        let mut config = self.config(candidate, reference);
        config.memcheck.enabled = true;
        config.memcheck.program = checker.to_string_lossy().into_owned();
        config
    }

    /// Serialize `config` to `exparity.json` in the sandbox
    pub fn write_config(&self, config: &HarnessConfig) -> Result<PathBuf> {
        let path = self.path().join("exparity.json");
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&path, json).context("failed to write config")?;
        Ok(path)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.path().join("reports")
    }

    /// Number of checker reports still on disk
    pub fn reports_left(&self) -> Result<usize> {
        Ok(std::fs::read_dir(self.reports_dir())?.count())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

//! Captured result of one process invocation

use std::borrow::Cow;

/// Observable behavior of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    return_code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    checker_log: String,
}

impl Output {
    pub fn new(
        return_code: i32,
        stdout: impl Into<Vec<u8>>,
        stderr: impl Into<Vec<u8>>,
        checker_log: impl Into<String>,
    ) -> Self {
        Self {
            return_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            checker_log: checker_log.into(),
        }
    }

    /// Exit status; `-N` when the process was killed by signal `N`
    pub fn return_code(&self) -> i32 {
        self.return_code
    }

    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Memory checker report, empty when the run was not wrapped
    pub fn checker_log(&self) -> &str {
        &self.checker_log
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Triple that must match between reference and candidate
    pub fn observable(&self) -> (i32, &[u8], &[u8]) {
        (self.return_code, &self.stdout, &self.stderr)
    }
}

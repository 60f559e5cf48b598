//! Process runner
//!
//! Runs one external program to completion and captures everything it
//! observably did. When memory checking is requested the program is run under
//! the checker, which writes its report to a temporary file owned by that
//! single invocation.

use crate::config::MemcheckConfig;
use crate::error::{HarnessError, Result};
use crate::output::Output;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tempfile::NamedTempFile;

/// One command to run
#[derive(Debug, Clone)]
pub struct Invocation {
    argv: Vec<OsString>,
    input: Option<Vec<u8>>,
    memcheck: bool,
}

impl Invocation {
    /// Start an invocation of `program` with no arguments
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            argv: vec![program.as_ref().to_os_string()],
            input: None,
            memcheck: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.argv.push(arg.as_ref().to_os_string());
        self
    }

    /// Bytes fed to the process on stdin
    pub fn input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Run under the memory checker
    pub fn memcheck(mut self, enabled: bool) -> Self {
        self.memcheck = enabled;
        self
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }
}

/// Spawns invocations according to the memcheck settings it borrows
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner<'a> {
    memcheck: &'a MemcheckConfig,
}

impl<'a> ProcessRunner<'a> {
    pub fn new(memcheck: &'a MemcheckConfig) -> Self {
        Self { memcheck }
    }

    /// Run `invocation` and wait for it to exit
    pub fn run(&self, invocation: &Invocation) -> Result<Output> {
        // Dropping the temp file removes it, so every return below cleans up.
        let report = if invocation.memcheck {
            let mut builder = tempfile::Builder::new();
            builder.prefix("exparity-memcheck-").suffix(".log");
            let file = match &self.memcheck.report_dir {
                Some(dir) => builder.tempfile_in(dir),
                None => builder.tempfile(),
            };
            Some(file.map_err(HarnessError::CheckerLog)?)
        } else {
            None
        };

        let argv = self.command_line(invocation, report.as_ref().map(NamedTempFile::path));
        tracing::info!("Running command \"{}\"", display_argv(&argv));

        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HarnessError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                program: program.to_string_lossy().into_owned(),
                source,
            })?;

        let writer = match (child.stdin.take(), invocation.input.clone()) {
            (Some(mut stdin), Some(input)) => {
                Some(std::thread::spawn(move || stdin.write_all(&input)))
            }
            // Dropping the handle closes the child's stdin
            _ => None,
        };

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            if let Ok(Err(e)) = writer.join() {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let checker_log = match &report {
            Some(file) => {
                let bytes = std::fs::read(file.path()).map_err(HarnessError::CheckerLog)?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            None => String::new(),
        };

        let code = return_code(output.status);
        tracing::debug!(code, "process exited");
        Ok(Output::new(code, output.stdout, output.stderr, checker_log))
    }

    fn command_line(&self, invocation: &Invocation, report: Option<&Path>) -> Vec<OsString> {
        let Some(report) = report else {
            return invocation.argv.clone();
        };

        let mut log_flag = OsString::from("--log-file=");
        log_flag.push(report);

        let mut argv = Vec::with_capacity(self.memcheck.args.len() + invocation.argv.len() + 2);
        argv.push(OsString::from(&self.memcheck.program));
        argv.extend(self.memcheck.args.iter().map(OsString::from));
        argv.push(log_flag);
        argv.extend(invocation.argv.iter().cloned());
        argv
    }
}

fn return_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

fn display_argv(argv: &[OsString]) -> String {
    argv.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

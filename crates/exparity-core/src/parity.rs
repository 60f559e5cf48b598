//! Reference vs candidate comparison
//!
//! The reference output is always the expected side. Fields are compared
//! exactly, with no whitespace or line-ending normalization, in the order
//! return code, stdout, stderr. The checker log is never compared.

use crate::output::Output;
use std::fmt;
use thiserror::Error;

/// Observable field of an [`Output`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ReturnCode,
    Stdout,
    Stderr,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ReturnCode => write!(f, "Return code"),
            Field::Stdout => write!(f, "STDOUT"),
            Field::Stderr => write!(f, "STDERR"),
        }
    }
}

/// First field on which the two runs disagree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} mismatch (left=reference, right=candidate)\n  reference: {reference}\n  candidate: {candidate}")]
pub struct Mismatch {
    pub field: Field,
    /// Rendered reference value
    pub reference: String,
    /// Rendered candidate value
    pub candidate: String,
}

impl Mismatch {
    fn bytes(field: Field, reference: &[u8], candidate: &[u8]) -> Self {
        Self {
            field,
            reference: format!("{:?}", String::from_utf8_lossy(reference)),
            candidate: format!("{:?}", String::from_utf8_lossy(candidate)),
        }
    }
}

/// Compare a reference run against a candidate run
pub fn compare_outputs(reference: &Output, candidate: &Output) -> Result<(), Mismatch> {
    if reference.return_code() != candidate.return_code() {
        return Err(Mismatch {
            field: Field::ReturnCode,
            reference: reference.return_code().to_string(),
            candidate: candidate.return_code().to_string(),
        });
    }
    if reference.stdout() != candidate.stdout() {
        return Err(Mismatch::bytes(
            Field::Stdout,
            reference.stdout(),
            candidate.stdout(),
        ));
    }
    if reference.stderr() != candidate.stderr() {
        return Err(Mismatch::bytes(
            Field::Stderr,
            reference.stderr(),
            candidate.stderr(),
        ));
    }
    Ok(())
}

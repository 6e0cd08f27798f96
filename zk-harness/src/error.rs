use std::path::PathBuf;

use thiserror::Error;
use verifier_contract::Revert;

use crate::scheme::Scheme;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{scheme} arguments need at least {expected} elements, got {actual}")]
    Shape {
        scheme: Scheme,
        expected: usize,
        actual: usize,
    },

    #[error("calldata token {token:?} is not a decimal or hex numeral")]
    Parse { token: String },

    #[error("{path}: expected {rule} pattern not found; generator output format changed?")]
    PatchMatch { path: PathBuf, rule: String },

    #[error("`{0}` is not a valid Solidity contract name")]
    InvalidContractName(String),

    #[error("{circuit} ({scheme}): verifier returned {actual}, expected {expected}")]
    VerificationMismatch {
        circuit: String,
        scheme: Scheme,
        expected: bool,
        actual: bool,
    },

    #[error("backend speaks {actual}, case expects {expected}")]
    SchemeMismatch { expected: Scheme, actual: Scheme },

    #[error("malformed proof object: {0}")]
    MalformedProof(String),

    #[error("verifier returned a non-bool word")]
    MalformedReturn,

    #[error("prover failed: {0:#}")]
    Prover(anyhow::Error),

    #[error("verifier reverted: {0}")]
    Revert(#[from] Revert),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

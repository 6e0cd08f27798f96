//! Verification test protocol.
//!
//! Each case runs strictly in sequence: prove, normalize, export calldata,
//! reshape, call a freshly deployed verifier, and assert the expected
//! result. The negative path calls the verifier with zero-filled arguments
//! of the same shape and expects a rejection. Nothing is retried.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::calldata::{split_calldata, to_verifier_arguments, VerifierArguments};
use crate::config::CircuitArtifacts;
use crate::error::{HarnessError, Result};
use crate::normalize::{normalize_json, Normalized};
use crate::scheme::Scheme;

/// Named witness inputs, e.g. `{"a": "1", "b": "2"}`.
pub type WitnessInput = BTreeMap<String, String>;

/// Raw prover output, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofOutput {
    pub proof: Value,
    pub public_signals: Value,
}

/// Proof generation and calldata export for one proving scheme.
pub trait ProvingBackend {
    fn scheme(&self) -> Scheme;

    fn full_prove(&self, input: &WitnessInput, program: &Path, proving_key: &Path) -> Result<ProofOutput>;

    fn export_solidity_calldata(&self, proof: &Normalized, public_signals: &Normalized) -> Result<String>;
}

/// A deployed verifier contract instance.
pub trait VerifierContract {
    fn verify_proof(&self, args: &VerifierArguments) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct VerificationCase {
    pub circuit: String,
    pub scheme: Scheme,
    pub input: WitnessInput,
    pub artifacts: CircuitArtifacts,
    /// Public signal count, used to shape the zero-filled negative call.
    pub public_signals: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositiveRun {
    pub public_signals: Normalized,
    pub calldata: String,
    pub arguments: VerifierArguments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    pub circuit: String,
    pub scheme: Scheme,
    pub positive: PositiveRun,
}

fn expect_result(case: &VerificationCase, expected: bool, actual: bool) -> Result<()> {
    if actual != expected {
        return Err(HarnessError::VerificationMismatch {
            circuit: case.circuit.clone(),
            scheme: case.scheme,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Prove the case's witness and assert the verifier accepts it.
pub fn run_positive<B, V>(case: &VerificationCase, backend: &B, verifier: &V) -> Result<PositiveRun>
where
    B: ProvingBackend + ?Sized,
    V: VerifierContract + ?Sized,
{
    if backend.scheme() != case.scheme {
        return Err(HarnessError::SchemeMismatch {
            expected: case.scheme,
            actual: backend.scheme(),
        });
    }

    let output = backend.full_prove(&case.input, &case.artifacts.program, &case.artifacts.proving_key)?;
    let proof = normalize_json(&output.proof);
    let public_signals = normalize_json(&output.public_signals);
    debug!(circuit = %case.circuit, signals = ?serde_json::Value::from(&public_signals), "proof normalized");

    let calldata = backend.export_solidity_calldata(&proof, &public_signals)?;
    let arguments = to_verifier_arguments(&split_calldata(&calldata), case.scheme)?;

    let verified = verifier.verify_proof(&arguments)?;
    expect_result(case, true, verified)?;
    info!(circuit = %case.circuit, scheme = %case.scheme, "valid proof accepted");

    Ok(PositiveRun {
        public_signals,
        calldata,
        arguments,
    })
}

/// Assert the verifier rejects zero-filled arguments of the case's shape.
pub fn run_negative<V>(case: &VerificationCase, verifier: &V) -> Result<()>
where
    V: VerifierContract + ?Sized,
{
    let arguments = VerifierArguments::zeroed(case.scheme, case.public_signals);
    let verified = verifier.verify_proof(&arguments)?;
    expect_result(case, false, verified)?;
    info!(circuit = %case.circuit, scheme = %case.scheme, "zero-filled proof rejected");
    Ok(())
}

/// Run both paths, each against its own fresh deployment.
pub fn run_case<B, V, D>(case: &VerificationCase, backend: &B, mut deploy: D) -> Result<CaseReport>
where
    B: ProvingBackend + ?Sized,
    V: VerifierContract,
    D: FnMut() -> Result<V>,
{
    let positive = run_positive(case, backend, &deploy()?)?;
    run_negative(case, &deploy()?)?;

    Ok(CaseReport {
        circuit: case.circuit.clone(),
        scheme: case.scheme,
        positive,
    })
}

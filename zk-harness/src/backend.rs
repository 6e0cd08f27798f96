//! Groth16 bindings of the protocol traits: proofs from the `prover`
//! crate, verification through a `verifier-contract` deployment.

use std::fs;
use std::path::Path;

use num_bigint::BigUint;
use prover::export::{export_solidity_calldata, ProofPoints};
use verifier_contract::Groth16Verifier;

use crate::abi::{decode_verify_result, encode_verify_call};
use crate::calldata::VerifierArguments;
use crate::error::{HarnessError, Result};
use crate::normalize::Normalized;
use crate::protocol::{ProofOutput, ProvingBackend, VerifierContract, WitnessInput};
use crate::scheme::Scheme;

#[derive(Debug, Default, Clone, Copy)]
pub struct Groth16Backend;

impl ProvingBackend for Groth16Backend {
    fn scheme(&self) -> Scheme {
        Scheme::Groth16
    }

    fn full_prove(&self, input: &WitnessInput, program: &Path, proving_key: &Path) -> Result<ProofOutput> {
        let (proof, public_signals) =
            prover::full_prove(input, program, proving_key).map_err(HarnessError::Prover)?;
        Ok(ProofOutput { proof, public_signals })
    }

    fn export_solidity_calldata(&self, proof: &Normalized, public_signals: &Normalized) -> Result<String> {
        let points = proof_points(proof)?;
        let inputs = public_signals
            .as_sequence()
            .ok_or_else(|| HarnessError::MalformedProof("public signals are not a sequence".into()))?
            .iter()
            .enumerate()
            .map(|(i, s)| integer(Some(s), &format!("publicSignals[{i}]")))
            .collect::<Result<Vec<_>>>()?;
        Ok(export_solidity_calldata(&points, &inputs))
    }
}

fn integer(value: Option<&Normalized>, path: &str) -> Result<BigUint> {
    value
        .and_then(Normalized::as_integer)
        .cloned()
        .ok_or_else(|| HarnessError::MalformedProof(format!("{path} is not an integer")))
}

fn coordinate(proof: &Normalized, key: &str, path: &[usize]) -> Result<BigUint> {
    let value = path.iter().try_fold(proof.get(key), |node, &i| Some(node?.at(i)));
    let label = path.iter().fold(key.to_string(), |acc, i| format!("{acc}[{i}]"));
    integer(value.flatten(), &label)
}

// Projective z of zero marks the point at infinity; a missing z reads as affine.
fn at_infinity(proof: &Normalized, key: &str, z: &[usize]) -> bool {
    let value = z.iter().try_fold(proof.get(key), |node, &i| Some(node?.at(i)));
    value
        .flatten()
        .and_then(Normalized::as_integer)
        .is_some_and(|z| *z == BigUint::default())
}

fn g1(proof: &Normalized, key: &str) -> Result<[BigUint; 2]> {
    if at_infinity(proof, key, &[2]) {
        return Ok(Default::default());
    }
    Ok([coordinate(proof, key, &[0])?, coordinate(proof, key, &[1])?])
}

fn g2(proof: &Normalized, key: &str) -> Result<[[BigUint; 2]; 2]> {
    if at_infinity(proof, key, &[2, 0]) && at_infinity(proof, key, &[2, 1]) {
        return Ok(Default::default());
    }
    Ok([
        [coordinate(proof, key, &[0, 0])?, coordinate(proof, key, &[0, 1])?],
        [coordinate(proof, key, &[1, 0])?, coordinate(proof, key, &[1, 1])?],
    ])
}

/// Pull `pi_a`, `pi_b`, `pi_c` out of a normalized snarkjs proof.
///
/// The point at infinity becomes `(0, 0)`, the encoding the verifier
/// contract reads as the identity.
pub fn proof_points(proof: &Normalized) -> Result<ProofPoints> {
    Ok(ProofPoints {
        a: g1(proof, "pi_a")?,
        b: g2(proof, "pi_b")?,
        c: g1(proof, "pi_c")?,
    })
}

/// A deployed Groth16 verifier, called through its ABI.
pub struct DeployedGroth16Verifier {
    contract: Groth16Verifier,
}

impl DeployedGroth16Verifier {
    pub fn deploy(verifying_key: &Path) -> Result<Self> {
        let bytes = fs::read(verifying_key)?;
        Ok(Self {
            contract: Groth16Verifier::deploy(&bytes)?,
        })
    }
}

impl VerifierContract for DeployedGroth16Verifier {
    fn verify_proof(&self, args: &VerifierArguments) -> Result<bool> {
        if args.scheme != Scheme::Groth16 {
            return Err(HarnessError::SchemeMismatch {
                expected: Scheme::Groth16,
                actual: args.scheme,
            });
        }
        let word = self.contract.call(&encode_verify_call(args)?)?;
        decode_verify_result(&word)
    }
}

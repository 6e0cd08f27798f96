// Groth16 proving engine over BN254 for product-chain circuits.
// Produces proofs and public signals in the JSON shape snarkjs emits so the
// verification harness can treat it like any external prover.

// Includes:
// - `setup`: generates and stores the proving/verifying keys for a circuit
// - `full_prove`: loads a circuit program and proving key, proves a witness
// - `verify_proof`: off-chain check of a proof against a verifying key
// - `export::export_solidity_calldata`: renders verifier call arguments

pub mod artifacts;
pub mod circuit;
pub mod export;
pub mod utils;

use anyhow::{Context, ensure};
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey, prepare_verifying_key};
use rand::thread_rng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::artifacts::{CircuitDescriptor, PROGRAM_FILE, PROVING_KEY_FILE, VERIFYING_KEY_FILE};
use crate::circuit::ProductChainCircuit;
use crate::utils::{load_proving_key, save_proving_key, save_verifying_key};

/// Generate Groth16 keys for `descriptor` and write the circuit program and
/// both keys into `dir`.
pub fn setup(descriptor: &CircuitDescriptor, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = thread_rng();
    let circuit = ProductChainCircuit::blank(descriptor.inputs.len());
    let pk = Groth16::<Bn254>::generate_random_parameters_with_reduction(circuit, &mut rng)?;

    descriptor.save(&dir.join(PROGRAM_FILE))?;
    save_proving_key(&pk, &dir.join(PROVING_KEY_FILE))?;
    save_verifying_key(&pk.vk, &dir.join(VERIFYING_KEY_FILE))?;

    debug!(circuit = %descriptor.name, dir = %dir.display(), "groth16 setup complete");
    Ok(())
}

/// Prove the witness `inputs` for the circuit program at `program` with the
/// proving key at `proving_key`. Returns `(proof, publicSignals)` as JSON.
pub fn full_prove(
    inputs: &BTreeMap<String, String>,
    program: &Path,
    proving_key: &Path,
) -> anyhow::Result<(Value, Value)> {
    let descriptor = CircuitDescriptor::load(program)?;
    let factors = descriptor.assign(inputs)?;
    let pk = load_proving_key(proving_key)
        .with_context(|| format!("loading proving key {}", proving_key.display()))?;

    let public = ProductChainCircuit::outputs(&factors);
    ensure!(
        pk.vk.gamma_abc_g1.len() == public.len() + 1,
        "proving key {} does not match circuit {}",
        proving_key.display(),
        descriptor.name
    );

    let mut rng = thread_rng();
    let circuit = ProductChainCircuit::with_factors(&factors);
    let proof = Groth16::<Bn254>::create_random_proof_with_reduction(circuit, &pk, &mut rng)?;

    debug!(circuit = %descriptor.name, signals = public.len(), "proof generated");
    Ok((export::proof_to_json(&proof), export::signals_to_json(&public)))
}

/// Verify a Groth16 proof against its public inputs
pub fn verify_proof(proof: &Proof<Bn254>, public: &[Fr], vk: &VerifyingKey<Bn254>) -> anyhow::Result<bool> {
    let pvk = prepare_verifying_key(vk);
    let result = Groth16::<Bn254>::verify_proof(&pvk, proof, public)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::load_verifying_key;
    use serde_json::json;

    fn inputs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn hello_world_proves_product() {
        let dir = tempfile::tempdir().unwrap();
        setup(&CircuitDescriptor::builtin("HelloWorld").unwrap(), dir.path()).unwrap();

        let (proof, signals) = full_prove(
            &inputs(&[("a", "1"), ("b", "2")]),
            &dir.path().join(PROGRAM_FILE),
            &dir.path().join(PROVING_KEY_FILE),
        )
        .unwrap();

        assert_eq!(signals, json!(["2"]));
        assert_eq!(proof["protocol"], "groth16");
        assert_eq!(proof["pi_a"].as_array().unwrap().len(), 3);
        assert_eq!(proof["pi_b"][2], json!(["1", "0"]));
    }

    #[test]
    fn multiplier3_emits_both_products() {
        let dir = tempfile::tempdir().unwrap();
        setup(&CircuitDescriptor::builtin("Multiplier3").unwrap(), dir.path()).unwrap();

        let (_, signals) = full_prove(
            &inputs(&[("a", "1"), ("b", "2"), ("c", "3")]),
            &dir.path().join(PROGRAM_FILE),
            &dir.path().join(PROVING_KEY_FILE),
        )
        .unwrap();

        assert_eq!(signals, json!(["2", "6"]));
    }

    #[test]
    fn mismatched_proving_key_is_rejected() {
        let hello = tempfile::tempdir().unwrap();
        let triple = tempfile::tempdir().unwrap();
        setup(&CircuitDescriptor::builtin("HelloWorld").unwrap(), hello.path()).unwrap();
        setup(&CircuitDescriptor::builtin("Multiplier3").unwrap(), triple.path()).unwrap();

        let result = full_prove(
            &inputs(&[("a", "1"), ("b", "2"), ("c", "3")]),
            &triple.path().join(PROGRAM_FILE),
            &hello.path().join(PROVING_KEY_FILE),
        );
        assert!(result.is_err());
    }

    #[test]
    fn offchain_verification_accepts_fresh_proof() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = CircuitDescriptor::builtin("HelloWorld").unwrap();
        setup(&circuit, dir.path()).unwrap();

        let pk = load_proving_key(&dir.path().join(PROVING_KEY_FILE)).unwrap();
        let vk = load_verifying_key(&dir.path().join(VERIFYING_KEY_FILE)).unwrap();
        let factors = [Fr::from(3u64), Fr::from(4u64)];
        let proof = Groth16::<Bn254>::create_random_proof_with_reduction(
            ProductChainCircuit::with_factors(&factors),
            &pk,
            &mut thread_rng(),
        )
        .unwrap();

        assert!(verify_proof(&proof, &[Fr::from(12u64)], &vk).unwrap());
        assert!(!verify_proof(&proof, &[Fr::from(13u64)], &vk).unwrap());
    }
}

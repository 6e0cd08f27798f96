use std::cell::Cell;
use std::path::Path;

use num_bigint::BigUint;
use prover::artifacts::CircuitDescriptor;
use serde_json::{json, Value};
use verifier_contract::abi::{selector, split_selector};
use zk_harness::abi::encode_verify_call;
use zk_harness::backend::{DeployedGroth16Verifier, Groth16Backend};
use zk_harness::protocol::{ProofOutput, ProvingBackend, VerifierContract};
use zk_harness::{
    normalize_json, run_case, run_negative, run_positive, ArgValue, CircuitArtifacts, HarnessError, Normalized,
    Scheme, VerificationCase, VerifierArguments, WitnessInput,
};

fn witness(pairs: &[(&str, &str)]) -> WitnessInput {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn groth16_case(dir: &Path, circuit: &str, input: &[(&str, &str)]) -> VerificationCase {
    let descriptor = CircuitDescriptor::builtin(circuit).unwrap();
    let artifacts = CircuitArtifacts::in_dir(dir.join(circuit));
    prover::setup(&descriptor, &artifacts.dir).unwrap();

    VerificationCase {
        circuit: circuit.to_string(),
        scheme: Scheme::Groth16,
        input: witness(input),
        public_signals: descriptor.public_signals(),
        artifacts,
    }
}

#[test]
fn hello_world_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let case = groth16_case(dir.path(), "HelloWorld", &[("a", "1"), ("b", "2")]);

    let verifier = DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key).unwrap();
    let run = run_positive(&case, &Groth16Backend, &verifier).unwrap();

    assert_eq!(run.arguments.input, vec!["2".to_string()]);
    assert_eq!(
        run.public_signals,
        Normalized::Sequence(vec![Normalized::Integer(BigUint::from(2u64))])
    );
    // same deployment rejects the zero-filled call
    run_negative(&case, &verifier).unwrap();
}

#[test]
fn multiplier3_with_groth16() {
    let dir = tempfile::tempdir().unwrap();
    let case = groth16_case(dir.path(), "Multiplier3", &[("a", "1"), ("b", "2"), ("c", "3")]);

    let report = run_case(&case, &Groth16Backend, || {
        DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key)
    })
    .unwrap();

    assert_eq!(report.scheme, Scheme::Groth16);
    assert_eq!(report.positive.arguments.input, vec!["2".to_string(), "6".to_string()]);
    assert_eq!(report.positive.arguments.proof.len(), 3);
}

#[test]
fn each_case_deploys_fresh_verifiers() {
    let dir = tempfile::tempdir().unwrap();
    let case = groth16_case(dir.path(), "HelloWorld", &[("a", "3"), ("b", "5")]);
    let deployments = Cell::new(0);

    let report = run_case(&case, &Groth16Backend, || {
        deployments.set(deployments.get() + 1);
        DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key)
    })
    .unwrap();

    assert_eq!(deployments.get(), 2);
    assert_eq!(report.positive.arguments.input, vec!["15".to_string()]);
}

/// Exports calldata for public signals the proof does not attest to.
struct ForgedSignals;

impl ProvingBackend for ForgedSignals {
    fn scheme(&self) -> Scheme {
        Scheme::Groth16
    }

    fn full_prove(&self, input: &WitnessInput, program: &Path, proving_key: &Path) -> zk_harness::Result<ProofOutput> {
        Groth16Backend.full_prove(input, program, proving_key)
    }

    fn export_solidity_calldata(&self, proof: &Normalized, _signals: &Normalized) -> zk_harness::Result<String> {
        Groth16Backend.export_solidity_calldata(proof, &normalize_json(&json!(["3"])))
    }
}

#[test]
fn forged_signal_is_a_verification_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let case = groth16_case(dir.path(), "HelloWorld", &[("a", "1"), ("b", "2")]);
    let verifier = DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key).unwrap();

    let err = run_positive(&case, &ForgedSignals, &verifier).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::VerificationMismatch { expected: true, actual: false, .. }
    ));
}

#[test]
fn wrong_negative_arity_reverts() {
    let dir = tempfile::tempdir().unwrap();
    let mut case = groth16_case(dir.path(), "HelloWorld", &[("a", "1"), ("b", "2")]);
    case.public_signals = 2;

    let verifier = DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key).unwrap();
    assert!(matches!(run_negative(&case, &verifier), Err(HarnessError::Revert(_))));
}

#[test]
fn backend_scheme_must_match_case() {
    let dir = tempfile::tempdir().unwrap();
    let mut case = groth16_case(dir.path(), "HelloWorld", &[("a", "1"), ("b", "2")]);
    case.scheme = Scheme::Plonk;

    let verifier = DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key).unwrap();
    assert!(matches!(
        run_positive(&case, &Groth16Backend, &verifier),
        Err(HarnessError::SchemeMismatch { .. })
    ));
}

#[test]
fn missing_witness_input_fails_the_case() {
    let dir = tempfile::tempdir().unwrap();
    let case = groth16_case(dir.path(), "HelloWorld", &[("a", "1")]);
    let verifier = DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key).unwrap();
    assert!(matches!(
        run_positive(&case, &Groth16Backend, &verifier),
        Err(HarnessError::Prover(_))
    ));
}

// PLONK: a scripted prover and verifier that only check the argument
// plumbing; no PLONK arithmetic is involved.

const PLONK_PROOF: &str = "0x0001020304050607";

struct ScriptedPlonk;

impl ProvingBackend for ScriptedPlonk {
    fn scheme(&self) -> Scheme {
        Scheme::Plonk
    }

    fn full_prove(&self, _input: &WitnessInput, _program: &Path, _proving_key: &Path) -> zk_harness::Result<ProofOutput> {
        Ok(ProofOutput {
            proof: json!({"A": ["1", "2", "1"], "eval_a": "0x03", "protocol": "plonk", "curve": "bn128"}),
            public_signals: json!(["2", "6"]),
        })
    }

    fn export_solidity_calldata(&self, proof: &Normalized, signals: &Normalized) -> zk_harness::Result<String> {
        assert_eq!(proof.get("eval_a"), Some(&Normalized::Integer(BigUint::from(3u64))));
        let inputs = signals
            .as_sequence()
            .unwrap()
            .iter()
            .map(|s| format!("\"0x{:0>64}\"", s.as_integer().unwrap().to_str_radix(16)))
            .collect::<Vec<_>>()
            .join(",");
        Ok(format!("{PLONK_PROOF},[{inputs}]"))
    }
}

struct ScriptedPlonkVerifier;

impl VerifierContract for ScriptedPlonkVerifier {
    fn verify_proof(&self, args: &VerifierArguments) -> zk_harness::Result<bool> {
        let calldata = encode_verify_call(args)?;
        let (sel, body) = split_selector(&calldata).unwrap();
        assert_eq!(sel, selector("verifyProof(bytes,uint256[])"));

        let params = [
            ethabi::ParamType::Bytes,
            ethabi::ParamType::Array(Box::new(ethabi::ParamType::Uint(256))),
        ];
        let decoded = ethabi::decode(&params, body).unwrap();
        let expected_inputs = ethabi::Token::Array(vec![
            ethabi::Token::Uint(2u64.into()),
            ethabi::Token::Uint(6u64.into()),
        ]);
        Ok(decoded[0] == ethabi::Token::Bytes(vec![0, 1, 2, 3, 4, 5, 6, 7]) && decoded[1] == expected_inputs)
    }
}

#[test]
fn multiplier3_with_plonk() {
    let case = VerificationCase {
        circuit: "Multiplier3".into(),
        scheme: Scheme::Plonk,
        input: witness(&[("a", "1"), ("b", "2"), ("c", "3")]),
        artifacts: CircuitArtifacts::in_dir("unused"),
        public_signals: 2,
    };

    let report = run_case(&case, &ScriptedPlonk, || Ok(ScriptedPlonkVerifier)).unwrap();
    let args = &report.positive.arguments;
    assert_eq!(args.slot("proof"), Some(&ArgValue::Opaque(PLONK_PROOF.into())));
    assert_eq!(args.input, vec!["2".to_string(), "6".to_string()]);
    assert_eq!(
        Value::from(&report.positive.public_signals),
        json!(["2", "6"])
    );
}

/*!
    zkSNARK Verifier Contract

    In-process model of a generated Groth16 verifier contract over BN254.
    It behaves the way the deployed Solidity verifier does, so harness code
    can exercise the exact call path a chain client would use.

    ## Highlights:
    - Dispatches on the 4-byte selector of
      `verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[])`.
    - ABI-decodes the arguments with `ethabi`.
    - Reverts on malformed calldata, wrong input arity, public inputs outside
      the scalar field and coordinates that are not curve points.
    - `(0, 0)` encodes the point at infinity, as on the EVM precompiles.
    - G2 coordinates arrive imaginary part first (EVM order).
    - Returns the Groth16 result as a Solidity-style 32-byte bool word.

    ## Deployment and Use:
    - `Groth16Verifier::deploy()` with the uncompressed verifying key bytes.
    - `call()` with selector + ABI-encoded arguments.
*/

pub mod abi;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ff::{PrimeField, Zero};
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ethabi::Uint;
use num_bigint::BigUint;
use thiserror::Error;
use tracing::debug;

use crate::abi::{
    dynamic_words, encode_bool, groth16_params, selector, split_selector, word_matrix, words,
    GROTH16_VERIFY_SIGNATURE,
};

/// Reasons the contract call reverts instead of returning a result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Revert {
    #[error("invalid verifying key: {0}")]
    InvalidVerifyingKey(String),
    #[error("unknown function selector 0x{0}")]
    UnknownSelector(String),
    #[error("malformed calldata: {0}")]
    MalformedCalldata(String),
    #[error("verifier-bad-input: expected {expected} public inputs, got {actual}")]
    BadInputLength { expected: usize, actual: usize },
    #[error("verifier-gte-snark-scalar-field")]
    InputOutOfField,
    #[error("verifier-invalid-point")]
    InvalidPoint,
}

pub struct Groth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
    public_inputs: usize,
}

impl Groth16Verifier {
    /// Deploy a fresh verifier instance for the given verifying key.
    pub fn deploy(vk_bytes: &[u8]) -> Result<Self, Revert> {
        let mut vk_src = vk_bytes;
        let vk: VerifyingKey<Bn254> = VerifyingKey::deserialize_uncompressed(&mut vk_src)
            .map_err(|e| Revert::InvalidVerifyingKey(e.to_string()))?;
        if vk.gamma_abc_g1.is_empty() {
            return Err(Revert::InvalidVerifyingKey("empty IC".into()));
        }

        Ok(Self {
            public_inputs: vk.gamma_abc_g1.len() - 1,
            pvk: prepare_verifying_key(&vk),
        })
    }

    pub fn public_inputs(&self) -> usize {
        self.public_inputs
    }

    /// Entry point: raw calldata in, 32-byte return word out.
    pub fn call(&self, calldata: &[u8]) -> Result<[u8; 32], Revert> {
        // ┌──────────┬──────────────────────────────────────────┐
        // │ 0..3 sel │ 4.. abi(a, b, c, input)                  │
        // └──────────┴──────────────────────────────────────────┘
        let (sel, body) = split_selector(calldata)?;
        if sel != selector(GROTH16_VERIFY_SIGNATURE) {
            return Err(Revert::UnknownSelector(sel.iter().map(|b| format!("{b:02x}")).collect()));
        }

        let mut tokens = ethabi::decode(&groth16_params(), body)
            .map_err(|e| Revert::MalformedCalldata(e.to_string()))?
            .into_iter();
        let mut next = || {
            tokens
                .next()
                .ok_or_else(|| Revert::MalformedCalldata("missing argument".into()))
        };

        let a = words::<2>(next()?)?;
        let b = word_matrix(next()?)?;
        let c = words::<2>(next()?)?;
        let input = dynamic_words(next()?)?;

        let valid = self.verify_proof(&a, &b, &c, &input)?;
        Ok(encode_bool(valid))
    }

    /// `verifyProof(a, b, c, input)` with already decoded arguments.
    pub fn verify_proof(
        &self,
        a: &[Uint; 2],
        b: &[[Uint; 2]; 2],
        c: &[Uint; 2],
        input: &[Uint],
    ) -> Result<bool, Revert> {
        if input.len() != self.public_inputs {
            return Err(Revert::BadInputLength {
                expected: self.public_inputs,
                actual: input.len(),
            });
        }

        let public = input.iter().map(scalar).collect::<Result<Vec<_>, _>>()?;
        let proof = Proof::<Bn254> {
            a: g1_point(a)?,
            b: g2_point(b)?,
            c: g1_point(c)?,
        };

        let valid = Groth16::<Bn254>::verify_proof(&self.pvk, &proof, &public).unwrap_or(false);
        debug!(valid, inputs = public.len(), "groth16 verifier call");
        Ok(valid)
    }
}

fn to_biguint(word: &Uint) -> BigUint {
    let mut buf = [0u8; 32];
    word.to_big_endian(&mut buf);
    BigUint::from_bytes_be(&buf)
}

fn scalar(word: &Uint) -> Result<Fr, Revert> {
    let value = to_biguint(word);
    if value >= BigUint::from(Fr::MODULUS) {
        return Err(Revert::InputOutOfField);
    }
    Ok(Fr::from(value))
}

fn base(word: &Uint) -> Result<Fq, Revert> {
    let value = to_biguint(word);
    if value >= BigUint::from(Fq::MODULUS) {
        return Err(Revert::InvalidPoint);
    }
    Ok(Fq::from(value))
}

fn g1_point(words: &[Uint; 2]) -> Result<G1Affine, Revert> {
    let (x, y) = (base(&words[0])?, base(&words[1])?);
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Revert::InvalidPoint);
    }
    Ok(point)
}

fn g2_point(words: &[[Uint; 2]; 2]) -> Result<G2Affine, Revert> {
    // EVM order: (x.c1, x.c0), (y.c1, y.c0)
    let x = Fq2::new(base(&words[0][1])?, base(&words[0][0])?);
    let y = Fq2::new(base(&words[1][1])?, base(&words[1][0])?);
    if x.is_zero() && y.is_zero() {
        return Ok(G2Affine::identity());
    }
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Revert::InvalidPoint);
    }
    Ok(point)
}

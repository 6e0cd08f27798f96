// Proof serialization in the JSON shape snarkjs emits, and the matching
// Solidity calldata export for a Groth16 verifier contract.

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ff::PrimeField;
use ark_groth16::Proof;
use num_bigint::BigUint;
use serde_json::{Value, json};

/// Groth16 proof coordinates as plain integers.
///
/// `b` keeps the JSON order of each Fq2 coordinate, `[c0, c1]`; the
/// calldata export swaps it into the EVM order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofPoints {
    pub a: [BigUint; 2],
    pub b: [[BigUint; 2]; 2],
    pub c: [BigUint; 2],
}

fn decimal<F: PrimeField>(f: &F) -> String {
    Into::<BigUint>::into(*f).to_string()
}

fn g1_json(p: &G1Affine) -> Value {
    if p.infinity {
        return json!(["0", "1", "0"]);
    }
    json!([decimal(&p.x), decimal(&p.y), "1"])
}

fn g2_json(p: &G2Affine) -> Value {
    if p.infinity {
        return json!([["0", "0"], ["1", "0"], ["0", "0"]]);
    }
    json!([
        [decimal(&p.x.c0), decimal(&p.x.c1)],
        [decimal(&p.y.c0), decimal(&p.y.c1)],
        ["1", "0"]
    ])
}

pub fn proof_to_json(proof: &Proof<Bn254>) -> Value {
    json!({
        "pi_a": g1_json(&proof.a),
        "pi_b": g2_json(&proof.b),
        "pi_c": g1_json(&proof.c),
        "protocol": "groth16",
        "curve": "bn128",
    })
}

pub fn signals_to_json(signals: &[Fr]) -> Value {
    Value::Array(signals.iter().map(|s| Value::String(decimal(s))).collect())
}

/// Render an integer as a quoted, 32-byte zero-padded hex literal.
fn p256(n: &BigUint) -> String {
    let bytes = n.to_bytes_be();
    if bytes.len() > 32 {
        return format!("\"0x{}\"", hex::encode(bytes));
    }
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    format!("\"0x{}\"", hex::encode(word))
}

/// Export proof points and public inputs as the argument list of
/// `verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[])`.
pub fn export_solidity_calldata(points: &ProofPoints, inputs: &[BigUint]) -> String {
    let [a0, a1] = &points.a;
    let [[bx0, bx1], [by0, by1]] = &points.b;
    let [c0, c1] = &points.c;
    let inputs = inputs.iter().map(p256).collect::<Vec<_>>().join(",");

    format!(
        "[{},{}],[[{},{}],[{},{}]],[{},{}],[{}]",
        p256(a0),
        p256(a1),
        p256(bx1),
        p256(bx0),
        p256(by1),
        p256(by0),
        p256(c0),
        p256(c1),
        inputs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn calldata_swaps_g2_coordinates() {
        let points = ProofPoints {
            a: [n(1), n(2)],
            b: [[n(3), n(4)], [n(5), n(6)]],
            c: [n(7), n(8)],
        };
        let calldata = export_solidity_calldata(&points, &[n(255)]);
        let word = |v: &str| format!("\"0x{v:0>64}\"");

        let expected = format!(
            "[{},{}],[[{},{}],[{},{}]],[{},{}],[{}]",
            word("1"),
            word("2"),
            word("4"),
            word("3"),
            word("6"),
            word("5"),
            word("7"),
            word("8"),
            word("ff")
        );
        assert_eq!(calldata, expected);
    }

    #[test]
    fn calldata_without_inputs_keeps_empty_array() {
        let points = ProofPoints {
            a: [n(0), n(0)],
            b: [[n(0), n(0)], [n(0), n(0)]],
            c: [n(0), n(0)],
        };
        assert!(export_solidity_calldata(&points, &[]).ends_with(",[]"));
    }

    #[test]
    fn signals_are_decimal_strings() {
        let json = signals_to_json(&[Fr::from(2u64), Fr::from(6u64)]);
        assert_eq!(json, json!(["2", "6"]));
    }
}

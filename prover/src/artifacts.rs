// Per-circuit artifact layout: the witness program descriptor plus the
// Groth16 proving and verifying keys, all stored in one directory.

use anyhow::{Context, bail, ensure};
use ark_bn254::Fr;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PROGRAM_FILE: &str = "circuit.json";
pub const PROVING_KEY_FILE: &str = "proving_key.bin";
pub const VERIFYING_KEY_FILE: &str = "verifying_key.bin";

/// Describes a product-chain circuit: its name and the ordered input
/// signals that are multiplied together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescriptor {
    pub name: String,
    pub inputs: Vec<String>,
}

impl CircuitDescriptor {
    pub fn new(name: impl Into<String>, inputs: &[&str]) -> anyhow::Result<Self> {
        let name = name.into();
        ensure!(
            inputs.len() >= 2,
            "circuit {name} needs at least two input signals, got {}",
            inputs.len()
        );
        Ok(Self {
            name,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Circuits shipped with the harness.
    pub fn builtin(name: &str) -> Option<Self> {
        let inputs: &[&str] = match name {
            "HelloWorld" => &["a", "b"],
            "Multiplier3" => &["a", "b", "c"],
            _ => return None,
        };
        Self::new(name, inputs).ok()
    }

    /// Number of public signals the circuit emits.
    pub fn public_signals(&self) -> usize {
        self.inputs.len().saturating_sub(1)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading circuit program {}", path.display()))?;
        let descriptor: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing circuit program {}", path.display()))?;
        ensure!(
            descriptor.inputs.len() >= 2,
            "circuit {} declares fewer than two inputs",
            descriptor.name
        );
        Ok(descriptor)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("writing circuit program {}", path.display()))
    }

    /// Map named witness inputs onto the ordered circuit factors.
    pub fn assign(&self, inputs: &BTreeMap<String, String>) -> anyhow::Result<Vec<Fr>> {
        if let Some(unknown) = inputs.keys().find(|k| !self.inputs.contains(*k)) {
            bail!("unknown input signal `{unknown}` for circuit {}", self.name);
        }

        self.inputs
            .iter()
            .map(|name| {
                let raw = inputs
                    .get(name)
                    .with_context(|| format!("missing input signal `{name}` for circuit {}", self.name))?;
                let value: BigUint = raw
                    .parse()
                    .with_context(|| format!("input signal `{name}` is not a decimal integer: {raw:?}"))?;
                Ok(Fr::from(value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn builtin_circuits() {
        assert_eq!(CircuitDescriptor::builtin("HelloWorld").unwrap().public_signals(), 1);
        assert_eq!(CircuitDescriptor::builtin("Multiplier3").unwrap().public_signals(), 2);
        assert!(CircuitDescriptor::builtin("Unknown").is_none());
    }

    #[test]
    fn assign_orders_factors_by_declaration() {
        let circuit = CircuitDescriptor::builtin("Multiplier3").unwrap();
        let factors = circuit
            .assign(&inputs(&[("c", "3"), ("a", "1"), ("b", "2")]))
            .unwrap();
        assert_eq!(factors, vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)]);
    }

    #[test]
    fn assign_rejects_bad_inputs() {
        let circuit = CircuitDescriptor::builtin("HelloWorld").unwrap();
        assert!(circuit.assign(&inputs(&[("a", "1")])).is_err());
        assert!(circuit.assign(&inputs(&[("a", "1"), ("b", "2"), ("z", "3")])).is_err());
        assert!(circuit.assign(&inputs(&[("a", "1"), ("b", "two")])).is_err());
    }

    #[test]
    fn single_input_circuit_is_rejected() {
        assert!(CircuitDescriptor::new("Identity", &["a"]).is_err());
    }

    #[test]
    fn descriptor_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROGRAM_FILE);
        let circuit = CircuitDescriptor::builtin("HelloWorld").unwrap();
        circuit.save(&path).unwrap();
        assert_eq!(CircuitDescriptor::load(&path).unwrap(), circuit);
    }
}

//! Per-scheme layout of verifier call arguments.
//!
//! A proof is flattened by the calldata exporter into a fixed number of
//! leading elements followed by the public inputs. Each scheme describes how
//! those leading elements are grouped into the verifier's proof parameters;
//! supporting another scheme means adding another [`SchemeLayout`].

use std::fmt;
use std::str::FromStr;

/// Number of leading Groth16 calldata elements: `a` (2), `b` (2x2), `c` (2).
pub const GROTH16_PROOF_ELEMENTS: usize = 8;
/// PLONK proofs are one packed `bytes` element.
pub const PLONK_PROOF_ELEMENTS: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    Groth16,
    Plonk,
}

/// Shape of one proof parameter of `verifyProof`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotShape {
    /// Single raw element passed through untouched (`bytes`).
    Opaque,
    /// `uint256[n]`
    Array(usize),
    /// `uint256[cols][rows]`
    Matrix(usize, usize),
}

impl SlotShape {
    /// Number of flattened calldata elements the slot consumes.
    pub const fn width(self) -> usize {
        match self {
            SlotShape::Opaque => 1,
            SlotShape::Array(n) => n,
            SlotShape::Matrix(rows, cols) => rows * cols,
        }
    }

    pub fn solidity_type(self) -> String {
        match self {
            SlotShape::Opaque => "bytes".to_string(),
            SlotShape::Array(n) => format!("uint256[{n}]"),
            SlotShape::Matrix(rows, cols) => format!("uint256[{cols}][{rows}]"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofSlot {
    pub name: &'static str,
    pub shape: SlotShape,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SchemeLayout {
    pub scheme: Scheme,
    pub proof_slots: &'static [ProofSlot],
    /// Index of the first public input in the flattened calldata.
    pub proof_elements: usize,
}

pub static GROTH16_LAYOUT: SchemeLayout = SchemeLayout {
    scheme: Scheme::Groth16,
    proof_slots: &[
        ProofSlot { name: "a", shape: SlotShape::Array(2) },
        ProofSlot { name: "b", shape: SlotShape::Matrix(2, 2) },
        ProofSlot { name: "c", shape: SlotShape::Array(2) },
    ],
    proof_elements: GROTH16_PROOF_ELEMENTS,
};

pub static PLONK_LAYOUT: SchemeLayout = SchemeLayout {
    scheme: Scheme::Plonk,
    proof_slots: &[ProofSlot { name: "proof", shape: SlotShape::Opaque }],
    proof_elements: PLONK_PROOF_ELEMENTS,
};

impl Scheme {
    pub fn layout(self) -> &'static SchemeLayout {
        match self {
            Scheme::Groth16 => &GROTH16_LAYOUT,
            Scheme::Plonk => &PLONK_LAYOUT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Groth16 => "groth16",
            Scheme::Plonk => "plonk",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "groth16" => Ok(Scheme::Groth16),
            "plonk" => Ok(Scheme::Plonk),
            other => Err(format!("unknown proving scheme `{other}`")),
        }
    }
}

impl SchemeLayout {
    /// `verifyProof(...)` signature used to derive the call selector.
    pub fn function_signature(&self) -> String {
        let params = self
            .proof_slots
            .iter()
            .map(|slot| slot.shape.solidity_type())
            .chain(std::iter::once("uint256[]".to_string()))
            .collect::<Vec<_>>()
            .join(",");
        format!("verifyProof({params})")
    }
}

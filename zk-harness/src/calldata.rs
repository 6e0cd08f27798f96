//! Calldata transformation.
//!
//! The exporter emits verifier arguments as one string of JSON-ish
//! punctuation around decimal and hex literals. [`split_calldata`] flattens
//! it into raw tokens, [`to_argument_vector`] canonicalizes every token into
//! a decimal string, and [`to_verifier_arguments`] regroups tokens into the
//! scheme's positional `verifyProof` parameters.

use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::normalize::parse_numeral;
use crate::scheme::{Scheme, SchemeLayout, SlotShape};

/// One argument of a verifier call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
    /// Field element as a canonical decimal string.
    Field(String),
    /// Packed value passed through as emitted (`0x...` bytes).
    Opaque(String),
    List(Vec<ArgValue>),
}

impl ArgValue {
    pub fn fields<S: AsRef<str>>(values: &[S]) -> Self {
        ArgValue::List(values.iter().map(|v| ArgValue::Field(v.as_ref().to_string())).collect())
    }
}

/// `verifyProof` arguments grouped per the scheme layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierArguments {
    pub scheme: Scheme,
    /// One value per proof slot, in layout order.
    pub proof: Vec<ArgValue>,
    pub input: Vec<String>,
}

impl VerifierArguments {
    pub fn layout(&self) -> &'static SchemeLayout {
        self.scheme.layout()
    }

    /// Proof parameter by its Solidity name (`a`, `b`, `c`, `proof`).
    pub fn slot(&self, name: &str) -> Option<&ArgValue> {
        self.layout()
            .proof_slots
            .iter()
            .position(|slot| slot.name == name)
            .and_then(|i| self.proof.get(i))
    }

    /// Structurally valid, all-zero arguments for `inputs` public inputs.
    pub fn zeroed(scheme: Scheme, inputs: usize) -> Self {
        let zero = || ArgValue::Field("0".to_string());
        let proof = scheme
            .layout()
            .proof_slots
            .iter()
            .map(|slot| match slot.shape {
                SlotShape::Opaque => ArgValue::Opaque("0x00".to_string()),
                SlotShape::Array(n) => ArgValue::List((0..n).map(|_| zero()).collect()),
                SlotShape::Matrix(rows, cols) => {
                    ArgValue::List((0..rows).map(|_| ArgValue::List((0..cols).map(|_| zero()).collect())).collect())
                }
            })
            .collect();

        Self {
            scheme,
            proof,
            input: vec!["0".to_string(); inputs],
        }
    }
}

/// Strip quotes, brackets and whitespace, then split on commas.
///
/// An empty argument list yields no tokens.
pub fn split_calldata(calldata: &str) -> Vec<String> {
    let flat: String = calldata
        .chars()
        .filter(|c| !matches!(c, '"' | '[' | ']') && !c.is_whitespace())
        .collect();
    if flat.is_empty() {
        return Vec::new();
    }
    flat.split(',').map(str::to_string).collect()
}

/// Canonical decimal rendering of a decimal or hex literal.
pub fn canonical_decimal(token: &str) -> Result<String> {
    parse_numeral(token)
        .map(|n| n.to_string())
        .ok_or_else(|| HarnessError::Parse { token: token.to_string() })
}

/// Flatten exported calldata into decimal field-element strings, in order.
///
/// This is the numeric view of schemes whose arguments are all field
/// elements. Opaque proof tokens lose their byte encoding here, so a PLONK
/// vector produced by this function is refused by [`to_verifier_arguments`].
pub fn to_argument_vector(calldata: &str) -> Result<Vec<String>> {
    split_calldata(calldata)
        .iter()
        .map(|token| canonical_decimal(token))
        .collect()
}

/// Regroup flattened tokens into the scheme's `verifyProof` arguments.
///
/// Field slots and inputs are canonicalized to decimal; opaque slots keep
/// the token exactly as given and must be `0x`-prefixed hex, so pass raw
/// tokens from [`split_calldata`] when the scheme has one.
pub fn to_verifier_arguments<S: AsRef<str>>(tokens: &[S], scheme: Scheme) -> Result<VerifierArguments> {
    let layout = scheme.layout();
    if tokens.len() < layout.proof_elements {
        return Err(HarnessError::Shape {
            scheme,
            expected: layout.proof_elements,
            actual: tokens.len(),
        });
    }

    let (head, tail) = tokens.split_at(layout.proof_elements);
    let mut head = head.iter().map(|t| t.as_ref());

    let mut proof = Vec::with_capacity(layout.proof_slots.len());
    for slot in layout.proof_slots {
        let value = match slot.shape {
            SlotShape::Opaque => ArgValue::Opaque(opaque(take(&mut head)?)?),
            SlotShape::Array(n) => ArgValue::List(take_fields(&mut head, n)?),
            SlotShape::Matrix(rows, cols) => ArgValue::List(
                (0..rows)
                    .map(|_| take_fields(&mut head, cols).map(ArgValue::List))
                    .collect::<Result<_>>()?,
            ),
        };
        proof.push(value);
    }

    let input = tail
        .iter()
        .map(|token| canonical_decimal(token.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    debug!(%scheme, inputs = input.len(), "verifier arguments assembled");
    Ok(VerifierArguments { scheme, proof, input })
}

fn take<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<&'a str> {
    // the layout's proof_elements equals the sum of its slot widths
    tokens.next().ok_or_else(|| HarnessError::Parse { token: String::new() })
}

fn opaque(token: &str) -> Result<String> {
    match token.strip_prefix("0x") {
        Some(digits) if digits.len() % 2 == 0 && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
            Ok(token.to_string())
        }
        _ => Err(HarnessError::Parse { token: token.to_string() }),
    }
}

fn take_fields<'a>(tokens: &mut impl Iterator<Item = &'a str>, n: usize) -> Result<Vec<ArgValue>> {
    (0..n)
        .map(|_| take(tokens).and_then(canonical_decimal).map(ArgValue::Field))
        .collect()
}

//! Numeric normalization of prover output.
//!
//! Provers emit field elements as strings. [`normalize`] walks an
//! arbitrarily nested proof or signal payload and turns every decimal or
//! `0x`-hex string leaf into a [`BigUint`], leaving everything else alone.
//! Shape is preserved exactly: same nesting, same key order, same lengths.

use num_bigint::BigUint;
use serde_json::{Number, Value};

/// A prover payload after (or before) normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Normalized {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Integer(BigUint),
    Sequence(Vec<Normalized>),
    /// Entries in insertion order.
    Mapping(Vec<(String, Normalized)>),
}

/// Parse a decimal (`^[0-9]+$`) or hex (`^0x[0-9a-fA-F]+$`) numeral.
pub fn parse_numeral(token: &str) -> Option<BigUint> {
    match token.strip_prefix("0x") {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            BigUint::parse_bytes(hex.as_bytes(), 16)
        }
        Some(_) => None,
        None if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) => {
            BigUint::parse_bytes(token.as_bytes(), 10)
        }
        None => None,
    }
}

/// Replace every numeral string leaf with an integer.
pub fn normalize(value: Normalized) -> Normalized {
    match value {
        Normalized::Text(s) => match parse_numeral(&s) {
            Some(n) => Normalized::Integer(n),
            None => Normalized::Text(s),
        },
        Normalized::Sequence(items) => Normalized::Sequence(items.into_iter().map(normalize).collect()),
        Normalized::Mapping(entries) => {
            Normalized::Mapping(entries.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        other => other,
    }
}

/// Normalize a JSON payload as produced by a prover.
pub fn normalize_json(value: &Value) -> Normalized {
    normalize(Normalized::from(value.clone()))
}

impl From<Value> for Normalized {
    /// Lossless lift; no numeral parsing happens here.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Normalized::Null,
            Value::Bool(b) => Normalized::Bool(b),
            Value::Number(n) => Normalized::Number(n),
            Value::String(s) => Normalized::Text(s),
            Value::Array(items) => Normalized::Sequence(items.into_iter().map(Normalized::from).collect()),
            Value::Object(map) => Normalized::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<&Normalized> for Value {
    /// Integers render as decimal strings, the way provers write them.
    fn from(value: &Normalized) -> Self {
        match value {
            Normalized::Null => Value::Null,
            Normalized::Bool(b) => Value::Bool(*b),
            Normalized::Number(n) => Value::Number(n.clone()),
            Normalized::Text(s) => Value::String(s.clone()),
            Normalized::Integer(n) => Value::String(n.to_string()),
            Normalized::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
            Normalized::Mapping(entries) => {
                Value::Object(entries.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect())
            }
        }
    }
}

impl Normalized {
    pub fn get(&self, key: &str) -> Option<&Normalized> {
        match self {
            Normalized::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn at(&self, index: usize) -> Option<&Normalized> {
        match self {
            Normalized::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigUint> {
        match self {
            Normalized::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Normalized]> {
        match self {
            Normalized::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

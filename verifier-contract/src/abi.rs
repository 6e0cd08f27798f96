// Solidity ABI plumbing shared by the contract and its callers.

use ethabi::{ParamType, Token, Uint};
use sha3::{Digest, Keccak256};

use crate::Revert;

pub const GROTH16_VERIFY_SIGNATURE: &str = "verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[])";

/// First four bytes of the keccak hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

pub fn groth16_params() -> Vec<ParamType> {
    let word = || Box::new(ParamType::Uint(256));
    vec![
        ParamType::FixedArray(word(), 2),
        ParamType::FixedArray(Box::new(ParamType::FixedArray(word(), 2)), 2),
        ParamType::FixedArray(word(), 2),
        ParamType::Array(word()),
    ]
}

/// Split calldata into its selector and the encoded arguments.
pub fn split_selector(calldata: &[u8]) -> Result<([u8; 4], &[u8]), Revert> {
    if calldata.len() < 4 {
        return Err(Revert::MalformedCalldata(format!(
            "{} bytes is shorter than a selector",
            calldata.len()
        )));
    }
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&calldata[..4]);
    Ok((sel, &calldata[4..]))
}

/// Solidity-style bool return (32-byte word).
pub fn encode_bool(b: bool) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[31] = b as u8;
    out
}

pub fn decode_bool(word: &[u8]) -> Option<bool> {
    match ethabi::decode(&[ParamType::Bool], word).ok()?.pop()? {
        Token::Bool(b) => Some(b),
        _ => None,
    }
}

pub(crate) fn words<const N: usize>(token: Token) -> Result<[Uint; N], Revert> {
    let malformed = || Revert::MalformedCalldata(format!("expected uint256[{N}]"));
    let Token::FixedArray(items) = token else {
        return Err(malformed());
    };
    if items.len() != N {
        return Err(malformed());
    }
    let mut out = [Uint::zero(); N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.into_uint().ok_or_else(malformed)?;
    }
    Ok(out)
}

pub(crate) fn word_matrix(token: Token) -> Result<[[Uint; 2]; 2], Revert> {
    let malformed = || Revert::MalformedCalldata("expected uint256[2][2]".into());
    let Token::FixedArray(rows) = token else {
        return Err(malformed());
    };
    let [x, y]: [Token; 2] = rows.try_into().map_err(|_| malformed())?;
    Ok([words::<2>(x)?, words::<2>(y)?])
}

pub(crate) fn dynamic_words(token: Token) -> Result<Vec<Uint>, Revert> {
    let malformed = || Revert::MalformedCalldata("expected uint256[]".into());
    let Token::Array(items) = token else {
        return Err(malformed());
    };
    items
        .into_iter()
        .map(|item| item.into_uint().ok_or_else(malformed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_value() {
        // keccak256("transfer(address,uint256)")[..4]
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn bool_word_round_trip() {
        assert_eq!(decode_bool(&encode_bool(true)), Some(true));
        assert_eq!(decode_bool(&encode_bool(false)), Some(false));
        assert_eq!(decode_bool(&[1u8; 4]), None);
    }

    #[test]
    fn short_calldata_has_no_selector() {
        assert!(split_selector(&[0x01, 0x02]).is_err());
    }
}

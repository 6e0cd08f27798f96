//! ABI encoding of [`VerifierArguments`] into a `verifyProof` call.

use ethabi::{Token, Uint};
use verifier_contract::abi::{decode_bool, selector};

use crate::calldata::{ArgValue, VerifierArguments};
use crate::error::{HarnessError, Result};

fn uint(decimal: &str) -> Result<Uint> {
    Uint::from_dec_str(decimal).map_err(|_| HarnessError::Parse { token: decimal.to_string() })
}

fn token(value: &ArgValue) -> Result<Token> {
    Ok(match value {
        ArgValue::Field(decimal) => Token::Uint(uint(decimal)?),
        ArgValue::Opaque(raw) => {
            let bytes = raw
                .strip_prefix("0x")
                .and_then(|digits| hex::decode(digits).ok())
                .ok_or_else(|| HarnessError::Parse { token: raw.clone() })?;
            Token::Bytes(bytes)
        }
        ArgValue::List(items) => Token::FixedArray(items.iter().map(token).collect::<Result<_>>()?),
    })
}

/// Selector followed by the ABI-encoded proof parameters and inputs.
pub fn encode_verify_call(args: &VerifierArguments) -> Result<Vec<u8>> {
    let mut tokens = args.proof.iter().map(token).collect::<Result<Vec<_>>>()?;
    let input = args
        .input
        .iter()
        .map(|s| uint(s).map(Token::Uint))
        .collect::<Result<Vec<_>>>()?;
    tokens.push(Token::Array(input));

    let mut calldata = selector(&args.layout().function_signature()).to_vec();
    calldata.extend(ethabi::encode(&tokens));
    Ok(calldata)
}

pub fn decode_verify_result(word: &[u8]) -> Result<bool> {
    decode_bool(word).ok_or(HarnessError::MalformedReturn)
}

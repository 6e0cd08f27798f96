//! Verification-pipeline harness for zero-knowledge proof circuits.
//!
//! - [`normalize`]: numeral strings in prover output to big integers
//! - [`calldata`]: exported calldata to positional verifier arguments
//! - [`scheme`]: per-scheme argument layouts (Groth16, PLONK)
//! - [`patch`]: pragma and contract-name fixes for generated verifiers
//! - [`protocol`]: positive and negative verifier test cases
//! - [`backend`]: Groth16 bindings to the `prover` and `verifier-contract` crates

pub mod abi;
pub mod backend;
pub mod calldata;
pub mod config;
pub mod error;
pub mod normalize;
pub mod patch;
pub mod protocol;
pub mod scheme;

pub use calldata::{split_calldata, to_argument_vector, to_verifier_arguments, ArgValue, VerifierArguments};
pub use config::{CircuitArtifacts, HarnessConfig};
pub use error::{HarnessError, Result};
pub use normalize::{normalize, normalize_json, Normalized};
pub use patch::{patch_contract, ContractPatcher};
pub use protocol::{run_case, run_negative, run_positive, VerificationCase, WitnessInput};
pub use scheme::Scheme;

use std::fs;
use std::path::{Path, PathBuf};

use prover::artifacts::{PROGRAM_FILE, PROVING_KEY_FILE, VERIFYING_KEY_FILE};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::patch::DEFAULT_TARGET_PRAGMA;

/// Where the harness finds contract sources and circuit artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub contracts_dir: PathBuf,
    pub circuits_dir: PathBuf,
    pub target_pragma: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            contracts_dir: PathBuf::from("contracts"),
            circuits_dir: PathBuf::from("contracts/circuits"),
            target_pragma: DEFAULT_TARGET_PRAGMA.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn artifacts(&self, circuit: &str) -> CircuitArtifacts {
        CircuitArtifacts::in_dir(self.circuits_dir.join(circuit))
    }
}

/// Per-circuit artifact paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitArtifacts {
    pub dir: PathBuf,
    pub program: PathBuf,
    pub proving_key: PathBuf,
    pub verifying_key: PathBuf,
}

impl CircuitArtifacts {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            program: dir.join(PROGRAM_FILE),
            proving_key: dir.join(PROVING_KEY_FILE),
            verifying_key: dir.join(VERIFYING_KEY_FILE),
            dir,
        }
    }
}

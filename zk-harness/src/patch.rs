//! Preparation of generated verifier contract sources.
//!
//! Circuit compilers emit every verifier as `contract Verifier` with a
//! floating `pragma solidity ^X.Y.Z`. Before compiling, each
//! `<Circuit>.sol` gets the project's pragma and a contract named after the
//! circuit. Edits are a list of [`PatchRule`]s applied in order; a rule
//! whose replacement is already in place is a no-op, so patching twice is
//! safe.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{HarnessError, Result};

pub const DEFAULT_TARGET_PRAGMA: &str = "pragma solidity ^0.8.0";
pub const PLACEHOLDER_CONTRACT: &str = "Verifier";

lazy_static! {
    static ref PRAGMA: Regex = Regex::new(r"pragma solidity \^\d+\.\d+\.\d+").expect("pragma pattern");
    static ref PLACEHOLDER: Regex = Regex::new(r"contract Verifier\b").expect("placeholder pattern");
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern");
}

const RESERVED: &[&str] = &[
    "abstract", "address", "anonymous", "as", "assembly", "bool", "break", "bytes", "calldata", "catch",
    "constant", "constructor", "continue", "contract", "delete", "do", "else", "emit", "enum", "error",
    "event", "external", "fallback", "false", "for", "function", "if", "immutable", "import", "indexed",
    "interface", "internal", "is", "library", "mapping", "memory", "modifier", "new", "override",
    "payable", "pragma", "private", "public", "pure", "receive", "return", "returns", "revert",
    "storage", "string", "struct", "super", "this", "true", "try", "type", "uint", "uint256", "int",
    "int256", "unchecked", "using", "view", "virtual", "while",
];

/// Reject circuit names that would not compile as a contract identifier.
pub fn validate_contract_name(name: &str) -> Result<()> {
    if !IDENTIFIER.is_match(name) || RESERVED.contains(&name) {
        return Err(HarnessError::InvalidContractName(name.to_string()));
    }
    Ok(())
}

/// Replace the first match of `pattern` with `replacement`.
#[derive(Debug, Clone)]
pub struct PatchRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: String,
    applied: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Replaced,
    AlreadyApplied,
}

impl PatchRule {
    pub fn new(name: &'static str, pattern: Regex, replacement: impl Into<String>) -> Result<Self> {
        let replacement = replacement.into();
        // identifiers may end in `$`, which `\b` does not treat as a word char
        let applied = Regex::new(&format!(r"{}(?:[^A-Za-z0-9_$]|\z)", regex::escape(&replacement)))?;
        Ok(Self {
            name,
            pattern,
            replacement,
            applied,
        })
    }

    fn apply(&self, source: &str, path: &Path) -> Result<(String, RuleOutcome)> {
        if self.pattern.is_match(source) {
            let patched = self.pattern.replace(source, NoExpand(&self.replacement)).into_owned();
            return Ok((patched, RuleOutcome::Replaced));
        }
        if self.applied.is_match(source) {
            return Ok((source.to_string(), RuleOutcome::AlreadyApplied));
        }
        Err(HarnessError::PatchMatch {
            path: path.to_path_buf(),
            rule: self.name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub circuit: String,
    pub path: PathBuf,
    pub outcomes: Vec<(&'static str, RuleOutcome)>,
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct ContractPatcher {
    target_pragma: String,
}

impl Default for ContractPatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_PRAGMA)
    }
}

impl ContractPatcher {
    pub fn new(target_pragma: impl Into<String>) -> Self {
        Self {
            target_pragma: target_pragma.into(),
        }
    }

    pub fn rules_for(&self, circuit: &str) -> Result<Vec<PatchRule>> {
        validate_contract_name(circuit)?;
        Ok(vec![
            PatchRule::new("pragma", PRAGMA.clone(), self.target_pragma.clone())?,
            PatchRule::new("contract", PLACEHOLDER.clone(), format!("contract {circuit}"))?,
        ])
    }

    /// Patch `<circuit>.sol` in `source_dir` in place.
    pub fn patch_contract(&self, circuit: &str, source_dir: &Path) -> Result<PatchReport> {
        let path = source_dir.join(format!("{circuit}.sol"));
        let rules = self.rules_for(circuit)?;
        let original = fs::read_to_string(&path)?;

        let mut source = original.clone();
        let mut outcomes = Vec::with_capacity(rules.len());
        for rule in &rules {
            let (next, outcome) = rule.apply(&source, &path)?;
            debug!(circuit, rule = rule.name, ?outcome, "patch rule");
            outcomes.push((rule.name, outcome));
            source = next;
        }

        let changed = source != original;
        if changed {
            write_atomically(&path, &source)?;
        }
        info!(circuit, path = %path.display(), changed, "contract source prepared");

        Ok(PatchReport {
            circuit: circuit.to_string(),
            path,
            outcomes,
            changed,
        })
    }

    /// Patch every `.sol` file in `dir`, naming each contract after its file
    /// stem. One file's failure does not stop the others.
    pub fn patch_directory(&self, dir: &Path) -> Result<Vec<(PathBuf, Result<PatchReport>)>> {
        let mut sources = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "sol") {
                sources.push(path);
            }
        }
        sources.sort();

        Ok(sources
            .into_iter()
            .map(|path| {
                let result = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(circuit) => self.patch_contract(circuit, dir),
                    None => Err(HarnessError::InvalidContractName(path.display().to_string())),
                };
                if let Err(e) = &result {
                    warn!(path = %path.display(), error = %e, "failed to patch contract source");
                }
                (path, result)
            })
            .collect())
    }
}

/// Patch `<circuit_name>.sol` in `source_dir` with the default pragma.
pub fn patch_contract(circuit_name: &str, source_dir: &Path) -> Result<PatchReport> {
    ContractPatcher::default().patch_contract(circuit_name, source_dir)
}

// Whole-file replace through a sibling temp file; the original is never
// left half-written and keeps its permissions.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)?.permissions();
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

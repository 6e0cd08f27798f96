mod logging;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use prover::artifacts::CircuitDescriptor;
use tracing::{error, info};
use zk_harness::backend::{DeployedGroth16Verifier, Groth16Backend};
use zk_harness::protocol::ProvingBackend;
use zk_harness::{
    normalize_json, run_case, to_argument_vector, to_verifier_arguments, ContractPatcher, HarnessConfig, Scheme,
    VerificationCase,
};

/// zkcli: zkSNARK proof, calldata and verifier tooling
#[derive(Parser)]
#[command(name = "zkcli")]
#[command(about = "Prove circuits, export verifier calldata and prepare verifier contracts")]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, env = "ZK_CONTRACTS_DIR")]
    contracts_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "ZK_CIRCUITS_DIR")]
    circuits_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Groth16 keys for a product-chain circuit
    Setup {
        #[arg(long)]
        circuit: String,

        /// Input signal names, required for circuits that are not built in
        #[arg(long, value_delimiter = ',')]
        inputs: Vec<String>,
    },
    /// Prove a witness and print the verifier calldata
    Prove {
        #[arg(long)]
        circuit: String,

        /// Witness input as name=value, repeatable
        #[arg(long = "input", value_parser = parse_signal)]
        input: Vec<(String, String)>,

        /// Directory for proof.json and public.json
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the positive and negative verifier cases for a circuit
    Verify {
        #[arg(long)]
        circuit: String,

        #[arg(long = "input", value_parser = parse_signal)]
        input: Vec<(String, String)>,
    },
    /// Pin the pragma and rename `contract Verifier` in every .sol file
    BumpSolidity,
}

fn parse_signal(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    if let Some(dir) = cli.contracts_dir {
        config.contracts_dir = dir;
    }
    if let Some(dir) = cli.circuits_dir {
        config.circuits_dir = dir;
    }

    match cli.command {
        Commands::Setup { circuit, inputs } => {
            let descriptor = if inputs.is_empty() {
                CircuitDescriptor::builtin(&circuit)
                    .with_context(|| format!("{circuit} is not built in; pass --inputs"))?
            } else {
                let names: Vec<&str> = inputs.iter().map(String::as_str).collect();
                CircuitDescriptor::new(&circuit, &names)?
            };
            let artifacts = config.artifacts(&circuit);
            prover::setup(&descriptor, &artifacts.dir)?;
            println!("✅ Keys for {} written to {}", circuit, artifacts.dir.display());
        }

        Commands::Prove { circuit, input, out } => {
            let artifacts = config.artifacts(&circuit);
            let input: BTreeMap<_, _> = input.into_iter().collect();

            let output = Groth16Backend.full_prove(&input, &artifacts.program, &artifacts.proving_key)?;
            let proof = normalize_json(&output.proof);
            let signals = normalize_json(&output.public_signals);
            let calldata = Groth16Backend.export_solidity_calldata(&proof, &signals)?;
            let arguments = to_verifier_arguments(&to_argument_vector(&calldata)?, Scheme::Groth16)?;
            info!(%circuit, inputs = ?arguments.input, "proof exported");

            if let Some(dir) = out {
                fs::create_dir_all(&dir)?;
                fs::write(dir.join("proof.json"), serde_json::to_string_pretty(&output.proof)?)?;
                fs::write(dir.join("public.json"), serde_json::to_string_pretty(&output.public_signals)?)?;
                info!(dir = %dir.display(), "proof and public signals saved");
            }
            println!("{calldata}");
        }

        Commands::Verify { circuit, input } => {
            let artifacts = config.artifacts(&circuit);
            let descriptor = CircuitDescriptor::load(&artifacts.program)?;
            let case = VerificationCase {
                circuit: circuit.clone(),
                scheme: Scheme::Groth16,
                input: input.into_iter().collect(),
                public_signals: descriptor.public_signals(),
                artifacts,
            };

            let report = run_case(&case, &Groth16Backend, || {
                DeployedGroth16Verifier::deploy(&case.artifacts.verifying_key)
            })?;
            println!(
                "✅ {} ({}): valid proof accepted, zero-filled proof rejected; inputs {:?}",
                report.circuit, report.scheme, report.positive.arguments.input
            );
        }

        Commands::BumpSolidity => {
            let patcher = ContractPatcher::new(config.target_pragma.clone());
            let results = patcher.patch_directory(&config.contracts_dir)?;

            let mut failed = 0;
            for (path, result) in &results {
                match result {
                    Ok(report) if report.changed => println!("patched {}", path.display()),
                    Ok(_) => println!("unchanged {}", path.display()),
                    Err(e) => {
                        failed += 1;
                        error!(path = %path.display(), "{e}");
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {} contract sources could not be patched", results.len());
            }
        }
    }

    Ok(())
}

//! ballot-ledger command line.
//!
//! Runs the engine's operations against a configured node and prints the
//! resulting report as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;

use ballot_ledger::blockchain::address;
use ballot_ledger::config::load_or_default;
use ballot_ledger::observability::{init_logging, metrics};
use ballot_ledger::{CandidateRecord, Engine, VoterRecord};

#[derive(Parser)]
#[command(name = "ballot-ledger")]
#[command(about = "Synchronize election records onto the voting contract", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register candidates from a JSON array of {"name": ...}
    SyncCandidates {
        #[arg(short, long)]
        records: PathBuf,
    },
    /// Register voters from a JSON array of {"address": ...}
    SyncVoters {
        #[arg(short, long)]
        records: PathBuf,
    },
    /// Cast one vote
    Vote {
        #[arg(long)]
        voter: String,
        #[arg(long, allow_negative_numbers = true)]
        candidate: i64,
    },
    /// Print tallied results from the contract
    Results,
    /// Validate an address and print its checksum form
    CheckAddress { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let engine = match &cli.command {
        Commands::CheckAddress { address } => {
            println!("{}", address::normalize(address)?);
            return Ok(());
        }
        _ => {
            tracing::info!(rpc_url = %config.ledger.rpc_url, "Connecting to ledger");
            Engine::connect(&config).await?
        }
    };

    match cli.command {
        Commands::SyncCandidates { records } => {
            let records: Vec<CandidateRecord> = read_records(&records)?;
            print_json(&engine.sync_candidates(&records).await)?;
        }
        Commands::SyncVoters { records } => {
            let records: Vec<VoterRecord> = read_records(&records)?;
            print_json(&engine.sync_voters(&records).await)?;
        }
        Commands::Vote { voter, candidate } => {
            print_json(&engine.cast_vote(&voter, candidate).await)?;
        }
        Commands::Results => {
            print_json(&engine.election_results().await?)?;
        }
        Commands::CheckAddress { .. } => {}
    }

    Ok(())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

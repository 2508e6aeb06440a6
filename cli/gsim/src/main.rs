//! gsim CLI — drive the logic simulator from the command line.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gsim::config::CONFIG_FILE_NAME;
use gsim::SimulatorConfig;

#[derive(Parser)]
#[command(name = "gsim", version, about = "Digital logic simulator")]
struct Cli {
    /// Settings file (default: ./gsim.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the truth table of a gate by simulating it
    TruthTable {
        /// Gate (and, nand, or, nor, xor, xnor, not)
        gate: String,
        /// Number of inputs for multi-input gates
        #[arg(long, default_value_t = 2)]
        inputs: u32,
        /// Also enumerate HighZ and Undefined inputs
        #[arg(long)]
        four_state: bool,
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Show the effective simulator settings
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("GSIM_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = match cli.config {
        Some(path) => path,
        None => std::env::current_dir()?.join(CONFIG_FILE_NAME),
    };
    let config = SimulatorConfig::load_or_default(&path)?;
    tracing::debug!(path = %path.display(), ?config, "settings resolved");

    match cli.command {
        Commands::TruthTable {
            gate,
            inputs,
            four_state,
            json,
        } => commands::truth_table::run(config, &gate, inputs, four_state, json),
        Commands::Config => commands::config::run(&config, &path),
    }
}

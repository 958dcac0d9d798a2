//! `vantage` – command-line front end for the selection pipeline.
//!
//! Reads snapshot requests and selection rules from JSON files and prints
//! the reasoner payloads, coordinate views or the resolved target. The
//! configuration lives in `~/.vantage/config.toml` (see `vantage config`).

mod cmd;
mod config;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "vantage", version, about = "Frame-relative object selection")]
struct Cli {
    /// Configuration file (default: ~/.vantage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-frame feature ranks for a request
    Features(cmd::features::FeaturesArgs),
    /// Express objects in a frame's local axes
    Coords(cmd::coords::CoordsArgs),
    /// Resolve a request to a single target id
    Resolve(cmd::resolve::ResolveArgs),
    /// Print the JSON Schema of the selection rule
    Schema(cmd::schema::SchemaArgs),
    /// Show or initialise the configuration file
    Config(cmd::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(config::config_path);

    let (cfg, config_error) = match config::resolve(&path) {
        Ok(cfg) => (cfg, None),
        Err(e) => {
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            (cfg, Some(e))
        }
    };

    let guard = vantage_runtime::init_tracing("vantage", &cfg.telemetry());
    match &config_error {
        Some(e) => warn!(error = %e, "using default configuration"),
        None => debug!(path = %path.display(), "configuration resolved"),
    }
    debug!(exporting = guard.is_exporting(), "tracing initialised");

    let result = match cli.command {
        Commands::Features(args) => cmd::features::run(args, &cfg),
        Commands::Coords(args) => cmd::coords::run(args, &cfg),
        Commands::Resolve(args) => cmd::resolve::run(args, &cfg),
        Commands::Schema(args) => cmd::schema::run(args),
        Commands::Config(args) => cmd::config::run(args, &cfg, &path),
    };
    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red().bold());
        drop(guard);
        process::exit(1);
    }
}

//! `vantage config` -- Show or initialise the configuration file.

use std::path::Path;

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::{self, Config};
use crate::output::print_kv;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (file plus environment overrides)
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs, cfg: &Config, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ConfigAction::Show => {
            print_kv("file:", &path.display().to_string());
            print_kv("exists:", &path.exists().to_string());
            println!();
            print!("{}", toml::to_string_pretty(cfg)?);
            Ok(())
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
            }
            config::save_to(&Config::default(), path)?;
            println!("{} wrote {}", "✓".green(), path.display().to_string().bold());
            Ok(())
        }
    }
}

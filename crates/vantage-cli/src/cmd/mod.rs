//! Subcommand implementations.

pub mod config;
pub mod coords;
pub mod features;
pub mod resolve;
pub mod schema;

use std::fs;
use std::io::Read;

use clap::ValueEnum;
use vantage_types::{ReferenceFrame, SelectionRequest};

/// Read a JSON file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    if path == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}").into())
}

pub(crate) fn read_request(path: &str) -> Result<SelectionRequest, Box<dyn std::error::Error>> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).map_err(|e| format!("invalid request in {path}: {e}").into())
}

/// Frame selector for command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameArg {
    #[value(alias = "user")]
    Primary,
    #[value(alias = "robot")]
    Secondary,
}

impl From<FrameArg> for ReferenceFrame {
    fn from(arg: FrameArg) -> Self {
        match arg {
            FrameArg::Primary => ReferenceFrame::Primary,
            FrameArg::Secondary => ReferenceFrame::Secondary,
        }
    }
}

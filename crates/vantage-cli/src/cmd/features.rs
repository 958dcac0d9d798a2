//! `vantage features` -- Compute per-frame ranks for a request.

use clap::Args;
use colored::Colorize;
use tracing::debug;
use vantage_runtime::{FeatureInput, Scene};
use vantage_types::FrameFeature;

use crate::config::Config;
use crate::output::{header, opt, print_json};

#[derive(Args)]
pub struct FeaturesArgs {
    /// Request JSON file (`-` for stdin)
    request: String,
    /// Print the reasoner payload as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: FeaturesArgs, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let request = super::read_request(&args.request)?;
    let scene = Scene::from_request(&request, &cfg.scene)?;
    let table = scene.feature_table();
    debug!(objects = table.len(), "feature table computed");
    let input = FeatureInput::build(&request.utterance, &table);

    if args.json {
        print_json(&input);
        return Ok(());
    }

    header(&format!(
        "{} object(s), source {:?}",
        scene.objects.len(),
        scene.objects_source
    ));
    for object in &input.objects {
        println!("{}", object.id.cyan().bold());
        for (frame, feature) in &object.features {
            println!("  {:<10} {}", frame.to_string(), describe(feature));
        }
    }
    Ok(())
}

fn describe(f: &FrameFeature) -> String {
    format!(
        "depth {:>3}  right {:>3}  front {:>3}  in_fov {:>5}  reachable {:>5}  side {}",
        opt(f.depth_rank),
        opt(f.right_rank),
        opt(f.front_rank),
        opt(f.in_fov),
        opt(f.reachable),
        opt(f.side),
    )
}

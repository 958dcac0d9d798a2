//! `vantage resolve` -- Run a request through the selection pipeline with a
//! fixed rule (feature flow) or a fixed pick (coordinate flow).

use clap::Args;
use colored::Colorize;
use vantage_runtime::{SelectionPipeline, SelectionResponse, StaticReasoner};
use vantage_types::SelectionSpec;

use super::FrameArg;
use crate::config::Config;
use crate::output::{print_json, print_kv};

#[derive(Args)]
pub struct ResolveArgs {
    /// Request JSON file (`-` for stdin)
    request: String,
    /// Selection rule JSON file
    #[arg(long, required_unless_present = "target", conflicts_with = "target")]
    rule: Option<String>,
    /// Pick this id directly and check it against the object set
    #[arg(long)]
    target: Option<String>,
    /// Frame the direct pick is made in
    #[arg(long, value_enum, requires = "target")]
    frame: Option<FrameArg>,
    /// Print the response envelope as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ResolveArgs, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let request = super::read_request(&args.request)?;

    let result = match (&args.rule, &args.target) {
        (Some(rule_path), _) => {
            let spec = SelectionSpec::from_json(&super::read_input(rule_path)?)?;
            let pipeline = SelectionPipeline::new(cfg.scene.clone(), StaticReasoner::new().with_rule(spec));
            pipeline.run_features(&request).map(|o| SelectionResponse::from(&o))
        }
        (None, Some(target)) => {
            let reasoner = StaticReasoner::new()
                .with_frame(args.frame.unwrap_or(FrameArg::Primary).into())
                .with_target(target.clone());
            let pipeline = SelectionPipeline::new(cfg.scene.clone(), reasoner);
            pipeline.run_coordinates(&request).map(|o| SelectionResponse::from(&o))
        }
        (None, None) => return Err("either --rule or --target is required".into()),
    };

    match result {
        Ok(response) => {
            if args.json {
                print_json(&response);
            } else {
                println!("{} {}", "✓".green(), "target resolved".bold());
                print_kv("target:", &response.target_id.unwrap_or_default());
                if let Some(n) = response.debug.num_objects {
                    print_kv("objects:", &n.to_string());
                }
                if let Some(session) = &response.debug.session_id {
                    print_kv("session:", session);
                }
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                print_json(&SelectionResponse::from_error(&e, request.session_id.clone()));
            }
            Err(e.into())
        }
    }
}

//! `vantage coords` -- Express every object in a frame's local axes.

use clap::Args;
use colored::Colorize;
use vantage_runtime::{CoordinateInput, DualCoordinateInput, Scene};

use super::FrameArg;
use crate::config::Config;
use crate::output::{header, print_json};

#[derive(Args)]
pub struct CoordsArgs {
    /// Request JSON file (`-` for stdin)
    request: String,
    /// Frame to express positions in (default: primary)
    #[arg(long, value_enum)]
    frame: Option<FrameArg>,
    /// Unrounded positions in every available frame instead
    #[arg(long, conflicts_with = "frame")]
    both: bool,
    /// Print the reasoner payload as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CoordsArgs, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let request = super::read_request(&args.request)?;
    let scene = Scene::from_request(&request, &cfg.scene)?;

    if args.both {
        let input = DualCoordinateInput::from_scene(&request.utterance, &scene);
        if args.json {
            print_json(&input);
            return Ok(());
        }
        header("world / per-frame positions");
        for o in &input.objects {
            let secondary = o
                .pos_secondary
                .map(|p| format!("{:?}", p.to_array()))
                .unwrap_or_else(|| "-".dimmed().to_string());
            println!(
                "{:<12} world {:?}  primary {:?}  secondary {}",
                o.id.cyan(),
                o.pos_world.to_array(),
                o.pos_primary.to_array(),
                secondary
            );
        }
        return Ok(());
    }

    let frame = args.frame.unwrap_or(FrameArg::Primary);
    let input = CoordinateInput::from_scene(&request.utterance, &scene, frame.into())?;
    if args.json {
        print_json(&input);
        return Ok(());
    }
    header(&format!("positions in the {} frame (x right, y up, z forward)", input.input_frame));
    for o in &input.objects {
        println!(
            "{:<12} {:>7.2} {:>7.2} {:>7.2}   dist {:>5.2}   angle {:>5.1}°",
            o.id.cyan(),
            o.pos_local[0],
            o.pos_local[1],
            o.pos_local[2],
            o.distance,
            o.angle_from_forward_deg
        );
    }
    Ok(())
}

//! Face direction tracker: reads landmark frames and prints directions and key events.

use anyhow::{Context, Result};
use clap::Parser;
use face_direction::{
    app::{load_config, App},
    config::EXAMPLE_CONFIG,
    frame_source::FrameReader,
    landmarks::LandmarkFrame,
};
use log::info;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON Lines file of landmark frames (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Emit simulated key events for the active direction
    #[arg(short, long)]
    keys: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Face Direction Tracker");

    let mut config = load_config(args.config.as_deref());
    if args.keys {
        config.keys.enabled = true;
    }

    let frames: Box<dyn Iterator<Item = face_direction::Result<LandmarkFrame>>> = match &args.input {
        Some(path) => Box::new(
            FrameReader::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(FrameReader::stdin()),
    };

    let mut app = App::new(&config, io::stdout().lock()).context("Invalid configuration")?;
    app.run(frames)?;
    Ok(())
}

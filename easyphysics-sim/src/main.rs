use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use easyphysics_sim::{run_scene, Scene, SceneKind};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs an EasyPhysics scene headless and prints its frames as JSON lines", long_about = None)]
struct Args {
    /// Scene to run
    #[arg(short, long, value_enum, default_value_t = SceneKind::Flocking)]
    scene: SceneKind,

    /// JSON settings file (defaults are used when omitted)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 100)]
    ticks: u64,

    /// Seed for the random generator (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// World height divided by world width
    #[arg(short, long, default_value_t = 1.0)]
    aspect: f64,

    /// Print a frame every N ticks
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Scene: {:?}, seed: {}", args.scene, seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut scene = Scene::from_file(args.scene, args.settings.as_deref(), args.aspect, &mut rng)
        .context("Failed to initialize scene")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let frames = run_scene(&mut scene, args.ticks, args.every, &mut rng, &mut out)
        .context("Simulation error")?;

    log::info!("Done: {} ticks, {} frames", args.ticks, frames);
    Ok(())
}

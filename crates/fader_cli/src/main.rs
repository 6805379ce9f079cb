//! Fader CLI
//!
//! Play scripted fade scenes in virtual or real time.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod player;
mod scene;

use player::PlayOptions;
use scene::Scene;

#[derive(Parser)]
#[command(name = "fader")]
#[command(author, version, about = "Fader - scripted opacity fades", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scene and print the final element styles
    Play {
        /// Scene file
        scene: PathBuf,

        /// Seed for random drift
        #[arg(long)]
        seed: Option<u64>,

        /// Wait out every deadline on the wall clock
        #[arg(long)]
        realtime: bool,

        /// Print element styles after every deadline
        #[arg(long)]
        frames: bool,

        /// Stop after this much scene time
        #[arg(long, default_value = "60000")]
        limit_ms: u64,
    },

    /// Parse and validate a scene without playing it
    Check {
        /// Scene file
        scene: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Commands::Play {
            scene,
            seed,
            realtime,
            frames,
            limit_ms,
        } => cmd_play(scene, seed, realtime, frames, limit_ms).await,
        Commands::Check { scene } => cmd_check(scene),
    }
}

async fn cmd_play(
    path: PathBuf,
    seed: Option<u64>,
    realtime: bool,
    frames: bool,
    limit_ms: u64,
) -> Result<()> {
    let scene = Scene::load(&path)?;
    info!("Playing {}", path.display());

    for id in scene.unknown_targets() {
        warn!("Step target '{}' names no element", id);
    }

    let options = PlayOptions {
        seed,
        realtime,
        frames,
        limit_ms,
    };
    let report = player::play(&scene, &options).await?;
    report.print();

    Ok(())
}

fn cmd_check(path: PathBuf) -> Result<()> {
    let scene = Scene::load(&path)?;

    let unknown = scene.unknown_targets();
    for id in &unknown {
        warn!("Step target '{}' names no element", id);
    }

    println!(
        "{}: {} elements, {} steps, {} unknown targets",
        path.display(),
        scene.elements.len(),
        scene.steps.len(),
        unknown.len()
    );

    Ok(())
}

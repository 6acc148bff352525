//! Tickflow - CLI
//!
//! Drives a scripted demo scene through a fixed-step host loop.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tickflow::util::logger::{self, LogLevel};
use tickflow::{from_fn, CoroutineManager, SchedulerConfig, Sequence, Step, SuspensionPredicate, Yield, NAME, VERSION};

/// Frame-driven cooperative coroutine scheduler
#[derive(Parser, Debug)]
#[command(name = "tickflow")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the demo scene
    Demo {
        /// Maximum number of frames to simulate
        #[arg(short, long, default_value_t = 600)]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// Scheduler config file (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Demo { frames, dt, config } => {
            let config = match config {
                Some(path) => SchedulerConfig::load(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                None => SchedulerConfig::default(),
            };
            let level = if args.verbose { LogLevel::Debug } else { config.log_level };
            logger::init_with_level(level).context("Failed to install logger")?;
            run_demo(config, frames, dt)?;
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}

/// Scene transition: fade out, wait for a background load, blink, fade in.
fn run_demo(
    config: SchedulerConfig,
    frames: u32,
    dt: f64,
) -> Result<()> {
    let mut manager = CoroutineManager::with_config(config);

    let loading = Rc::new(Cell::new(true));
    let mut chunks_left = 20;
    let loader_flag = loading.clone();
    manager.start(from_fn(move || {
        if chunks_left == 0 {
            loader_flag.set(false);
            info!("assets loaded");
            return Ok(Step::Finished);
        }
        chunks_left -= 1;
        Ok(Step::tick())
    }));

    let mut blinks = 0;
    let blink = from_fn(move || {
        blinks += 1;
        info!(blinks, "blink");
        Ok(if blinks < 3 { Step::yielded(SuspensionPredicate::seconds(0.1)) } else { Step::Finished })
    });

    let waiting = loading.clone();
    manager.start(
        Sequence::new()
            .yielding(|| {
                info!("fade out");
                SuspensionPredicate::seconds(0.5).into()
            })
            .yielding(move || {
                info!("waiting for assets");
                SuspensionPredicate::while_(move || waiting.get()).into()
            })
            .yielding(move || Yield::sequence(blink))
            .finish(|| info!("fade in")),
    );

    for frame in 0..frames {
        manager.update(dt).with_context(|| format!("Frame {} failed", frame))?;
        if manager.active_count() == 0 {
            info!(frame, "scene settled");
            break;
        }
    }

    let stats = manager.stats();
    info!(
        ticks = stats.ticks,
        completed = stats.completed,
        simulated = stats.total_time,
        "demo finished"
    );
    Ok(())
}

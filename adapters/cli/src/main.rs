#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane War match.

mod script;
mod summary;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use lanewar_session::{Capabilities, Session, SessionConfig};
use lanewar_world::WorldConfig;

use script::Script;
use summary::Summary;

/// Headless Lane War combat simulation.
#[derive(Debug, Parser)]
#[command(name = "lanewar", version, about)]
struct Args {
    /// TOML world configuration; the built-in three-lane arena when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_000)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    dt_ms: u64,
    /// Overrides the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Scripted player behaviour.
    #[arg(long, value_enum, default_value_t = Script::Idle)]
    script: Script,
}

/// Entry point for the Lane War command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.dt_ms > 0, "--dt-ms must be positive");

    let mut world = match &args.config {
        Some(path) => WorldConfig::load(path)
            .with_context(|| format!("loading world config from {}", path.display()))?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        world = world.with_seed(seed);
    }
    log::info!(
        "running {} ticks of {} ms with the {:?} script",
        args.ticks,
        args.dt_ms,
        args.script
    );

    let mut session = Session::new(SessionConfig::with_world(world), Capabilities::default());
    let dt = Duration::from_millis(args.dt_ms);
    let mut summary = Summary::default();
    for tick in 0..args.ticks {
        let input = args.script.input(tick, dt, session.world());
        let frame = session.tick(dt, &input);
        summary.record(&frame);
    }

    println!("{}", summary.report(&session));
    Ok(())
}

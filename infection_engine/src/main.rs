//! Command line runner.
//!
//! Loads a TOML configuration, applies command line overrides and runs the simulation
//! until it ends, optionally drawing the grid after every tick.

use clap::Parser;
use infection_engine::replay::save_history_csv;
use infection_engine::{PolicyKind, Simulation, SimulationConfig};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Infection simulation runner
#[derive(Parser, Debug)]
#[command(name = "infection")]
#[command(about = "Run a two-team infection simulation on a square grid")]
struct Args {
    /// TOML configuration file, defaults are used when missing
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before the simulation ends
    #[arg(long)]
    max_ticks: Option<usize>,

    /// Decision policy: infection or energy
    #[arg(long, value_parser = parse_policy)]
    policy: Option<PolicyKind>,

    /// Board layout file (`size N` followed by `m <row>` lines)
    #[arg(long)]
    board: Option<PathBuf>,

    /// Where to write the JSON replay
    #[arg(long)]
    replay: Option<String>,

    /// Where to write the cell histories as CSV
    #[arg(long)]
    history: Option<String>,

    /// Draw the grid in the terminal after every tick
    #[arg(long)]
    draw: bool,

    /// Pause between ticks in milliseconds, only used when drawing
    #[arg(long)]
    delay_ms: Option<u64>,
}

fn parse_policy(value: &str) -> Result<PolicyKind, String> {
    match value {
        "infection" => Ok(PolicyKind::Infection),
        "energy" => Ok(PolicyKind::Energy),
        _ => Err(format!("unknown policy `{}`, expected infection or energy", value)),
    }
}

fn load_config(args: &Args) -> infection_engine::Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(path) = &args.board {
        config.board = Some(std::fs::read_to_string(path)?);
    }
    if let Some(replay) = &args.replay {
        config.replay_filename = Some(replay.clone());
    }
    if let Some(history) = &args.history {
        config.history_filename = Some(history.clone());
    }
    if let Some(delay_ms) = args.delay_ms {
        config.tick_delay_ms = delay_ms;
    }

    Ok(config)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut simulation = match Simulation::from_config(&config) {
        Ok(simulation) => simulation,
        Err(e) => {
            tracing::error!(error = %e, "Could not set up the simulation");
            return ExitCode::FAILURE;
        }
    };

    let delay = Duration::from_millis(config.tick_delay_ms);
    simulation.start();
    if args.draw {
        if let Err(e) = simulation.draw() {
            tracing::warn!(error = %e, "Could not draw the grid");
        }
    }

    let result = simulation.run(|simulation| {
        if args.draw {
            if let Err(e) = simulation.draw() {
                tracing::warn!(error = %e, "Could not draw the grid");
            }
            thread::sleep(delay);
        }
        ControlFlow::Continue(())
    });

    let state = match result {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Simulation failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        tick = state.tick,
        red = state.score.red,
        blue = state.score.blue,
        outcome = ?state.outcome,
        "Final result"
    );

    // The in-memory result stands even when an output cannot be written
    let mut exit_code = ExitCode::SUCCESS;
    if let Err(e) = simulation.save_replay() {
        tracing::error!(error = %e, "Could not save the replay");
        exit_code = ExitCode::FAILURE;
    }

    if let Some(path) = &config.history_filename {
        match save_history_csv(simulation.grid(), path) {
            Ok(()) => tracing::info!(path = %path, "History saved"),
            Err(e) => {
                tracing::error!(error = %e, path = %path, "Could not save the history");
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

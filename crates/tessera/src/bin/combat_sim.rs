//! # Combat Simulation
//!
//! Headless runner for the combat ring.
//!
//! Usage: `combat_sim [config.toml]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`; `debug` prints every hit).

use std::process::ExitCode;

use tessera::{CombatConfig, Simulation};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => CombatConfig::load(&path),
        None => Ok(CombatConfig::default()),
    };

    let result = config
        .and_then(|config| Simulation::new(&config))
        .and_then(|mut sim| sim.run());

    match result {
        Ok(summary) => {
            println!(
                "rounds: {}  kills: {}  survivors: {}",
                summary.rounds_played,
                summary.total_kills,
                summary.survivors.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("combat_sim failed: {e}");
            ExitCode::FAILURE
        }
    }
}

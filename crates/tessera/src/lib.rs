//! # Tessera
//!
//! Combat simulation on top of [`tessera_core`]:
//! - [`combat`]: combat components plus the systems that fight and reap
//! - [`simulation`]: seeded ring of combatants played round by round
//! - [`config`]: TOML run parameters
//!
//! ```rust,ignore
//! use tessera::{CombatConfig, Simulation};
//!
//! let mut sim = Simulation::new(&CombatConfig::default())?;
//! let summary = sim.run()?;
//! println!("{:?}", summary.winner());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub use tessera_core as ecs;

pub mod combat;
pub mod config;
pub mod simulation;

pub use combat::{Combat, CombatSystem, Health, ReaperSystem, Status};
pub use config::CombatConfig;
pub use simulation::{RoundReport, Simulation, Summary};

//! # Simulation
//!
//! Spawns a ring of combatants, each aiming at the next, and plays rounds
//! until one is left or the round budget runs out. All randomness comes from
//! one seeded ChaCha stream, so a seed fully determines a run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::{EcsResult, Entity, World};

use crate::combat::{self, Combat, CombatSystem, Health, ReaperSystem, Status};
use crate::config::CombatConfig;

/// Fixed step passed to the systems each round.
const ROUND_DELTA: f32 = 1.0;

/// Outcome of one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: u32,
    /// Hits landed.
    pub hits: u32,
    /// Combatants killed.
    pub kills: u32,
    /// Combatants alive after the round.
    pub survivors: usize,
}

/// Outcome of a whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Rounds actually played.
    pub rounds_played: u32,
    /// Kills over the whole run.
    pub total_kills: u32,
    /// Combatants still alive, in handle order.
    pub survivors: Vec<Entity>,
}

impl Summary {
    /// The last combatant standing, if exactly one is left.
    #[must_use]
    pub fn winner(&self) -> Option<Entity> {
        match self.survivors.as_slice() {
            [winner] => Some(*winner),
            _ => None,
        }
    }
}

/// A world populated with combatants.
pub struct Simulation {
    world: World,
    rounds: u32,
    played: u32,
}

impl Simulation {
    /// Builds the world and spawns the ring.
    ///
    /// # Errors
    ///
    /// [`tessera_core::EcsError::InvalidConfig`] for a bad config, or any
    /// world error while spawning.
    pub fn new(config: &CombatConfig) -> EcsResult<Self> {
        config.validate()?;

        let mut world = World::with_config(&config.world)?;
        combat::install(&mut world)?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let ring = (0..config.entities)
            .map(|_| world.create_entity())
            .collect::<EcsResult<Vec<_>>>()?;

        for (i, &e) in ring.iter().enumerate() {
            let target = ring[(i + 1) % ring.len()];
            let attack_damage = rng.gen_range(config.damage_range());
            let health = rng.gen_range(config.health_range());

            world.add_component(e, Health::full(health))?;
            world.add_component(e, Status { alive: true })?;
            world.add_component(e, Combat { target, attack_damage })?;
            tracing::debug!(
                "{e} spawned: health {health}, damage {attack_damage}, target {target}"
            );
        }

        tracing::info!(
            "Spawned {} combatants in world '{}' (seed {})",
            ring.len(),
            world.label(),
            config.seed
        );

        Ok(Self {
            world,
            rounds: config.rounds,
            played: 0,
        })
    }

    /// The underlying world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for callers that want to intervene between rounds.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Rounds played so far.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.played
    }

    /// Plays one round: combat, then the reaper.
    ///
    /// # Errors
    ///
    /// Propagates any system failure.
    pub fn run_round(&mut self) -> EcsResult<RoundReport> {
        self.world.run_systems(ROUND_DELTA)?;
        self.played += 1;

        let combat = self.world.system::<CombatSystem>()?;
        let report = RoundReport {
            round: self.played,
            hits: combat.hits,
            kills: combat.kills,
            survivors: self.world.alive_count(),
        };
        let reaped = self.world.system::<ReaperSystem>()?.reaped.len();

        tracing::info!(
            "Round {}: {} hits, {} kills, {} reaped, {} left",
            report.round,
            report.hits,
            report.kills,
            reaped,
            report.survivors
        );
        Ok(report)
    }

    /// Plays rounds until one combatant is left or the budget runs out.
    ///
    /// # Errors
    ///
    /// Propagates any system failure.
    pub fn run(&mut self) -> EcsResult<Summary> {
        let mut total_kills = 0;
        while self.played < self.rounds && self.world.alive_count() > 1 {
            total_kills += self.run_round()?.kills;
        }

        let summary = Summary {
            rounds_played: self.played,
            total_kills,
            survivors: self.world.entities().collect(),
        };
        match summary.winner() {
            Some(winner) => tracing::info!("{winner} wins after {} rounds", summary.rounds_played),
            None => tracing::info!(
                "{} combatants still standing after {} rounds",
                summary.survivors.len(),
                summary.rounds_played
            ),
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> CombatConfig {
        CombatConfig {
            entities: 6,
            rounds: 500,
            seed,
            ..CombatConfig::default()
        }
    }

    #[test]
    fn test_ring_targets_next() {
        let sim = Simulation::new(&small(1)).unwrap();
        let world = sim.world();
        let ring: Vec<Entity> = world.entities().collect();
        assert_eq!(ring.len(), 6);
        for (i, &e) in ring.iter().enumerate() {
            let combat = world.get_component::<Combat>(e).unwrap();
            assert_eq!(combat.target, ring[(i + 1) % ring.len()]);
            assert!((15..=114).contains(&combat.attack_damage));
        }
        assert_eq!(world.interest_set::<CombatSystem>().unwrap().len(), 6);
    }

    #[test]
    fn test_round_counts_hits() {
        let mut sim = Simulation::new(&small(2)).unwrap();
        let report = sim.run_round().unwrap();
        assert_eq!(report.round, 1);
        // Nobody can die in the first round: max damage is below min health.
        assert_eq!(report.hits, 6);
        assert_eq!(report.kills, 0);
        assert_eq!(report.survivors, 6);
    }
}

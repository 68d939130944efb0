//! # Simulation Configuration
//!
//! ```toml
//! entities = 100
//! rounds = 50
//! seed = 7
//!
//! [world]
//! label = "arena"
//! entity_capacity = 1024
//! ```

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_core::{EcsError, EcsResult, WorldConfig};

/// Parameters of one combat run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatConfig {
    /// Combatants spawned in the ring.
    pub entities: usize,
    /// Upper bound on rounds; the run stops early once one combatant is left.
    pub rounds: u32,
    /// RNG seed; equal seeds give equal runs.
    pub seed: u64,
    /// Lowest damage per hit.
    pub min_damage: i32,
    /// Highest damage per hit.
    pub max_damage: i32,
    /// Lowest starting health.
    pub min_health: i32,
    /// Highest starting health.
    pub max_health: i32,
    /// World the combatants live in.
    pub world: WorldConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            entities: 100,
            rounds: 50,
            seed: 0,
            min_damage: 15,
            max_damage: 114,
            min_health: 1000,
            max_health: 2199,
            world: WorldConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] on malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks ranges and that the ring fits in the world.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> EcsResult<()> {
        self.world.validate()?;
        if self.entities < 2 {
            return Err(EcsError::InvalidConfig(format!(
                "entities must be at least 2, got {}",
                self.entities
            )));
        }
        if self.entities > self.world.entity_capacity {
            return Err(EcsError::InvalidConfig(format!(
                "entities ({}) exceeds world.entity_capacity ({})",
                self.entities, self.world.entity_capacity
            )));
        }
        if self.min_damage <= 0 || self.min_damage > self.max_damage {
            return Err(EcsError::InvalidConfig(format!(
                "damage range {}..={} is empty or not positive",
                self.min_damage, self.max_damage
            )));
        }
        if self.min_health <= 0 || self.min_health > self.max_health {
            return Err(EcsError::InvalidConfig(format!(
                "health range {}..={} is empty or not positive",
                self.min_health, self.max_health
            )));
        }
        Ok(())
    }

    /// Damage roll range.
    #[must_use]
    pub fn damage_range(&self) -> RangeInclusive<i32> {
        self.min_damage..=self.max_damage
    }

    /// Health roll range.
    #[must_use]
    pub fn health_range(&self) -> RangeInclusive<i32> {
        self.min_health..=self.max_health
    }
}

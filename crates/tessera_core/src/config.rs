//! # World Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file yields a full-capacity world.
//!
//! ```toml
//! label = "arena"
//! entity_capacity = 4096
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ecs::MAX_ENTITY_COUNT;
use crate::error::{EcsError, EcsResult};

/// Parameters fixed at world creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Name attached to the world's log events.
    pub label: String,
    /// Maximum number of live entities, at most [`MAX_ENTITY_COUNT`].
    pub entity_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            label: "world".to_owned(),
            entity_capacity: MAX_ENTITY_COUNT,
        }
    }
}

impl WorldConfig {
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

    /// Checks the values against the fixed ceilings.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if `entity_capacity` is zero or above
    /// [`MAX_ENTITY_COUNT`].
    pub fn validate(&self) -> EcsResult<()> {
        if self.entity_capacity == 0 || self.entity_capacity > MAX_ENTITY_COUNT {
            return Err(EcsError::InvalidConfig(format!(
                "entity_capacity must be in 1..={MAX_ENTITY_COUNT}, got {}",
                self.entity_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.entity_capacity, MAX_ENTITY_COUNT);
    }

    #[test]
    fn test_parse_fields() {
        let config =
            WorldConfig::from_toml_str("label = \"arena\"\nentity_capacity = 128\n").unwrap();
        assert_eq!(config.label, "arena");
        assert_eq!(config.entity_capacity, 128);
    }

    #[test]
    fn test_rejects_bad_capacity() {
        assert!(matches!(
            WorldConfig::from_toml_str("entity_capacity = 0"),
            Err(EcsError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("entity_capacity = 65536"),
            Err(EcsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(WorldConfig::from_toml_str("capacity = 12").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            WorldConfig::load("/definitely/not/here.toml"),
            Err(EcsError::InvalidConfig(_))
        ));
    }
}

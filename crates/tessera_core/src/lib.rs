//! # Tessera Core Engine
//!
//! Fixed-capacity Entity Component System:
//! - Up to 65,535 live entities per world
//! - Up to 32 component types, matched through 32-bit signatures
//! - O(1) component add/remove over packed arrays
//!
//! ## Architecture Rules
//!
//! 1. **No allocations per entity** - entity and component storage is pre-allocated
//! 2. **Data-oriented design** - components of one type sit in one contiguous array
//! 3. **One world, one owner** - the world is an explicit value, never a global
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_core::{World, WorldConfig};
//!
//! let mut world = World::with_config(&WorldConfig::load("world.toml")?)?;
//! world.register_component::<Health>()?;
//! let e = world.create_entity()?;
//! world.add_component(e, Health { max: 100, current: 100 })?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod sync;

pub use config::WorldConfig;
pub use ecs::{
    Component, ComponentStore, ComponentTypeId, Entity, Notification, NotificationType,
    Signature, System, SystemId, World, MAX_COMPONENT_TYPES, MAX_ENTITY_COUNT,
};
pub use error::{EcsError, EcsResult};
pub use sync::SharedWorld;

//! # Entity Component System
//!
//! A fixed-capacity ECS built from four parts:
//!
//! - [`EntityRegistry`]: handle pool and per-entity signatures
//! - [`ComponentStore`]: one packed array per component type
//! - [`SystemRegistry`]: systems, their signatures and interest sets
//! - [`Notification`]: the fan-out that keeps the other three consistent
//!
//! [`World`] owns one of each and is the only entry point for mutation.
//!
//! ## Design Philosophy
//!
//! - All per-entity storage is pre-allocated at world creation
//! - Components live in dense arrays, removed by swap-with-last
//! - Types map to dense indices at registration, never by name
//! - Contract violations are returned as errors, never ignored

mod component;
mod entity;
mod notify;
mod signature;
mod storage;
mod system;
mod world;

pub use component::{Component, ComponentRegistry, ComponentTypeId};
pub use entity::{Entity, EntityRegistry, MAX_ENTITY_COUNT};
pub use notify::{Listener, Notification, NotificationType};
pub use signature::{Signature, MAX_COMPONENT_TYPES};
pub use storage::ComponentStore;
pub use system::{System, SystemId, SystemRegistry};
pub use world::World;

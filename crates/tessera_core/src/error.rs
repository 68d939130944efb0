//! # ECS Error Types
//!
//! Every error here is a broken calling contract, never a transient runtime
//! condition. Callers propagate them with `?` and stop the frame loop.

use thiserror::Error;

use crate::ecs::Entity;

/// Contract violations reported by the ECS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Every entity handle is live.
    #[error("entity capacity exceeded: all {capacity} handles are live")]
    EntityCapacityExceeded {
        /// Configured entity capacity.
        capacity: usize,
    },

    /// Every signature bit is taken.
    #[error("component type limit reached: cannot register {component}, {limit} types already registered")]
    ComponentTypeLimit {
        /// Type that was being registered.
        component: &'static str,
        /// Fixed signature width.
        limit: usize,
    },

    /// The entity already owns a component of this type.
    #[error("duplicate component: {entity} already owns a {component}")]
    DuplicateComponent {
        /// Offending entity.
        entity: Entity,
        /// Component type label.
        component: &'static str,
    },

    /// The entity does not own a component of this type.
    #[error("missing component: {entity} does not own a {component}")]
    MissingComponent {
        /// Offending entity.
        entity: Entity,
        /// Component type label.
        component: &'static str,
    },

    /// The component type was never registered with this world.
    #[error("unregistered component type: {component}")]
    UnregisteredComponent {
        /// Component type label.
        component: &'static str,
    },

    /// The system type was never registered with this world.
    #[error("unregistered system type: {system}")]
    UnregisteredSystem {
        /// System type label.
        system: &'static str,
    },

    /// The handle lies outside the range this world can issue.
    #[error("entity out of range: {entity} exceeds capacity {capacity}")]
    EntityOutOfRange {
        /// Offending entity.
        entity: Entity,
        /// Configured entity capacity.
        capacity: usize,
    },

    /// The handle is in range but not currently live.
    #[error("entity not alive: {entity} is not a live handle")]
    EntityNotAlive {
        /// Offending entity.
        entity: Entity,
    },

    /// The system is checked out for its own update.
    #[error("system busy: {system} is running its update")]
    SystemBusy {
        /// System type label.
        system: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;

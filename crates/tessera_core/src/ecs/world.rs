//! # ECS World
//!
//! The explicit context that owns the entity registry, the component
//! registry and the system registry. Every mutation goes through the world,
//! which applies it and then broadcasts the matching [`Notification`] in the
//! documented order. Independent worlds share nothing.

use std::any::type_name;
use std::collections::BTreeSet;

use super::component::{Component, ComponentRegistry, ComponentTypeId};
use super::entity::{Entity, EntityRegistry};
use super::notify::{Listener, Notification};
use super::signature::Signature;
use super::storage::ComponentStore;
use super::system::{System, SystemId, SystemRegistry};
use crate::config::WorldConfig;
use crate::error::EcsResult;
#[cfg(doc)]
use crate::error::EcsError;

/// The ECS World - container for all entities, components and systems.
///
/// All entity and component storage is pre-allocated when the world and each
/// component type are created. Creating and destroying entities and adding
/// and removing components never allocate.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new();
/// world.register_component::<Health>()?;
/// world.register_system::<Regen>()?;
/// world.track_component::<Regen, Health>()?;
///
/// let e = world.create_entity()?;
/// world.add_component(e, Health { max: 100, current: 50 })?;
/// world.update_system::<Regen>(1.0 / 60.0)?;
/// ```
pub struct World {
    label: String,
    entities: EntityRegistry,
    components: ComponentRegistry,
    systems: SystemRegistry,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(&WorldConfig::default())
    }

    /// Creates a world from a configuration.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the configuration fails validation.
    pub fn with_config(config: &WorldConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Creates a world holding up to `capacity` live entities.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if capacity is zero or exceeds
    /// [`MAX_ENTITY_COUNT`](super::MAX_ENTITY_COUNT).
    pub fn with_capacity(capacity: usize) -> EcsResult<Self> {
        Self::with_config(&WorldConfig {
            entity_capacity: capacity,
            ..WorldConfig::default()
        })
    }

    fn build(config: &WorldConfig) -> Self {
        tracing::debug!(world = %config.label, capacity = config.entity_capacity, "creating world");
        Self {
            label: config.label.clone(),
            entities: EntityRegistry::new(config.entity_capacity),
            components: ComponentRegistry::new(config.entity_capacity),
            systems: SystemRegistry::new(),
        }
    }

    /// Returns the label used in this world's log events.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Checks if an entity handle is live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Iterates over all live entities in handle order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive().map(|(entity, _)| entity)
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Registers a component type. Registering a known type is a no-op.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentTypeLimit`] if all signature bits are taken.
    pub fn register_component<C: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let result = self.components.register::<C>();
        self.check(result)
    }

    /// Returns the ID assigned to a registered component type.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    pub fn component_type<C: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.check(self.components.id_of::<C>())
    }

    /// Number of registered component types.
    #[inline]
    #[must_use]
    pub fn component_type_count(&self) -> usize {
        self.components.len()
    }

    /// Registers a system built with `S::default()` and returns it.
    ///
    /// Registering a known type returns the existing instance.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemBusy`] if `S` is registered and currently running.
    pub fn register_system<S: System + Default>(&mut self) -> EcsResult<&mut S> {
        self.register_system_with(S::default)
    }

    /// Registers a system built by `make` and returns it.
    ///
    /// `make` only runs on first registration; afterwards the existing
    /// instance is returned.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemBusy`] if `S` is registered and currently running.
    pub fn register_system_with<S: System>(
        &mut self,
        make: impl FnOnce() -> S,
    ) -> EcsResult<&mut S> {
        self.systems.register(make, self.entities.iter_alive());
        let result = self.systems.get_mut::<S>();
        if let Err(err) = &result {
            tracing::error!(world = %self.label, %err, "ecs contract violation");
        }
        result
    }

    /// Adds `C` to the signature of `S`.
    ///
    /// Every live entity is re-scanned against the updated signature, so
    /// tracking may be declared at any time, before or after entities gain
    /// components.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] or [`EcsError::UnregisteredSystem`].
    pub fn track_component<S: System, C: Component>(&mut self) -> EcsResult<()> {
        let id = self.check(self.components.id_of::<C>())?;
        let result = self.systems.track::<S>(id, self.entities.iter_alive());
        self.check(result)?;
        tracing::debug!(
            world = %self.label,
            system = type_name::<S>(),
            component = type_name::<C>(),
            "system tracks component"
        );
        Ok(())
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Returns the registered instance of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`], or [`EcsError::SystemBusy`] while `S`
    /// is running.
    pub fn system<S: System>(&self) -> EcsResult<&S> {
        self.check(self.systems.get::<S>())
    }

    /// Returns the registered instance of `S` mutably.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`], or [`EcsError::SystemBusy`] while `S`
    /// is running.
    pub fn system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        let result = self.systems.get_mut::<S>();
        if let Err(err) = &result {
            tracing::error!(world = %self.label, %err, "ecs contract violation");
        }
        result
    }

    /// Returns the signature of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn system_signature<S: System>(&self) -> EcsResult<Signature> {
        self.check(self.systems.signature::<S>())
    }

    /// Returns the live interest set of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn interest_set<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        self.check(self.systems.interest_set::<S>())
    }

    // =========================================================================
    // Entities and components
    // =========================================================================

    /// Creates an entity with an empty signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityCapacityExceeded`] if every handle is live.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let result = self.entities.create();
        let entity = self.check(result)?;
        // Systems with an empty signature match every entity.
        self.broadcast(&Notification::ComponentChanged {
            entity,
            signature: Signature::EMPTY,
        });
        Ok(entity)
    }

    /// Destroys an entity.
    ///
    /// Systems drop it first, then every store releases its data, then the
    /// handle returns to the back of the free-list.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityOutOfRange`] or [`EcsError::EntityNotAlive`].
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.check(self.entities.check_alive(entity))?;

        self.broadcast(&Notification::EntityDestroyed { entity });
        let result = self.entities.release(entity);
        self.check(result)
    }

    /// Destroys every live entity. Registrations are kept.
    pub fn clear(&mut self) {
        let live: Vec<Entity> = self.entities().collect();
        for entity in live {
            self.broadcast(&Notification::EntityDestroyed { entity });
            let released = self.entities.release(entity);
            let released = self.check(released);
            debug_assert!(released.is_ok(), "{entity} came from the live set");
        }
        tracing::debug!(world = %self.label, "cleared all entities");
    }

    /// Returns the signature of a live entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityOutOfRange`] or [`EcsError::EntityNotAlive`].
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.check(self.entities.signature(entity))
    }

    /// Adds a component to a live entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`], [`EcsError::EntityOutOfRange`],
    /// [`EcsError::EntityNotAlive`] or [`EcsError::DuplicateComponent`].
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> EcsResult<()> {
        let id = self.check(self.components.id_of::<C>())?;
        self.check(self.entities.check_alive(entity))?;

        let result = self
            .components
            .store_mut::<C>()
            .and_then(|store| store.insert(entity, value));
        self.check(result)?;

        self.component_changed(entity, id, true)
    }

    /// Removes a component from an entity and returns it.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`], [`EcsError::EntityOutOfRange`] or
    /// [`EcsError::MissingComponent`].
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> EcsResult<C> {
        let id = self.check(self.components.id_of::<C>())?;
        self.check(self.entities.check_range(entity))?;

        let result = self
            .components
            .store_mut::<C>()
            .and_then(|store| store.remove(entity));
        let value = self.check(result)?;

        self.component_changed(entity, id, false)?;
        Ok(value)
    }

    /// Returns a reference to an entity's component.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`], [`EcsError::EntityOutOfRange`] or
    /// [`EcsError::MissingComponent`].
    pub fn get_component<C: Component>(&self, entity: Entity) -> EcsResult<&C> {
        self.check(self.entities.check_range(entity))?;
        let result = self
            .components
            .store::<C>()
            .and_then(|store| store.get(entity));
        self.check(result)
    }

    /// Returns a live reference into the packed array for an entity's
    /// component.
    ///
    /// The value may move to another slot when a different entity's `C` is
    /// removed, which the borrow checker already forbids while the reference
    /// is held.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`], [`EcsError::EntityOutOfRange`] or
    /// [`EcsError::MissingComponent`].
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> EcsResult<&mut C> {
        self.check(self.entities.check_range(entity))?;
        let result = self
            .components
            .store_mut::<C>()
            .and_then(|store| store.get_mut(entity));
        if let Err(err) = &result {
            tracing::error!(world = %self.label, %err, "ecs contract violation");
        }
        result
    }

    /// Checks whether an entity owns a `C`. Unregistered types own nothing.
    #[must_use]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.components
            .store::<C>()
            .is_ok_and(|store| store.contains(entity))
    }

    /// Returns the packed store of `C` for read-only bulk access.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    pub fn store<C: Component>(&self) -> EcsResult<&ComponentStore<C>> {
        self.check(self.components.store::<C>())
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Runs one update of `S` over a snapshot of its interest set.
    ///
    /// The system may mutate the world freely; membership changes made during
    /// the update show up in the next snapshot.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`], [`EcsError::SystemBusy`] when called
    /// from inside `S`'s own update, or whatever the system returns.
    pub fn update_system<S: System>(&mut self, delta_time: f32) -> EcsResult<()> {
        let id = self.check(self.systems.id_of::<S>())?;
        self.run(id, delta_time)
    }

    /// Updates every registered system once, in registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first system that fails and returns its error.
    pub fn run_systems(&mut self, delta_time: f32) -> EcsResult<()> {
        let ids: Vec<_> = self.systems.ids().collect();
        for id in ids {
            self.run(id, delta_time)?;
        }
        Ok(())
    }

    fn run(&mut self, id: SystemId, delta_time: f32) -> EcsResult<()> {
        let result = self.systems.checkout(id);
        let mut checkout = self.check(result)?;

        let result = checkout.system.run(self, &checkout.snapshot, delta_time);
        self.systems.checkin(id, checkout);
        result
    }

    // =========================================================================
    // Notification fan-out
    // =========================================================================

    /// Flips the signature bit and tells the systems.
    fn component_changed(
        &mut self,
        entity: Entity,
        id: ComponentTypeId,
        present: bool,
    ) -> EcsResult<()> {
        let result = self.entities.set_component_bit(entity, id, present);
        let signature = self.check(result)?;
        self.broadcast(&Notification::ComponentChanged { entity, signature });
        Ok(())
    }

    fn broadcast(&mut self, notification: &Notification) {
        match notification {
            Notification::ComponentChanged { .. } => {
                self.components.notify(notification);
                self.systems.notify(notification);
            }
            Notification::EntityDestroyed { .. } => {
                // Systems must stop seeing the entity before its data goes.
                self.systems.notify(notification);
                self.components.notify(notification);
            }
        }
    }

    /// Logs a contract violation before handing the result back.
    fn check<T>(&self, result: EcsResult<T>) -> EcsResult<T> {
        if let Err(err) = &result {
            tracing::error!(world = %self.label, %err, "ecs contract violation");
        }
        result
    }
}

//! # Systems
//!
//! A system is per-frame logic over every entity whose signature is a
//! superset of the system's own. The registry owns each system instance, its
//! signature and its interest set; the interest set is derived state,
//! maintained only by [`Notification`]s and re-scans.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use super::component::ComponentTypeId;
use super::entity::Entity;
use super::notify::{Listener, Notification};
use super::signature::Signature;
use super::world::World;
use crate::error::{EcsError, EcsResult};

/// Per-frame update logic.
///
/// `entities` is a snapshot of the system's interest set taken just before the
/// call. Every member owned all tracked component types at that moment, so
/// `world.get_component` for a tracked type only fails if this same update
/// removed it or destroyed the entity.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Regen;
///
/// impl System for Regen {
///     fn update(
///         &mut self,
///         world: &mut World,
///         entities: &[Entity],
///         delta_time: f32,
///     ) -> EcsResult<()> {
///         for &e in entities {
///             let health = world.get_component_mut::<Health>(e)?;
///             health.current = (health.current + 1).min(health.max);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait System: Send + 'static {
    /// Runs one frame over the interest-set snapshot.
    ///
    /// # Errors
    ///
    /// Any contract violation hit while touching the world.
    fn update(&mut self, world: &mut World, entities: &[Entity], delta_time: f32) -> EcsResult<()>;
}

/// Object-safe storage face of a [`System`] with checked downcasts.
pub(crate) trait AnySystem: Send {
    fn run(&mut self, world: &mut World, entities: &[Entity], delta_time: f32) -> EcsResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> AnySystem for S {
    fn run(&mut self, world: &mut World, entities: &[Entity], delta_time: f32) -> EcsResult<()> {
        self.update(world, entities, delta_time)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Sequential index of a registered system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SystemId(u32);

impl SystemId {
    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

struct SystemSlot {
    name: &'static str,
    signature: Signature,
    interest: BTreeSet<Entity>,
    /// `None` while the system is checked out for its update.
    instance: Option<Box<dyn AnySystem>>,
    /// Reused buffer for the interest-set snapshot.
    snapshot: Vec<Entity>,
}

impl SystemSlot {
    fn rescan(&mut self, live: impl Iterator<Item = (Entity, Signature)>) {
        self.interest.clear();
        let required = self.signature;
        self.interest.extend(
            live.filter(|(_, signature)| signature.matches(required))
                .map(|(entity, _)| entity),
        );
        tracing::debug!(
            system = self.name,
            signature = ?self.signature,
            members = self.interest.len(),
            "re-scanned interest set"
        );
    }
}

/// A system checked out of its slot for one update.
pub(crate) struct Checkout {
    pub(crate) system: Box<dyn AnySystem>,
    pub(crate) snapshot: Vec<Entity>,
}

/// Owns system instances, their signatures and interest sets.
#[derive(Default)]
pub struct SystemRegistry {
    lookup: HashMap<TypeId, SystemId>,
    slots: Vec<SystemSlot>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `S`, building it with `make` on first registration.
    ///
    /// The new system starts with an empty signature, so its interest set is
    /// seeded from `live`. Registering a known type returns the existing ID
    /// without calling `make`.
    pub fn register<S: System>(
        &mut self,
        make: impl FnOnce() -> S,
        live: impl Iterator<Item = (Entity, Signature)>,
    ) -> SystemId {
        if let Some(&id) = self.lookup.get(&TypeId::of::<S>()) {
            return id;
        }

        let id = SystemId(self.slots.len() as u32);
        let mut slot = SystemSlot {
            name: type_name::<S>(),
            signature: Signature::EMPTY,
            interest: BTreeSet::new(),
            instance: Some(Box::new(make())),
            snapshot: Vec::new(),
        };
        slot.rescan(live);

        self.lookup.insert(TypeId::of::<S>(), id);
        self.slots.push(slot);

        tracing::debug!(system = type_name::<S>(), index = id.index(), "registered system");
        id
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Looks up the ID of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    #[inline]
    pub fn id_of<S: System>(&self) -> EcsResult<SystemId> {
        self.lookup
            .get(&TypeId::of::<S>())
            .copied()
            .ok_or(EcsError::UnregisteredSystem {
                system: type_name::<S>(),
            })
    }

    /// Returns the instance of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`], or [`EcsError::SystemBusy`] while `S`
    /// is running.
    pub fn get<S: System>(&self) -> EcsResult<&S> {
        let id = self.id_of::<S>()?;
        self.slots[id.index()]
            .instance
            .as_ref()
            .ok_or(EcsError::SystemBusy {
                system: type_name::<S>(),
            })?
            .as_any()
            .downcast_ref::<S>()
            .ok_or(EcsError::UnregisteredSystem {
                system: type_name::<S>(),
            })
    }

    /// Returns the instance of `S` mutably.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`], or [`EcsError::SystemBusy`] while `S`
    /// is running.
    pub fn get_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        let id = self.id_of::<S>()?;
        self.slots[id.index()]
            .instance
            .as_mut()
            .ok_or(EcsError::SystemBusy {
                system: type_name::<S>(),
            })?
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(EcsError::UnregisteredSystem {
                system: type_name::<S>(),
            })
    }

    /// Returns the signature of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn signature<S: System>(&self) -> EcsResult<Signature> {
        let id = self.id_of::<S>()?;
        Ok(self.slots[id.index()].signature)
    }

    /// Returns the live interest set of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn interest_set<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        let id = self.id_of::<S>()?;
        Ok(&self.slots[id.index()].interest)
    }

    /// Sets the signature bit for `component` on `S` and re-scans `live`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn track<S: System>(
        &mut self,
        component: ComponentTypeId,
        live: impl Iterator<Item = (Entity, Signature)>,
    ) -> EcsResult<()> {
        let id = self.id_of::<S>()?;
        let slot = &mut self.slots[id.index()];
        if slot.signature.contains(component) {
            return Ok(());
        }

        slot.signature.set(component, true);
        slot.rescan(live);
        Ok(())
    }

    /// IDs of all systems in registration order.
    pub fn ids(&self) -> impl Iterator<Item = SystemId> {
        (0..self.slots.len() as u32).map(SystemId)
    }

    /// Takes the instance of `id` out of its slot along with a fresh snapshot
    /// of its interest set.
    pub(crate) fn checkout(&mut self, id: SystemId) -> EcsResult<Checkout> {
        let slot = &mut self.slots[id.index()];
        let system = slot
            .instance
            .take()
            .ok_or(EcsError::SystemBusy { system: slot.name })?;

        let mut snapshot = std::mem::take(&mut slot.snapshot);
        snapshot.clear();
        snapshot.extend(slot.interest.iter().copied());

        Ok(Checkout { system, snapshot })
    }

    /// Puts a checked-out instance back.
    pub(crate) fn checkin(&mut self, id: SystemId, checkout: Checkout) {
        let slot = &mut self.slots[id.index()];
        slot.instance = Some(checkout.system);
        slot.snapshot = checkout.snapshot;
    }
}

impl Listener for SystemRegistry {
    fn notify(&mut self, notification: &Notification) {
        match *notification {
            Notification::ComponentChanged { entity, signature } => {
                for slot in &mut self.slots {
                    if signature.matches(slot.signature) {
                        slot.interest.insert(entity);
                    } else {
                        slot.interest.remove(&entity);
                    }
                }
            }
            Notification::EntityDestroyed { entity } => {
                for slot in &mut self.slots {
                    slot.interest.remove(&entity);
                }
            }
        }

        tracing::trace!(
            entity = %notification.entity(),
            kind = ?notification.notification_type(),
            "systems re-evaluated"
        );
    }
}

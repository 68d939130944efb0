//! # Entity Management
//!
//! Entities are plain integer handles. The registry hands them out from a
//! FIFO free-list seeded with every handle up to the world's capacity, and
//! owns the component signature of each live entity.

use std::collections::VecDeque;
use std::fmt;

use super::component::ComponentTypeId;
use super::signature::Signature;
use crate::error::{EcsError, EcsResult};

/// Hard ceiling on entity handles per world.
pub const MAX_ENTITY_COUNT: usize = 65_535;

/// Opaque entity handle.
///
/// Unique among live entities. A destroyed handle goes to the back of the
/// free-list and may be issued again later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Wraps a raw handle value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity[{}]", self.0)
    }
}

/// Per-handle bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
struct EntitySlot {
    signature: Signature,
    alive: bool,
}

/// Owns entity lifecycle and signatures.
///
/// All storage is allocated at creation; `create` and `destroy` never
/// allocate.
pub struct EntityRegistry {
    /// One slot per handle, indexed by the raw handle value.
    slots: Box<[EntitySlot]>,
    /// Handles available for issue, oldest first.
    available: VecDeque<Entity>,
    /// Number of currently live entities.
    alive_count: usize,
}

impl EntityRegistry {
    /// Creates a registry able to hold `capacity` live entities.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds [`MAX_ENTITY_COUNT`]. The
    /// world validates its configuration before calling this.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= MAX_ENTITY_COUNT,
            "Capacity cannot exceed MAX_ENTITY_COUNT"
        );

        let mut available = VecDeque::with_capacity(capacity);
        available.extend((0..capacity as u32).map(Entity));

        Self {
            slots: vec![EntitySlot::default(); capacity].into_boxed_slice(),
            available,
            alive_count: 0,
        }
    }

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Issues the oldest available handle with an empty signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityCapacityExceeded`] if every handle is live.
    pub fn create(&mut self) -> EcsResult<Entity> {
        let entity = self
            .available
            .pop_front()
            .ok_or(EcsError::EntityCapacityExceeded {
                capacity: self.capacity(),
            })?;

        self.slots[entity.slot()] = EntitySlot {
            signature: Signature::EMPTY,
            alive: true,
        };
        self.alive_count += 1;

        Ok(entity)
    }

    /// Returns a live handle to the tail of the free-list.
    ///
    /// Component stores and systems must already have released the entity.
    ///
    /// # Errors
    ///
    /// Fails if the handle is out of range or not live.
    pub fn release(&mut self, entity: Entity) -> EcsResult<()> {
        self.check_alive(entity)?;

        self.slots[entity.slot()] = EntitySlot::default();
        self.available.push_back(entity);
        self.alive_count -= 1;

        Ok(())
    }

    /// Checks that the handle lies in the issuable range.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityOutOfRange`] otherwise.
    #[inline]
    pub fn check_range(&self, entity: Entity) -> EcsResult<()> {
        if entity.slot() < self.capacity() {
            Ok(())
        } else {
            Err(EcsError::EntityOutOfRange {
                entity,
                capacity: self.capacity(),
            })
        }
    }

    /// Checks that the handle is live.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityOutOfRange`] or [`EcsError::EntityNotAlive`].
    #[inline]
    pub fn check_alive(&self, entity: Entity) -> EcsResult<()> {
        self.check_range(entity)?;
        if self.slots[entity.slot()].alive {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive { entity })
        }
    }

    /// Checks if a handle is live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slots.get(entity.slot()).is_some_and(|slot| slot.alive)
    }

    /// Returns the signature of a live entity.
    ///
    /// # Errors
    ///
    /// Fails if the handle is out of range or not live.
    #[inline]
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.check_alive(entity)?;
        Ok(self.slots[entity.slot()].signature)
    }

    /// Flips one signature bit and returns the updated signature.
    ///
    /// # Errors
    ///
    /// Fails if the handle is out of range or not live.
    pub fn set_component_bit(
        &mut self,
        entity: Entity,
        id: ComponentTypeId,
        present: bool,
    ) -> EcsResult<Signature> {
        self.check_alive(entity)?;
        let slot = &mut self.slots[entity.slot()];
        slot.signature.set(id, present);
        Ok(slot.signature)
    }

    /// Iterates over all live entities with their signatures, in handle order.
    pub fn iter_alive(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| (Entity(index as u32), slot.signature))
    }
}

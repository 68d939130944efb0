//! # Component Storage
//!
//! Pre-allocated packed storage for a single component type.
//!
//! The store keeps three arrays, all sized to the world's entity capacity:
//! - `dense`: component values, occupied contiguously in `[0, len)`
//! - `index_of`: entity handle to dense index (sparse, `VACANT` when absent)
//! - `owner_of`: dense index to entity handle
//!
//! Insert appends, remove swaps the last value into the hole. Both are O(1)
//! and neither allocates. Removal does not preserve the order of the
//! remaining values.

use std::any::{type_name, Any};

use bytemuck::Pod;

use super::component::{Component, ComponentTypeId};
use super::entity::Entity;
use super::notify::Notification;
use crate::error::{EcsError, EcsResult};

/// Sparse-array marker for "no component".
const VACANT: u32 = u32::MAX;

/// Packed storage for one component type.
///
/// References returned by [`get`](Self::get) point straight into the dense
/// array. A later `remove` of any other entity may move this entity's value to
/// another slot, so references must not be held across mutations.
pub struct ComponentStore<C: Component> {
    /// The packed component values.
    dense: Box<[C]>,
    /// Entity handle to dense index.
    index_of: Box<[u32]>,
    /// Dense index to entity handle.
    owner_of: Box<[Entity]>,
    /// Number of occupied dense slots.
    len: usize,
    /// Signature bit of this type.
    id: ComponentTypeId,
}

impl<C: Component> ComponentStore<C> {
    /// Creates a store able to hold one value per entity handle.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(id: ComponentTypeId, capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            dense: vec![C::default(); capacity].into_boxed_slice(),
            index_of: vec![VACANT; capacity].into_boxed_slice(),
            owner_of: vec![Entity::from_raw(VACANT); capacity].into_boxed_slice(),
            len: 0,
            id,
        }
    }

    /// Returns the signature bit of this component type.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ComponentTypeId {
        self.id
    }

    /// Returns the slot count of this store.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.dense.len()
    }

    /// Returns the number of stored components.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no component is stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the dense index currently holding the entity's value.
    #[inline]
    #[must_use]
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        match self.index_of.get(entity.slot()) {
            Some(&index) if index != VACANT => Some(index as usize),
            _ => None,
        }
    }

    /// Checks whether the entity owns a value in this store.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index_of(entity).is_some()
    }

    /// Appends a value for the entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponent`] if the entity already owns one, or
    /// [`EcsError::EntityOutOfRange`] if the handle exceeds the store.
    pub fn insert(&mut self, entity: Entity, value: C) -> EcsResult<()> {
        if entity.slot() >= self.capacity() {
            return Err(EcsError::EntityOutOfRange {
                entity,
                capacity: self.capacity(),
            });
        }
        if self.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<C>(),
            });
        }

        let index = self.len;
        self.dense[index] = value;
        self.index_of[entity.slot()] = index as u32;
        self.owner_of[index] = entity;
        self.len += 1;

        Ok(())
    }

    /// Removes the entity's value by swapping the last value into its slot.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity owns no value here.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<C> {
        let index = self.index_of(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: type_name::<C>(),
        })?;
        let last = self.len - 1;
        let removed = self.dense[index];

        // Move the last value into the hole and repoint its owner.
        let moved = self.owner_of[last];
        self.dense[index] = self.dense[last];
        self.owner_of[index] = moved;
        self.index_of[moved.slot()] = index as u32;

        // Erase the removed entity and the stale last slot. When the removed
        // value was the last one, `moved == entity` and this clears it too.
        self.index_of[entity.slot()] = VACANT;
        self.owner_of[last] = Entity::from_raw(VACANT);
        self.dense[last] = C::default();
        self.len = last;

        Ok(removed)
    }

    /// Returns the entity's value.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity owns no value here.
    #[inline]
    pub fn get(&self, entity: Entity) -> EcsResult<&C> {
        match self.index_of(entity) {
            Some(index) => Ok(&self.dense[index]),
            None => Err(self.missing(entity)),
        }
    }

    /// Returns the entity's value mutably.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity owns no value here.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut C> {
        match self.index_of(entity) {
            Some(index) => Ok(&mut self.dense[index]),
            None => Err(self.missing(entity)),
        }
    }

    /// Returns the occupied dense range.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.dense[..self.len]
    }

    /// Returns the occupied dense range mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.dense[..self.len]
    }

    /// Returns the owner of each occupied dense slot, parallel to
    /// [`as_slice`](Self::as_slice).
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.owner_of[..self.len]
    }

    /// Iterates over `(owner, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities().iter().copied().zip(self.as_slice())
    }

    fn missing(&self, entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: type_name::<C>(),
        }
    }
}

impl<C: Component + Pod> ComponentStore<C> {
    /// Byte view of the occupied dense range, for uploading packed component
    /// data to a GPU buffer without copying.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}

/// Type-erased face of a [`ComponentStore`], so the registry can hold stores
/// of every type in one table and fan notifications out to them.
pub(crate) trait ErasedStore: Send + Sync {
    /// Type label for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Reacts to a world notification.
    fn notify(&mut self, notification: &Notification);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for ComponentStore<C> {
    fn type_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn notify(&mut self, notification: &Notification) {
        if let Notification::EntityDestroyed { entity } = *notification {
            // Entities that never owned this type are ignored.
            if self.contains(entity) {
                let _ = self.remove(entity);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! # Component Types
//!
//! Components are plain data records with no behavior. Each type is assigned
//! a dense index at registration; that index names its bit in every
//! [`Signature`](super::Signature) and its packed store in the registry.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::notify::{Listener, Notification};
use super::signature::MAX_COMPONENT_TYPES;
use super::storage::{ComponentStore, ErasedStore};
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: stored by value in packed arrays, moved by bitwise copy on swap-remove
/// - `Default`: store slots are pre-filled at creation
/// - `Send + Sync`: a world may be handed between threads
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default)]
/// struct Health {
///     max: i32,
///     current: i32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Copy + Default + Send + Sync + 'static {}

/// Dense index of a registered component type, in `[0, MAX_COMPONENT_TYPES)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Creates an ID from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in a signature.
    #[inline]
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < MAX_COMPONENT_TYPES, "Component index exceeds signature width");
        Self(index)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Maps component types to their IDs and owns one packed store per type.
pub struct ComponentRegistry {
    /// Type identity to dense index.
    lookup: HashMap<TypeId, ComponentTypeId>,
    /// Stores indexed by [`ComponentTypeId::index`].
    stores: Vec<Box<dyn ErasedStore>>,
    /// Slot count of every store, equal to the entity capacity.
    capacity: usize,
}

impl ComponentRegistry {
    /// Creates an empty registry whose stores hold `capacity` components each.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(MAX_COMPONENT_TYPES),
            stores: Vec::with_capacity(MAX_COMPONENT_TYPES),
            capacity,
        }
    }

    /// Registers `C`, returning its ID. Registering a known type is a no-op.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentTypeLimit`] if all signature bits are taken.
    pub fn register<C: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        if let Some(&id) = self.lookup.get(&TypeId::of::<C>()) {
            return Ok(id);
        }

        if self.stores.len() >= MAX_COMPONENT_TYPES {
            return Err(EcsError::ComponentTypeLimit {
                component: type_name::<C>(),
                limit: MAX_COMPONENT_TYPES,
            });
        }

        let id = ComponentTypeId(self.stores.len() as u8);
        self.lookup.insert(TypeId::of::<C>(), id);
        self.stores
            .push(Box::new(ComponentStore::<C>::new(id, self.capacity)));

        tracing::debug!(
            component = type_name::<C>(),
            index = id.index(),
            "registered component type"
        );
        Ok(id)
    }

    /// Number of registered component types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns `true` if no type is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Looks up the ID of `C`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    #[inline]
    pub fn id_of<C: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.lookup
            .get(&TypeId::of::<C>())
            .copied()
            .ok_or(EcsError::UnregisteredComponent {
                component: type_name::<C>(),
            })
    }

    /// Returns the packed store for `C`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    pub fn store<C: Component>(&self) -> EcsResult<&ComponentStore<C>> {
        let id = self.id_of::<C>()?;
        self.stores[id.index()]
            .as_any()
            .downcast_ref::<ComponentStore<C>>()
            .ok_or(EcsError::UnregisteredComponent {
                component: type_name::<C>(),
            })
    }

    /// Returns the packed store for `C` mutably.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    pub fn store_mut<C: Component>(&mut self) -> EcsResult<&mut ComponentStore<C>> {
        let id = self.id_of::<C>()?;
        self.stores[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStore<C>>()
            .ok_or(EcsError::UnregisteredComponent {
                component: type_name::<C>(),
            })
    }

    /// Type label of a registered ID, for diagnostics.
    #[must_use]
    pub fn type_name_of(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.stores.get(id.index()).map(|store| store.type_name())
    }
}

impl Listener for ComponentRegistry {
    fn notify(&mut self, notification: &Notification) {
        for store in &mut self.stores {
            store.notify(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Entity;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Mass(f32);
    impl Component for Mass {}

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Tag;
    impl Component for Tag {}

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ComponentRegistry::new(8);
        let mass = registry.register::<Mass>().unwrap();
        let tag = registry.register::<Tag>().unwrap();
        assert_eq!(mass.index(), 0);
        assert_eq!(tag.index(), 1);

        assert_eq!(registry.register::<Mass>().unwrap(), mass);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.type_name_of(tag), Some(type_name::<Tag>()));
    }

    #[test]
    fn test_unregistered_lookup() {
        let registry = ComponentRegistry::new(8);
        assert_eq!(
            registry.id_of::<Mass>(),
            Err(EcsError::UnregisteredComponent {
                component: type_name::<Mass>()
            })
        );
        assert!(registry.store::<Mass>().is_err());
    }

    #[test]
    fn test_type_limit() {
        macro_rules! components {
            ($($name:ident),*) => {
                $(
                    #[derive(Clone, Copy, Default)]
                    struct $name;
                    impl Component for $name {}
                )*
            };
        }
        components!(
            C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17,
            C18, C19, C20, C21, C22, C23, C24, C25, C26, C27, C28, C29, C30, C31, C32
        );

        let mut registry = ComponentRegistry::new(1);
        macro_rules! register_all {
            ($($name:ident),*) => { $( registry.register::<$name>().unwrap(); )* };
        }
        register_all!(
            C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17,
            C18, C19, C20, C21, C22, C23, C24, C25, C26, C27, C28, C29, C30, C31
        );
        assert_eq!(registry.len(), MAX_COMPONENT_TYPES);

        assert!(matches!(
            registry.register::<C32>(),
            Err(EcsError::ComponentTypeLimit { limit: 32, .. })
        ));
        // Known types still resolve at the limit.
        assert_eq!(registry.register::<C0>().unwrap().index(), 0);
    }

    #[test]
    fn test_destroy_notification_releases_all_stores() {
        let mut registry = ComponentRegistry::new(4);
        registry.register::<Mass>().unwrap();
        registry.register::<Tag>().unwrap();

        let e = Entity::from_raw(2);
        registry.store_mut::<Mass>().unwrap().insert(e, Mass(1.5)).unwrap();

        registry.notify(&Notification::EntityDestroyed { entity: e });
        assert!(!registry.store::<Mass>().unwrap().contains(e));
        assert!(registry.store::<Tag>().unwrap().is_empty());
    }
}

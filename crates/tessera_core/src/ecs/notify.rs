//! # World Notifications
//!
//! The single fan-out point that keeps entity signatures, component stores
//! and system interest sets consistent. Stores and systems never reach into
//! each other; the world broadcasts a [`Notification`] to every [`Listener`]
//! after each mutation.
//!
//! Ordering is fixed by the world:
//! - component added/removed: the store changes, then the signature bit
//!   flips, then `ComponentChanged` carries the post-mutation signature to
//!   the systems.
//! - entity destroyed: systems drop the entity, then stores release its
//!   data, then the entity registry recycles the handle.

use super::entity::Entity;
use super::signature::Signature;

/// Notification type discriminator.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A component was added to or removed from an entity.
    ComponentChanged = 0,
    /// An entity is about to be recycled.
    EntityDestroyed = 1,
}

/// A mutation broadcast to the registries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    /// The entity's component set changed.
    ComponentChanged {
        /// Affected entity.
        entity: Entity,
        /// Signature after the change.
        signature: Signature,
    },

    /// The entity is being destroyed.
    EntityDestroyed {
        /// Affected entity.
        entity: Entity,
    },
}

impl Notification {
    /// Returns the notification type.
    #[must_use]
    pub const fn notification_type(&self) -> NotificationType {
        match self {
            Self::ComponentChanged { .. } => NotificationType::ComponentChanged,
            Self::EntityDestroyed { .. } => NotificationType::EntityDestroyed,
        }
    }

    /// Returns the affected entity.
    #[must_use]
    pub const fn entity(&self) -> Entity {
        match *self {
            Self::ComponentChanged { entity, .. } | Self::EntityDestroyed { entity } => entity,
        }
    }
}

/// Receiver of world notifications.
pub trait Listener {
    /// Applies the notification to the receiver's own state.
    fn notify(&mut self, notification: &Notification);
}

//! # Mutex-Guarded World Handle

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::ecs::World;

/// Cloneable handle to a world behind a `parking_lot` mutex.
///
/// Every clone refers to the same world. Hold the guard for a whole batch of
/// related operations so other threads never observe a half-applied change.
///
/// # Example
///
/// ```rust,ignore
/// let shared = SharedWorld::new(world);
/// let input = shared.clone();
///
/// std::thread::spawn(move || {
///     input.with(|world| world.get_component_mut::<Status>(player).map(|s| s.alive = false))
/// });
/// ```
#[derive(Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<World>>,
}

impl SharedWorld {
    /// Wraps a world for shared access.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Blocks until the world is free and returns exclusive access.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.inner.lock()
    }

    /// Returns exclusive access if no other thread holds the world.
    #[inline]
    #[must_use]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, World>> {
        self.inner.try_lock()
    }

    /// Runs `f` with exclusive access to the world.
    pub fn with<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Takes the world back if this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged while other clones are alive.
    pub fn into_inner(self) -> Result<World, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

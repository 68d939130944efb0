//! # Component Signatures
//!
//! A signature is a fixed-width bitset with one bit per registered component
//! type. Entities carry the set of types they own; systems carry the set of
//! types they require.

use std::fmt;

use super::component::ComponentTypeId;

/// Maximum number of distinct component types a world can register.
///
/// Bounded by the width of [`Signature`].
pub const MAX_COMPONENT_TYPES: usize = 32;

/// Fixed-width component bitset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u32);

impl Signature {
    /// The signature with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Creates a signature from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns a copy with the bit for `id` set.
    #[inline]
    #[must_use]
    pub const fn with(self, id: ComponentTypeId) -> Self {
        Self(self.0 | id.mask())
    }

    /// Sets or clears the bit for `id`.
    #[inline]
    pub fn set(&mut self, id: ComponentTypeId, present: bool) {
        if present {
            self.0 |= id.mask();
        } else {
            self.0 &= !id.mask();
        }
    }

    /// Checks whether the bit for `id` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, id: ComponentTypeId) -> bool {
        self.0 & id.mask() != 0
    }

    /// Checks whether every bit of `required` is also set here.
    ///
    /// This is the system matching rule: `(self & required) == required`.
    /// The empty signature is matched by every entity.
    #[inline]
    #[must_use]
    pub const fn matches(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of bits set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Clears every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}

//! Index types.

use std::{fmt, num::NonZeroU32};

pub use index_vec::*;

/// A specialized wrapper around a `u32` that reserves a niche, so that `Option<Index>` is the
/// same size as `Index`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BaseIndex32 {
    value: NonZeroU32,
}

impl fmt::Display for BaseIndex32 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

impl fmt::Debug for BaseIndex32 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

impl BaseIndex32 {
    /// The maximum index value, as the primitive type.
    pub const MAX_AS: u32 = 0xFFFF_FF00;

    /// The maximum index value.
    pub const MAX: Self = Self::new(Self::MAX_AS);

    /// Creates a new index from the given `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` exceeds `MAX`.
    #[inline]
    pub const fn new(value: u32) -> Self {
        assert!(value <= Self::MAX_AS, "index overflowed");
        match NonZeroU32::new(value + 1) {
            Some(value) => Self { value },
            None => panic!("index overflowed"),
        }
    }

    /// Creates a new index from the given `usize`.
    ///
    /// # Panics
    ///
    /// Panics if `value` exceeds `MAX`.
    #[inline]
    pub const fn from_usize(value: usize) -> Self {
        assert!(value <= Self::MAX_AS as usize, "index overflowed");
        Self::new(value as u32)
    }

    /// Gets the underlying index value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.value.get() - 1
    }
}

/// Creates a new index type backed by [`BaseIndex32`] that can be used with [`IndexVec`].
///
/// # Examples
///
/// ```
/// toroid_data_structures::newtype_index! {
///     /// An example index.
///     pub struct ExampleId;
/// }
///
/// let mut v = toroid_data_structures::index::IndexVec::<ExampleId, &str>::new();
/// let id = v.push("a");
/// assert_eq!(id.index(), 0);
/// assert_eq!(v[id], "a");
/// ```
#[macro_export]
macro_rules! newtype_index {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $vis struct $name($crate::index::BaseIndex32);

        impl $name {
            /// The maximum index value.
            pub const MAX: Self = Self($crate::index::BaseIndex32::MAX);

            /// Creates a new index from the given `value`.
            #[inline]
            pub const fn new(value: u32) -> Self {
                Self($crate::index::BaseIndex32::new(value))
            }

            /// Creates a new index from the given `usize`.
            #[inline]
            pub const fn from_usize(value: usize) -> Self {
                Self($crate::index::BaseIndex32::from_usize(value))
            }

            /// Gets the underlying index value.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0.get()
            }

            /// Gets the underlying index value as a `usize`.
            #[inline]
            pub const fn index(self) -> usize {
                self.0.get() as usize
            }
        }

        impl $crate::index::Idx for $name {
            #[inline]
            fn from_usize(value: usize) -> Self {
                Self::from_usize(value)
            }

            #[inline]
            fn index(self) -> usize {
                self.0.get() as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.get())
            }
        }
    };
}

//! Strongly typed, zero-cost identifier wrappers.
//!
//! Servers, booths and categories are dense indices into the simulator's
//! `Vec`s, so `.index()` is the usual way to turn one into a slot.  Customer
//! ids are handed out by a per-simulation counter starting at 1.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifier of one customer visit.  Monotonically increasing per run.
    pub struct CustomerId(u64);
}

typed_id! {
    /// Index of a server (staff member).
    pub struct ServerId(u32);
}

typed_id! {
    /// Index of a service booth.
    pub struct BoothId(u32);
}

typed_id! {
    /// Index of a service category in the run's [`CategoryTable`][crate::CategoryTable].
    pub struct CategoryId(u16);
}

impl CustomerId {
    /// The first id handed out after construction or reset.
    pub const FIRST: CustomerId = CustomerId(1);

    /// The id following `self`.
    #[inline]
    pub fn next(self) -> CustomerId {
        CustomerId(self.0 + 1)
    }
}

//! Strongly typed identifier wrappers.
//!
//! Two kinds of identity live side by side:
//!
//! - [`NodeId`] is the stable 64-bit id assigned by the map data.  It is
//!   what callers see in route results and location records.  Equality and
//!   hashing use the id alone; coordinates are attributes, never identity.
//! - [`NodeIdx`] / [`EdgeIdx`] are dense arena slots inside a built graph,
//!   used on hot paths for direct `Vec` indexing.

use std::fmt;

/// Stable node identifier from the source map data.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    #[inline]
    fn from(id: i64) -> Self {
        NodeId(id)
    }
}

/// Generate a typed arena index around a `u32`.
macro_rules! arena_index {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid slot".
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
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

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

arena_index! {
    /// Slot of a node in a built road graph.
    pub struct NodeIdx;
}

arena_index! {
    /// Slot of an undirected edge in a built road graph.
    pub struct EdgeIdx;
}

//! Integer identifiers for the three levels of the fitter hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! hierarchy_key {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier from its raw integer representation.
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw integer representation of the identifier.
            pub fn as_raw(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "_{}"), self.0)
            }
        }
    };
}

hierarchy_key!(
    /// Identifier of a fitted track.
    TrackKey,
    "track"
);
hierarchy_key!(
    /// Identifier of a surface crossed by a track.
    SurfaceKey,
    "surface"
);
hierarchy_key!(
    /// Identifier of a propagation step on a surface.
    StepKey,
    "step"
);

/// A hierarchy level that may not have been announced yet.
///
/// `None` is the unset context; it orders before every concrete key.
pub type Slot<K> = Option<K>;

//! String-keyed identifier wrappers.
//!
//! The simulator assigns lane and vehicle identifiers as opaque strings
//! (`"-1234#0_1"`, `"veh42"`).  Wrapping them keeps the two key spaces from
//! being mixed up in maps and function signatures.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed ID wrapper around an owned `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// A single traffic lane, e.g. `"-4711#2_0"` (edge id + `_` + lane index).
    pub struct LaneId;
}

string_id! {
    /// A vehicle as named by the simulator's route/flow definitions.
    pub struct VehicleId;
}

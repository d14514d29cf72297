//! Identifier newtypes for the timetable tables.
//!
//! Feed identifiers are opaque strings. Wrapping them keeps a stop id from
//! being handed to something expecting a trip id; no further structure is
//! assumed or validated beyond non-emptiness at load time.

use std::fmt;

use serde::Deserialize;

macro_rules! string_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of a physical stop record.
    StopId
}

string_id! {
    /// Identifier of a route.
    RouteId
}

string_id! {
    /// Identifier of a scheduled trip.
    TripId
}

string_id! {
    /// Identifier of a service calendar (a running pattern).
    ServiceId
}

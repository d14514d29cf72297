//! Domain types for the schedule engine.
//!
//! Identifier newtypes and the wall-clock time type shared by the feed
//! tables and every query. Types validate their invariants at construction
//! time, so downstream code can trust any value it receives.

mod ids;
mod time;

pub use ids::{RouteId, ServiceId, StopId, TripId};
pub use time::{TimeError, TimeOfDay};

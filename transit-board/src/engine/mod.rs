//! The schedule query engine.
//!
//! Composes the calendar resolver, destination resolver, station
//! consolidator and departure deduplicator into four query operations over
//! an immutable snapshot: departure boards, direct connections, the stops
//! of a route and the routes serving a place.

mod handle;
mod queries;
mod snapshot;

pub use handle::{EngineError, ScheduleEngine};
pub use queries::{Connection, Departure, RouteStops};
pub use snapshot::Snapshot;

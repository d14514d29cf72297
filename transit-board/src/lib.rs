//! Transit schedule resolution engine.
//!
//! Turns a static, GTFS-like timetable (stops, routes, trips, stop-times,
//! service calendars) into deduplicated departure boards and direct
//! connections for arbitrary stations and dates.

pub mod calendar;
pub mod dedup;
pub mod destinations;
pub mod domain;
pub mod engine;
pub mod feed;
pub mod stations;

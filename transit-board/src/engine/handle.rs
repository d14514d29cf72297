//! Snapshot ownership and reload.
//!
//! The engine is read-mostly: a feed load builds one immutable [`Snapshot`]
//! and queries run against it without locking. A reload builds the new
//! snapshot entirely outside the lock and swaps one `Arc` while holding it,
//! so readers in flight simply finish against the snapshot they started
//! with (copy-on-reload, not lock-on-reload).

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::feed::FeedTables;

use super::snapshot::Snapshot;

/// Error from using the engine before any feed was loaded.
///
/// Distinct from an empty query result: "no service found" is a valid
/// answer, querying with nothing loaded is a caller bug and fails fast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no timetable snapshot loaded")]
    NotLoaded,
}

/// Handle owning the current snapshot and the reload swap.
#[derive(Default)]
pub struct ScheduleEngine {
    current: Mutex<Option<Arc<Snapshot>>>,
}

impl ScheduleEngine {
    /// Create an engine with no snapshot loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from freshly loaded tables and publish it.
    ///
    /// Returns the new snapshot; readers holding the previous one keep it
    /// alive until they drop it.
    pub fn publish(&self, tables: FeedTables) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::build(tables));
        let replaced = {
            let mut current = self.current.lock().expect("snapshot lock poisoned");
            current.replace(snapshot.clone()).is_some()
        };
        info!(reload = replaced, "published timetable snapshot");
        snapshot
    }

    /// The current snapshot, shared with any other readers.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, EngineError> {
        self.current
            .lock()
            .expect("snapshot lock poisoned")
            .clone()
            .ok_or(EngineError::NotLoaded)
    }

    /// Returns true once a snapshot has been published.
    pub fn is_loaded(&self) -> bool {
        self.current
            .lock()
            .expect("snapshot lock poisoned")
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, ServiceId, StopId, TimeOfDay, TripId};
    use crate::feed::{Route, ServiceCalendar, Stop, StopTime, Trip};

    fn tiny_tables(stop_name: &str) -> FeedTables {
        FeedTables {
            stops: vec![Stop {
                id: StopId::new("S1"),
                name: stop_name.to_string(),
                lat: 46.5,
                lon: 11.7,
                place: "P".into(),
                region: "R".into(),
            }],
            routes: vec![Route {
                id: RouteId::new("R1"),
                short_name: "1".into(),
                long_name: String::new(),
                mode: "Bus".into(),
                agency_id: String::new(),
            }],
            trips: vec![Trip {
                id: TripId::new("T1"),
                route_id: RouteId::new("R1"),
                service_id: ServiceId::new("SVC1"),
                headsign: None,
                shape_id: None,
            }],
            stop_times: vec![StopTime {
                trip_id: TripId::new("T1"),
                stop_id: StopId::new("S1"),
                arrival: TimeOfDay::parse("08:00:00").unwrap(),
                departure: TimeOfDay::parse("08:00:00").unwrap(),
                sequence: 1,
            }],
            calendars: vec![ServiceCalendar {
                service_id: ServiceId::new("SVC1"),
                monday: true,
                tuesday: true,
                wednesday: true,
                thursday: true,
                friday: true,
                saturday: true,
                sunday: true,
                start_date: 20240101,
                end_date: 20241231,
            }],
            exceptions: vec![],
        }
    }

    #[test]
    fn querying_before_any_load_fails_fast() {
        let engine = ScheduleEngine::new();
        assert!(!engine.is_loaded());
        assert_eq!(engine.snapshot().unwrap_err(), EngineError::NotLoaded);
    }

    #[test]
    fn publish_makes_the_snapshot_available() {
        let engine = ScheduleEngine::new();
        engine.publish(tiny_tables("Selva"));

        assert!(engine.is_loaded());
        let snapshot = engine.snapshot().unwrap();
        assert!(snapshot.station("Selva").is_some());
    }

    #[test]
    fn readers_in_flight_keep_the_old_snapshot() {
        let engine = ScheduleEngine::new();
        engine.publish(tiny_tables("Old Name"));
        let held = engine.snapshot().unwrap();

        engine.publish(tiny_tables("New Name"));

        // The held snapshot is unchanged; a fresh read sees the new one
        assert!(held.station("Old Name").is_some());
        assert!(held.station("New Name").is_none());

        let fresh = engine.snapshot().unwrap();
        assert!(fresh.station("New Name").is_some());
        assert!(!Arc::ptr_eq(&held, &fresh));
    }

    #[test]
    fn concurrent_readers_share_one_snapshot() {
        let engine = Arc::new(ScheduleEngine::new());
        engine.publish(tiny_tables("Selva"));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    let snapshot = engine.snapshot().unwrap();
                    snapshot.station("Selva").is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}

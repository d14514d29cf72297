//! Immutable query snapshot.
//!
//! One snapshot owns a loaded set of feed tables plus everything derived
//! from them: the resolved destination map, the consolidated station list,
//! and the lookup indices the queries need. Building is the expensive part;
//! once built, a snapshot is never mutated and any number of readers can
//! share it.

use std::collections::HashMap;

use tracing::info;

use crate::destinations::TripDestinations;
use crate::domain::{RouteId, StopId, TripId};
use crate::feed::FeedTables;
use crate::stations::{consolidate, Station};

/// An immutable, fully indexed view of one loaded feed.
#[derive(Debug)]
pub struct Snapshot {
    pub(super) tables: FeedTables,
    pub(super) destinations: TripDestinations,
    pub(super) stations: Vec<Station>,
    pub(super) station_by_name: HashMap<String, usize>,
    pub(super) trips_by_id: HashMap<TripId, usize>,
    pub(super) routes_by_id: HashMap<RouteId, usize>,
    /// Stop-time indices per trip, ordered by sequence number.
    pub(super) stop_times_by_trip: HashMap<TripId, Vec<usize>>,
    /// Stop-time indices per stop, in table order.
    pub(super) stop_times_by_stop: HashMap<StopId, Vec<usize>>,
}

impl Snapshot {
    /// Derive the caches and indices from a loaded set of tables.
    pub fn build(tables: FeedTables) -> Self {
        let destinations =
            TripDestinations::resolve(&tables.stops, &tables.trips, &tables.stop_times);
        let stations = consolidate(&tables.stops, &tables.stop_times);

        let station_by_name = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        let trips_by_id = tables
            .trips
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let routes_by_id = tables
            .routes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        let mut stop_times_by_trip: HashMap<TripId, Vec<usize>> = HashMap::new();
        let mut stop_times_by_stop: HashMap<StopId, Vec<usize>> = HashMap::new();
        for (i, stop_time) in tables.stop_times.iter().enumerate() {
            stop_times_by_trip
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(i);
            stop_times_by_stop
                .entry(stop_time.stop_id.clone())
                .or_default()
                .push(i);
        }
        for indices in stop_times_by_trip.values_mut() {
            indices.sort_by_key(|&i| tables.stop_times[i].sequence);
        }

        info!(
            stops = tables.stops.len(),
            routes = tables.routes.len(),
            trips = tables.trips.len(),
            stop_times = tables.stop_times.len(),
            stations = stations.len(),
            destinations = destinations.len(),
            "built timetable snapshot"
        );

        Self {
            tables,
            destinations,
            stations,
            station_by_name,
            trips_by_id,
            routes_by_id,
            stop_times_by_trip,
            stop_times_by_stop,
        }
    }

    /// The raw tables this snapshot was built from.
    pub fn tables(&self) -> &FeedTables {
        &self.tables
    }

    /// All consolidated stations, in first-seen stop-table order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by its exact display name.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.station_by_name.get(name).map(|&i| &self.stations[i])
    }

    /// The resolved trip destination map.
    pub fn destinations(&self) -> &TripDestinations {
        &self.destinations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServiceId, TimeOfDay};
    use crate::feed::{Route, ServiceCalendar, Stop, StopTime, Trip};

    fn tables() -> FeedTables {
        FeedTables {
            stops: vec![
                Stop {
                    id: StopId::new("S1"),
                    name: "Selva".into(),
                    lat: 46.55,
                    lon: 11.76,
                    place: "Wolkenstein".into(),
                    region: "Val Gardena".into(),
                },
                Stop {
                    id: StopId::new("S2"),
                    name: "Ortisei".into(),
                    lat: 46.57,
                    lon: 11.67,
                    place: "St. Ulrich".into(),
                    region: "Val Gardena".into(),
                },
            ],
            routes: vec![Route {
                id: RouteId::new("R1"),
                short_name: "350".into(),
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
            stop_times: vec![
                // Out of sequence order on purpose
                StopTime {
                    trip_id: TripId::new("T1"),
                    stop_id: StopId::new("S2"),
                    arrival: TimeOfDay::parse("08:20:00").unwrap(),
                    departure: TimeOfDay::parse("08:20:00").unwrap(),
                    sequence: 2,
                },
                StopTime {
                    trip_id: TripId::new("T1"),
                    stop_id: StopId::new("S1"),
                    arrival: TimeOfDay::parse("08:00:00").unwrap(),
                    departure: TimeOfDay::parse("08:00:00").unwrap(),
                    sequence: 1,
                },
            ],
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
    fn build_derives_stations_and_destinations() {
        let snapshot = Snapshot::build(tables());

        assert_eq!(snapshot.stations().len(), 2);
        assert!(snapshot.station("Selva").is_some());
        assert!(snapshot.station("Nowhere").is_none());

        // Linear trip: destination is the last stop in sequence order
        assert_eq!(
            snapshot.destinations().get(&TripId::new("T1")),
            Some("Ortisei")
        );
    }

    #[test]
    fn per_trip_index_is_sequence_ordered() {
        let snapshot = Snapshot::build(tables());
        let indices = &snapshot.stop_times_by_trip[&TripId::new("T1")];
        let sequences: Vec<u32> = indices
            .iter()
            .map(|&i| snapshot.tables().stop_times[i].sequence)
            .collect();
        assert_eq!(sequences, [1, 2]);
    }
}

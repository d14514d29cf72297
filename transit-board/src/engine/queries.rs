//! Schedule queries over a snapshot.
//!
//! All four operations are pure reads: they combine the calendar resolver's
//! active-service set for the requested date with the snapshot's indices,
//! then hand board-shaped rows to the deduplicator. Unknown station or
//! route names yield empty results; absence of service is a normal answer
//! in a schedule lookup, not an error.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calendar::active_services;
use crate::dedup::{dedup_board, BoardRow};
use crate::domain::{StopId, TimeOfDay, TripId};
use crate::feed::{Route, Stop, StopTime, Trip};

use super::snapshot::Snapshot;

/// One deduplicated departure from a station.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub time: TimeOfDay,
    /// Route short name, e.g. "350".
    pub route: String,
    pub destination: String,
    pub trip_id: TripId,
}

impl BoardRow for Departure {
    fn route(&self) -> &str {
        &self.route
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn time(&self) -> TimeOfDay {
        self.time
    }
}

/// One direct (single-vehicle) connection between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub departure: TimeOfDay,
    pub arrival: TimeOfDay,
    /// Route short name.
    pub route: String,
    pub destination: String,
    pub trip_id: TripId,
}

impl BoardRow for Connection {
    fn route(&self) -> &str {
        &self.route
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn time(&self) -> TimeOfDay {
        self.departure
    }
}

/// A route and every stop any of its trips visits.
#[derive(Debug)]
pub struct RouteStops<'a> {
    pub route: &'a Route,
    pub stops: Vec<&'a Stop>,
}

impl Snapshot {
    /// All departures from a station after `after` on `date`, deduplicated
    /// and ascending by time.
    ///
    /// Departures whose resolved destination is a station in the same place
    /// as the origin are dropped: a vehicle terminating where it started is
    /// not a useful thing to show on a board.
    pub fn departures_from(
        &self,
        station_name: &str,
        date: NaiveDate,
        after: TimeOfDay,
    ) -> Vec<Departure> {
        let Some(station) = self.station(station_name) else {
            return Vec::new();
        };
        let active = active_services(&self.tables.calendars, &self.tables.exceptions, date);

        let mut rows = Vec::new();
        for stop_id in &station.members {
            let Some(indices) = self.stop_times_by_stop.get(stop_id) else {
                continue;
            };
            for &i in indices {
                let stop_time = &self.tables.stop_times[i];
                if stop_time.departure < after {
                    continue;
                }
                let Some((trip, route)) = self.trip_and_route(&stop_time.trip_id) else {
                    continue;
                };
                if !active.contains(&trip.service_id) {
                    continue;
                }
                rows.push(Departure {
                    time: stop_time.departure,
                    route: route.short_name.clone(),
                    destination: self.destination_for(trip, route),
                    trip_id: trip.id.clone(),
                });
            }
        }

        let rows = dedup_board(rows);

        // Destinations within the origin's own place are round trips from
        // the rider's point of view
        let local_names: HashSet<&str> = self
            .stations
            .iter()
            .filter(|s| s.place == station.place)
            .map(|s| s.name.as_str())
            .collect();
        rows.into_iter()
            .filter(|d| !local_names.contains(d.destination.as_str()))
            .collect()
    }

    /// Direct connections from `origin_name` to `dest_name` after `after`
    /// on `date`, deduplicated and ascending by departure.
    ///
    /// A trip qualifies when it visits an origin member strictly before a
    /// destination member; boarding is the first qualifying origin visit and
    /// alighting the first destination visit after it, in sequence order.
    pub fn direct_connections(
        &self,
        origin_name: &str,
        dest_name: &str,
        date: NaiveDate,
        after: TimeOfDay,
    ) -> Vec<Connection> {
        let (Some(origin), Some(dest)) = (self.station(origin_name), self.station(dest_name))
        else {
            return Vec::new();
        };
        let origin_ids: HashSet<&StopId> = origin.members.iter().collect();
        let dest_ids: HashSet<&StopId> = dest.members.iter().collect();
        let active = active_services(&self.tables.calendars, &self.tables.exceptions, date);

        let mut rows = Vec::new();
        for trip in &self.tables.trips {
            if !active.contains(&trip.service_id) {
                continue;
            }
            let Some(indices) = self.stop_times_by_trip.get(&trip.id) else {
                continue;
            };

            let visits: Vec<&StopTime> =
                indices.iter().map(|&i| &self.tables.stop_times[i]).collect();
            let origin_visits: Vec<&StopTime> = visits
                .iter()
                .copied()
                .filter(|st| origin_ids.contains(&st.stop_id))
                .collect();
            let dest_visits: Vec<&StopTime> = visits
                .iter()
                .copied()
                .filter(|st| dest_ids.contains(&st.stop_id))
                .collect();

            let mut pair = None;
            for boarding in &origin_visits {
                if let Some(alighting) =
                    dest_visits.iter().find(|d| d.sequence > boarding.sequence)
                {
                    pair = Some((*boarding, *alighting));
                    break;
                }
            }
            let Some((boarding, alighting)) = pair else {
                continue;
            };
            if boarding.departure < after {
                continue;
            }

            let Some(&route_idx) = self.routes_by_id.get(&trip.route_id) else {
                continue;
            };
            let route = &self.tables.routes[route_idx];
            rows.push(Connection {
                departure: boarding.departure,
                arrival: alighting.arrival,
                route: route.short_name.clone(),
                destination: self.destination_for(trip, route),
                trip_id: trip.id.clone(),
            });
        }

        dedup_board(rows)
    }

    /// The first route with this short name and every stop it serves.
    ///
    /// Returns `None` for an unknown route name.
    pub fn stops_of_route(&self, short_name: &str) -> Option<RouteStops<'_>> {
        let route = self
            .tables
            .routes
            .iter()
            .find(|r| r.short_name == short_name)?;

        let mut visited: HashSet<&StopId> = HashSet::new();
        for trip in self.tables.trips.iter().filter(|t| t.route_id == route.id) {
            if let Some(indices) = self.stop_times_by_trip.get(&trip.id) {
                for &i in indices {
                    visited.insert(&self.tables.stop_times[i].stop_id);
                }
            }
        }

        let stops = self
            .tables
            .stops
            .iter()
            .filter(|s| visited.contains(&s.id))
            .collect();
        Some(RouteStops { route, stops })
    }

    /// Every route with a trip visiting a stop whose place label contains
    /// `place`, case-insensitively. Routes come back in table order.
    pub fn routes_serving(&self, place: &str) -> Vec<&Route> {
        let needle = place.to_lowercase();
        let matching_stops: HashSet<&StopId> = self
            .tables
            .stops
            .iter()
            .filter(|s| s.place.to_lowercase().contains(&needle))
            .map(|s| &s.id)
            .collect();
        if matching_stops.is_empty() {
            return Vec::new();
        }

        let mut trip_ids: HashSet<&TripId> = HashSet::new();
        for stop_time in &self.tables.stop_times {
            if matching_stops.contains(&stop_time.stop_id) {
                trip_ids.insert(&stop_time.trip_id);
            }
        }

        let route_ids: HashSet<_> = self
            .tables
            .trips
            .iter()
            .filter(|t| trip_ids.contains(&t.id))
            .map(|t| &t.route_id)
            .collect();

        self.tables
            .routes
            .iter()
            .filter(|r| route_ids.contains(&r.id))
            .collect()
    }

    fn trip_and_route(&self, trip_id: &TripId) -> Option<(&Trip, &Route)> {
        let trip = &self.tables.trips[*self.trips_by_id.get(trip_id)?];
        let route = &self.tables.routes[*self.routes_by_id.get(&trip.route_id)?];
        Some((trip, route))
    }

    /// Resolved destination for a trip, falling back to the route name for
    /// trips the resolver had nothing for.
    fn destination_for(&self, trip: &Trip, route: &Route) -> String {
        match self.destinations.get(&trip.id) {
            Some(dest) => dest.to_string(),
            None => format!("Route {}", route.short_name),
        }
    }
}

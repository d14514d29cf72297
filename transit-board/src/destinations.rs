//! Trip destination resolution.
//!
//! Many feeds leave `trip_headsign` blank, but a departure board without a
//! destination column is useless. This resolver assigns every trip exactly
//! one non-empty destination through a three-level fallback, computed once
//! per snapshot:
//!
//! 1. the trip's own declared headsign, if non-empty after trimming;
//! 2. the most common non-empty headsign among trips on the same route;
//! 3. a geometric fallback from the trip's stop sequence: the last stop
//!    for linear trips, or the stop farthest from the origin for circular
//!    ones.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{RouteId, StopId, TripId};
use crate::feed::{Stop, StopTime, Trip};

/// Cached mapping from trip to resolved destination.
///
/// Built once per snapshot and queried, never mutated, by every downstream
/// component. Trips with zero stop-times get no entry.
#[derive(Debug, Default)]
pub struct TripDestinations {
    map: HashMap<TripId, String>,
}

impl TripDestinations {
    /// Resolve a destination for every trip with at least one stop-time.
    pub fn resolve(stops: &[Stop], trips: &[Trip], stop_times: &[StopTime]) -> Self {
        let stops_by_id: HashMap<&StopId, &Stop> = stops.iter().map(|s| (&s.id, s)).collect();

        // Stop sequence per trip, ordered by sequence number
        let mut sequences: HashMap<&TripId, Vec<&StopTime>> = HashMap::new();
        for stop_time in stop_times {
            sequences.entry(&stop_time.trip_id).or_default().push(stop_time);
        }
        for visits in sequences.values_mut() {
            visits.sort_by_key(|st| st.sequence);
        }

        // Most common non-empty headsign per route, candidates collected in
        // trip-table order so the tie-break is deterministic
        let mut declared: HashMap<&RouteId, Vec<&str>> = HashMap::new();
        for trip in trips {
            if let Some(headsign) = trip.headsign.as_deref() {
                let trimmed = headsign.trim();
                if !trimmed.is_empty() {
                    declared.entry(&trip.route_id).or_default().push(trimmed);
                }
            }
        }
        let sibling: HashMap<&RouteId, &str> = declared
            .iter()
            .filter_map(|(route, values)| {
                most_common(values.iter().copied()).map(|v| (*route, v))
            })
            .collect();

        let mut map = HashMap::new();
        let mut unresolved = 0usize;

        for trip in trips {
            let headsign = trip.headsign.as_deref().map(str::trim).unwrap_or("");
            if !headsign.is_empty() {
                map.insert(trip.id.clone(), headsign.to_string());
                continue;
            }

            if let Some(dest) = sibling.get(&trip.route_id) {
                map.insert(trip.id.clone(), (*dest).to_string());
                continue;
            }

            let visited: Vec<&Stop> = sequences
                .get(&trip.id)
                .map(|visits| {
                    visits
                        .iter()
                        .filter_map(|st| stops_by_id.get(&st.stop_id).copied())
                        .collect()
                })
                .unwrap_or_default();

            match geometric_destination(&visited) {
                Some(dest) => {
                    map.insert(trip.id.clone(), dest.to_string());
                }
                None => unresolved += 1,
            }
        }

        if unresolved > 0 {
            debug!(unresolved, "trips without stop-times have no destination");
        }

        Self { map }
    }

    /// The resolved destination for a trip, if it has one.
    pub fn get(&self, trip_id: &TripId) -> Option<&str> {
        self.map.get(trip_id).map(String::as_str)
    }

    /// Number of trips with a resolved destination.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no trip has a resolved destination.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Destination from the ordered stop sequence alone.
///
/// A trip whose first and last stop share a display name and which visits
/// more than two stops is circular: its useful destination is the stop
/// farthest from the origin, by squared planar lat/lon distance. The planar
/// formula is kept deliberately: the service areas this runs on are small
/// enough that switching to a geodesic metric would only change which stop
/// wins on genuinely circular routes.
fn geometric_destination<'a>(visited: &[&'a Stop]) -> Option<&'a str> {
    let first = visited.first()?;
    let last = visited.last()?;

    if first.name == last.name && visited.len() > 2 {
        let farthest = visited
            .iter()
            .map(|stop| {
                let dlat = stop.lat - first.lat;
                let dlon = stop.lon - first.lon;
                (stop, dlat * dlat + dlon * dlon)
            })
            // Strictly-greater keeps the first of equally distant stops,
            // matching the fixed tie-break everywhere else in the crate
            .fold(None::<(&&Stop, f64)>, |best, (stop, dist)| match best {
                Some((_, best_dist)) if dist <= best_dist => best,
                _ => Some((stop, dist)),
            })
            .map(|(stop, _)| stop)?;
        return Some(&farthest.name);
    }

    Some(&last.name)
}

/// The most frequent value, ties broken by first occurrence.
///
/// Shared by the sibling-headsign fallback here and the modal-destination
/// preference in the departure deduplicator.
pub(crate) fn most_common<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::ServiceId;
    use proptest::prelude::*;

    fn stop_for(i: usize) -> Stop {
        Stop {
            id: StopId::new(format!("S{i}")),
            name: format!("Stop {i}"),
            lat: i as f64,
            lon: 0.0,
            place: String::new(),
            region: String::new(),
        }
    }

    proptest! {
        /// Totality: every trip that visits at least one known stop resolves
        /// to a non-empty destination.
        #[test]
        fn resolution_is_total(
            headsign in prop::option::of("[a-z]{0,8}"),
            visit_count in 1usize..6,
            num_stops in 6usize..10
        ) {
            let stops: Vec<Stop> = (0..num_stops).map(stop_for).collect();
            let trips = [Trip {
                id: TripId::new("T"),
                route_id: RouteId::new("R"),
                service_id: ServiceId::new("SVC"),
                headsign,
                shape_id: None,
            }];
            let stop_times: Vec<StopTime> = (0..visit_count)
                .map(|i| StopTime {
                    trip_id: TripId::new("T"),
                    stop_id: StopId::new(format!("S{i}")),
                    arrival: "06:00:00".parse().unwrap(),
                    departure: "06:00:00".parse().unwrap(),
                    sequence: i as u32 + 1,
                })
                .collect();

            let resolved = TripDestinations::resolve(&stops, &trips, &stop_times);
            let dest = resolved.get(&TripId::new("T"));
            prop_assert!(dest.is_some());
            prop_assert!(!dest.unwrap().trim().is_empty());
        }

        /// most_common returns an element of its input
        #[test]
        fn most_common_returns_member(values in prop::collection::vec("[a-c]", 1..20)) {
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            let winner = most_common(refs.iter().copied()).unwrap();
            prop_assert!(refs.contains(&winner));
        }
    }
}

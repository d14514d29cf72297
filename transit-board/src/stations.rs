//! Station consolidation.
//!
//! Feeds record one stop per platform or roadside, so "Ortisei, Sarteur"
//! may appear three times with distinct identifiers. Queries work on the
//! logical station instead: all stops sharing a display name, exactly as
//! written (case-sensitive, no normalization).

use std::collections::HashMap;

use crate::domain::StopId;
use crate::feed::{Stop, StopTime};

/// A logical station: every stop record sharing one display name.
///
/// The centroid is the arithmetic mean of member coordinates and need not
/// coincide with any real stop. Place and region are taken from the first
/// member in stop-table order.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    /// Identifiers of all member stop records.
    pub members: Vec<StopId>,
    /// Total stop-time rows across all members.
    pub departures: usize,
    pub lat: f64,
    pub lon: f64,
    pub place: String,
    pub region: String,
}

/// Group stops by display name into stations, in first-seen input order.
///
/// Every stop belongs to exactly one station; every station has at least
/// one member.
pub fn consolidate(stops: &[Stop], stop_times: &[StopTime]) -> Vec<Station> {
    let mut departure_counts: HashMap<&StopId, usize> = HashMap::new();
    for stop_time in stop_times {
        *departure_counts.entry(&stop_time.stop_id).or_insert(0) += 1;
    }

    struct Group {
        station: Station,
        lat_sum: f64,
        lon_sum: f64,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for stop in stops {
        let departures = departure_counts.get(&stop.id).copied().unwrap_or(0);
        match index.get(stop.name.as_str()) {
            Some(&i) => {
                let group = &mut groups[i];
                group.station.members.push(stop.id.clone());
                group.station.departures += departures;
                group.lat_sum += stop.lat;
                group.lon_sum += stop.lon;
            }
            None => {
                index.insert(&stop.name, groups.len());
                groups.push(Group {
                    station: Station {
                        name: stop.name.clone(),
                        members: vec![stop.id.clone()],
                        departures,
                        lat: 0.0,
                        lon: 0.0,
                        place: stop.place.clone(),
                        region: stop.region.clone(),
                    },
                    lat_sum: stop.lat,
                    lon_sum: stop.lon,
                });
            }
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let n = group.station.members.len() as f64;
            Station {
                lat: group.lat_sum / n,
                lon: group.lon_sum / n,
                ..group.station
            }
        })
        .collect()
}

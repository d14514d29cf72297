//! Trip records.

use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::domain::{RouteId, ServiceId, TripId};

use super::FeedError;

/// A scheduled trip: one vehicle run along a route under a service pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    /// Declared rider-facing destination text; absent or blank in many feeds,
    /// in which case the destination resolver fills it in.
    pub headsign: Option<String>,
    /// Shape reference for map rendering; unused by the engine itself.
    pub shape_id: Option<String>,
}

#[derive(Deserialize)]
struct Record {
    trip_id: String,
    route_id: String,
    service_id: String,
    #[serde(default)]
    trip_headsign: String,
    #[serde(default)]
    shape_id: String,
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

pub(super) fn load<R: Read>(reader: R) -> Result<Vec<Trip>, FeedError> {
    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for record in csv::Reader::from_reader(reader).deserialize::<Record>() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.trip_id.is_empty() || record.route_id.is_empty() || record.service_id.is_empty()
        {
            skipped += 1;
            continue;
        }
        trips.push(Trip {
            id: TripId::new(record.trip_id),
            route_id: RouteId::new(record.route_id),
            service_id: ServiceId::new(record.service_id),
            headsign: non_empty(record.trip_headsign),
            shape_id: non_empty(record.shape_id),
        });
    }

    if skipped > 0 {
        warn!(table = "trips", skipped, "skipped malformed rows");
    }
    if trips.is_empty() {
        return Err(FeedError::EmptyTable { table: "trips" });
    }
    Ok(trips)
}

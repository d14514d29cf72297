//! Stop records.

use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::domain::StopId;

use super::FeedError;

/// A physical stop record from the feed.
///
/// Many stops may share a display name (one per platform or roadside); the
/// station consolidator groups those into a logical station.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    /// Rider-facing display name, e.g. "Ortisei, Sarteur".
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Place label the stop belongs to, e.g. "Wolkenstein".
    pub place: String,
    /// Wider region label, e.g. "Val Gardena".
    pub region: String,
}

#[derive(Deserialize)]
struct Record {
    stop_id: String,
    stop_name: String,
    stop_lat: f64,
    stop_lon: f64,
    #[serde(default)]
    location: String,
    #[serde(default)]
    region: String,
}

pub(super) fn load<R: Read>(reader: R) -> Result<Vec<Stop>, FeedError> {
    let mut stops = Vec::new();
    let mut skipped = 0usize;

    for record in csv::Reader::from_reader(reader).deserialize::<Record>() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.stop_id.is_empty() || record.stop_name.is_empty() {
            skipped += 1;
            continue;
        }
        stops.push(Stop {
            id: StopId::new(record.stop_id),
            name: record.stop_name,
            lat: record.stop_lat,
            lon: record.stop_lon,
            place: record.location,
            region: record.region,
        });
    }

    if skipped > 0 {
        warn!(table = "stops", skipped, "skipped malformed rows");
    }
    if stops.is_empty() {
        return Err(FeedError::EmptyTable { table: "stops" });
    }
    Ok(stops)
}

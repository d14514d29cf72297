//! Stop-time records.

use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::domain::{StopId, TimeOfDay, TripId};

use super::FeedError;

/// One visit of a trip to a stop.
///
/// Sequence numbers are strictly increasing within a trip and define
/// traversal order; the loader does not re-sort rows, the snapshot's
/// per-trip index does.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub arrival: TimeOfDay,
    pub departure: TimeOfDay,
    pub sequence: u32,
}

#[derive(Deserialize)]
struct Record {
    trip_id: String,
    arrival_time: String,
    departure_time: String,
    stop_id: String,
    stop_sequence: u32,
}

pub(super) fn load<R: Read>(reader: R) -> Result<Vec<StopTime>, FeedError> {
    let mut stop_times = Vec::new();
    let mut skipped = 0usize;

    for record in csv::Reader::from_reader(reader).deserialize::<Record>() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.trip_id.is_empty() || record.stop_id.is_empty() {
            skipped += 1;
            continue;
        }
        let (Ok(arrival), Ok(departure)) = (
            TimeOfDay::parse(&record.arrival_time),
            TimeOfDay::parse(&record.departure_time),
        ) else {
            skipped += 1;
            continue;
        };
        stop_times.push(StopTime {
            trip_id: TripId::new(record.trip_id),
            stop_id: StopId::new(record.stop_id),
            arrival,
            departure,
            sequence: record.stop_sequence,
        });
    }

    if skipped > 0 {
        warn!(table = "stop_times", skipped, "skipped malformed rows");
    }
    if stop_times.is_empty() {
        return Err(FeedError::EmptyTable { table: "stop_times" });
    }
    Ok(stop_times)
}

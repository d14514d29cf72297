//! Route records.

use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::domain::RouteId;

use super::FeedError;

/// A route from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: RouteId,
    /// Short rider-facing name, e.g. "350".
    pub short_name: String,
    /// Longer descriptive name; may be empty.
    pub long_name: String,
    /// Transport mode, e.g. "Bus" or "Rail".
    pub mode: String,
    /// Operating agency reference; may be empty.
    pub agency_id: String,
}

#[derive(Deserialize)]
struct Record {
    route_id: String,
    #[serde(default)]
    route_short_name: String,
    #[serde(default)]
    route_long_name: String,
    #[serde(default)]
    route_type: String,
    #[serde(default)]
    agency_id: String,
}

pub(super) fn load<R: Read>(reader: R) -> Result<Vec<Route>, FeedError> {
    let mut routes = Vec::new();
    let mut skipped = 0usize;

    for record in csv::Reader::from_reader(reader).deserialize::<Record>() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.route_id.is_empty() {
            skipped += 1;
            continue;
        }
        routes.push(Route {
            id: RouteId::new(record.route_id),
            short_name: record.route_short_name,
            long_name: record.route_long_name,
            mode: record.route_type,
            agency_id: record.agency_id,
        });
    }

    if skipped > 0 {
        warn!(table = "routes", skipped, "skipped malformed rows");
    }
    if routes.is_empty() {
        return Err(FeedError::EmptyTable { table: "routes" });
    }
    Ok(routes)
}

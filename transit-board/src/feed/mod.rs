//! Feed loading: the six timetable tables from a directory of CSV files.
//!
//! The loader is deliberately permissive about individual rows, mirroring
//! how the feed itself is produced: a malformed row (missing required
//! fields, unparseable numbers or times) is dropped and counted, and the
//! per-table count is logged at WARN. A required table with zero usable
//! rows is a hard error, since an engine with no stops or no trips cannot
//! answer anything. `calendar_dates.csv` is the one optional table, since
//! feeds without exceptions exist.
//!
//! Expected files: `stops.csv`, `routes.csv`, `trips.csv`,
//! `stop_times.csv`, `calendar.csv` and optionally `calendar_dates.csv`.

mod calendar;
mod routes;
mod stop_times;
mod stops;
mod trips;

use std::fs::File;
use std::path::{Path, PathBuf};

pub use calendar::{CalendarException, ExceptionKind, ServiceCalendar};
pub use routes::Route;
pub use stop_times::StopTime;
pub use stops::Stop;
pub use trips::Trip;

/// Error from loading a feed directory.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A table file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required table produced no usable rows at all.
    #[error("table {table} contains no usable rows")]
    EmptyTable { table: &'static str },
}

/// The complete set of raw timetable tables.
///
/// Immutable once loaded; the engine derives everything else from these and
/// never writes back.
#[derive(Debug)]
pub struct FeedTables {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendars: Vec<ServiceCalendar>,
    pub exceptions: Vec<CalendarException>,
}

impl FeedTables {
    /// Load all tables from a directory of CSV files.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let dir = dir.as_ref();

        let stops = stops::load(open(dir.join("stops.csv"))?)?;
        let routes = routes::load(open(dir.join("routes.csv"))?)?;
        let trips = trips::load(open(dir.join("trips.csv"))?)?;
        let stop_times = stop_times::load(open(dir.join("stop_times.csv"))?)?;
        let calendars = calendar::load_calendars(open(dir.join("calendar.csv"))?)?;

        let exceptions_path = dir.join("calendar_dates.csv");
        let exceptions = if exceptions_path.exists() {
            calendar::load_exceptions(open(exceptions_path)?)?
        } else {
            Vec::new()
        };

        Ok(Self {
            stops,
            routes,
            trips,
            stop_times,
            calendars,
            exceptions,
        })
    }
}

fn open(path: PathBuf) -> Result<File, FeedError> {
    File::open(&path).map_err(|source| FeedError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_minimal_feed(dir: &Path) {
        std::fs::write(
            dir.join("stops.csv"),
            "stop_id,stop_name,stop_lat,stop_lon,location,region\n\
             S1,\"Selva, Piazza Nives\",46.55,11.76,Wolkenstein,Val Gardena\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("routes.csv"),
            "route_id,route_short_name,route_long_name,route_type,agency_id\n\
             R360,360,Val Gardena Express,Bus,STA\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("trips.csv"),
            "trip_id,route_id,service_id,trip_headsign,shape_id\n\
             T1,R360,SVC1,,\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("stop_times.csv"),
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
             T1,07:00:00,07:00:00,S1,1\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("calendar.csv"),
            "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
             SVC1,1,1,1,1,1,1,1,20240101,20241231\n",
        )
        .unwrap();
    }

    #[test]
    fn load_from_dir_without_exceptions_file() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_feed(dir.path());

        let tables = FeedTables::load_from_dir(dir.path()).unwrap();
        assert_eq!(tables.stops.len(), 1);
        assert_eq!(tables.routes.len(), 1);
        assert_eq!(tables.trips.len(), 1);
        assert_eq!(tables.stop_times.len(), 1);
        assert_eq!(tables.calendars.len(), 1);
        assert!(tables.exceptions.is_empty());
    }

    #[test]
    fn load_from_dir_with_exceptions_file() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_feed(dir.path());
        std::fs::write(
            dir.path().join("calendar_dates.csv"),
            "service_id,date,exception_type\n\
             SVC1,20240601,2\n",
        )
        .unwrap();

        let tables = FeedTables::load_from_dir(dir.path()).unwrap();
        assert_eq!(tables.exceptions.len(), 1);
        assert_eq!(tables.exceptions[0].kind, ExceptionKind::Removed);
    }

    #[test]
    fn missing_required_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // No files at all
        let result = FeedTables::load_from_dir(dir.path());
        assert!(matches!(result, Err(FeedError::Io { .. })));
    }

    #[test]
    fn empty_required_table_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_feed(dir.path());
        std::fs::write(
            dir.path().join("trips.csv"),
            "trip_id,route_id,service_id,trip_headsign,shape_id\n",
        )
        .unwrap();

        let result = FeedTables::load_from_dir(dir.path());
        assert!(matches!(
            result,
            Err(FeedError::EmptyTable { table: "trips" })
        ));
    }
}

//! Service calendar resolution.
//!
//! Answers "which services run on this date?" from the weekly patterns plus
//! the date-specific exception table. Pure function of its inputs; dates
//! with no matching calendar simply yield an empty set.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::domain::ServiceId;
use crate::feed::{CalendarException, ExceptionKind, ServiceCalendar};

/// Convert a calendar date to the feed's 8-digit `YYYYMMDD` integer form.
pub fn date_to_int(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// The set of services active on `date`.
///
/// Base set: calendars whose weekday flag for `date` is set and whose
/// inclusive validity range contains `date`. Exceptions dated exactly `date`
/// are then applied in fixed order (ADDED unioned in first, REMOVED
/// subtracted last), so a REMOVED exception always wins over an ADDED one
/// for the same service on the same date.
pub fn active_services(
    calendars: &[ServiceCalendar],
    exceptions: &[CalendarException],
    date: NaiveDate,
) -> HashSet<ServiceId> {
    let date_int = date_to_int(date);
    let weekday = date.weekday();

    let mut active: HashSet<ServiceId> = calendars
        .iter()
        .filter(|c| c.runs_on(weekday) && c.start_date <= date_int && date_int <= c.end_date)
        .map(|c| c.service_id.clone())
        .collect();

    for exception in exceptions.iter().filter(|e| e.date == date_int) {
        if exception.kind == ExceptionKind::Added {
            active.insert(exception.service_id.clone());
        }
    }
    for exception in exceptions.iter().filter(|e| e.date == date_int) {
        if exception.kind == ExceptionKind::Removed {
            active.remove(&exception.service_id);
        }
    }

    active
}

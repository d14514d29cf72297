//! Service calendar and exception records.

use std::io::Read;

use chrono::Weekday;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::domain::ServiceId;

use super::FeedError;

/// Weekly running pattern of a service, with an inclusive validity range.
///
/// Dates are 8-digit `YYYYMMDD` integers exactly as in the feed; the
/// calendar resolver compares them numerically.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCalendar {
    pub service_id: ServiceId,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: u32,
    pub end_date: u32,
}

impl ServiceCalendar {
    /// Does the weekly pattern include this day of the week?
    pub fn runs_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Whether a calendar exception adds or removes service on its date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionKind {
    Added,
    Removed,
}

impl ExceptionKind {
    /// Map the feed's numeric exception_type (1 = added, 2 = removed).
    fn from_feed(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Added),
            2 => Some(Self::Removed),
            _ => None,
        }
    }
}

/// A date-specific exception to a service's weekly pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarException {
    pub service_id: ServiceId,
    /// `YYYYMMDD` integer.
    pub date: u32,
    pub kind: ExceptionKind,
}

#[derive(Deserialize)]
struct CalendarRecord {
    service_id: String,
    #[serde(deserialize_with = "parse_bool")]
    monday: bool,
    #[serde(deserialize_with = "parse_bool")]
    tuesday: bool,
    #[serde(deserialize_with = "parse_bool")]
    wednesday: bool,
    #[serde(deserialize_with = "parse_bool")]
    thursday: bool,
    #[serde(deserialize_with = "parse_bool")]
    friday: bool,
    #[serde(deserialize_with = "parse_bool")]
    saturday: bool,
    #[serde(deserialize_with = "parse_bool")]
    sunday: bool,
    start_date: u32,
    end_date: u32,
}

fn parse_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let n = <u8>::deserialize(d)?;
    match n {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(serde::de::Error::custom(format!("unknown bool value {n}"))),
    }
}

pub(super) fn load_calendars<R: Read>(reader: R) -> Result<Vec<ServiceCalendar>, FeedError> {
    let mut calendars = Vec::new();
    let mut skipped = 0usize;

    for record in csv::Reader::from_reader(reader).deserialize::<CalendarRecord>() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.service_id.is_empty() {
            skipped += 1;
            continue;
        }
        calendars.push(ServiceCalendar {
            service_id: ServiceId::new(record.service_id),
            monday: record.monday,
            tuesday: record.tuesday,
            wednesday: record.wednesday,
            thursday: record.thursday,
            friday: record.friday,
            saturday: record.saturday,
            sunday: record.sunday,
            start_date: record.start_date,
            end_date: record.end_date,
        });
    }

    if skipped > 0 {
        warn!(table = "calendar", skipped, "skipped malformed rows");
    }
    if calendars.is_empty() {
        return Err(FeedError::EmptyTable { table: "calendar" });
    }
    Ok(calendars)
}

#[derive(Deserialize)]
struct ExceptionRecord {
    service_id: String,
    date: u32,
    exception_type: u8,
}

/// Exceptions are optional: a missing or empty table simply means the weekly
/// patterns apply unmodified, so this never reports `EmptyTable`.
pub(super) fn load_exceptions<R: Read>(reader: R) -> Result<Vec<CalendarException>, FeedError> {
    let mut exceptions = Vec::new();
    let mut skipped = 0usize;

    for record in csv::Reader::from_reader(reader).deserialize::<ExceptionRecord>() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let Some(kind) = ExceptionKind::from_feed(record.exception_type) else {
            skipped += 1;
            continue;
        };
        if record.service_id.is_empty() {
            skipped += 1;
            continue;
        }
        exceptions.push(CalendarException {
            service_id: ServiceId::new(record.service_id),
            date: record.date,
            kind,
        });
    }

    if skipped > 0 {
        warn!(table = "calendar_dates", skipped, "skipped malformed rows");
    }
    Ok(exceptions)
}

//! Time-of-day handling for timetable data.
//!
//! The feed provides times as fixed-width "HH:MM:SS" strings in local
//! wall-clock time. Hours may exceed 23 for services that run past midnight
//! (a 01:15 bus on a Friday-night timetable is recorded as "25:15:00"), so
//! this is a duration since the service day's midnight, not a clock reading.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day from the timetable.
///
/// Ordering agrees with lexicographic ordering of the validated fixed-width
/// strings, so "schedules sorted as text" and "schedules sorted as times"
/// are the same thing.
///
/// # Examples
///
/// ```
/// use transit_board::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse("07:30:00").unwrap();
/// assert_eq!(t.to_string(), "07:30:00");
/// assert_eq!(t.minutes_since_midnight(), 450);
///
/// // Post-midnight service is valid
/// let late = TimeOfDay::parse("25:15:00").unwrap();
/// assert!(late > t);
///
/// // Loose formats are rejected
/// assert!(TimeOfDay::parse("7:30:00").is_err());
/// assert!(TimeOfDay::parse("07:30").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TimeOfDay {
    /// Parse a time from fixed-width "HH:MM:SS" format.
    ///
    /// Hours are not capped at 23: GTFS semantics allow "24:xx" and later
    /// for post-midnight service. Minutes and seconds must be below 60.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != 8 {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeError::new("expected colons at positions 2 and 5"));
        }

        let hours = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;

        let minutes = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let seconds = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeError::new("invalid second digits"))?;
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Returns the hour component (0-99; 24 and above mean "next day").
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Returns the minute component (0-59).
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns the second component (0-59).
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Whole minutes since the service day's midnight, seconds dropped.
    ///
    /// This is the resolution the departure deduplicator works at.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hours * 60 + self.minutes
    }

    /// Total seconds since the service day's midnight.
    pub fn total_seconds(&self) -> u32 {
        (self.hours * 60 + self.minutes) * 60 + self.seconds
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_seconds().cmp(&other.total_seconds())
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeOfDay({:02}:{:02}:{:02})",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = TimeOfDay::parse("00:00:00").unwrap();
        assert_eq!((t.hours(), t.minutes(), t.seconds()), (0, 0, 0));

        let t = TimeOfDay::parse("23:59:59").unwrap();
        assert_eq!((t.hours(), t.minutes(), t.seconds()), (23, 59, 59));

        let t = TimeOfDay::parse("07:30:15").unwrap();
        assert_eq!((t.hours(), t.minutes(), t.seconds()), (7, 30, 15));
    }

    #[test]
    fn parse_post_midnight() {
        // Hours past 23 are valid: service on the previous day's timetable
        let t = TimeOfDay::parse("24:05:00").unwrap();
        assert_eq!(t.hours(), 24);
        assert_eq!(t.minutes_since_midnight(), 24 * 60 + 5);

        let t = TimeOfDay::parse("25:15:00").unwrap();
        assert!(t > TimeOfDay::parse("23:59:59").unwrap());
    }

    #[test]
    fn parse_invalid_format() {
        // Wrong length
        assert!(TimeOfDay::parse("7:30:00").is_err());
        assert!(TimeOfDay::parse("07:30").is_err());
        assert!(TimeOfDay::parse("07:30:00:00").is_err());
        assert!(TimeOfDay::parse("").is_err());

        // Wrong separators
        assert!(TimeOfDay::parse("07-30-00").is_err());
        assert!(TimeOfDay::parse("07.30.00").is_err());

        // Non-digit characters
        assert!(TimeOfDay::parse("ab:cd:ef").is_err());
        assert!(TimeOfDay::parse("0a:30:00").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(TimeOfDay::parse("12:60:00").is_err());
        assert!(TimeOfDay::parse("12:99:00").is_err());
        assert!(TimeOfDay::parse("12:00:60").is_err());
        assert!(TimeOfDay::parse("12:00:99").is_err());
    }

    #[test]
    fn display_roundtrip() {
        for s in ["00:00:00", "09:05:30", "23:59:59", "26:10:00"] {
            assert_eq!(TimeOfDay::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn ordering() {
        let t1 = TimeOfDay::parse("10:00:00").unwrap();
        let t2 = TimeOfDay::parse("10:00:01").unwrap();
        let t3 = TimeOfDay::parse("11:00:00").unwrap();

        assert!(t1 < t2);
        assert!(t2 < t3);
        assert!(t1 < t3);
    }

    #[test]
    fn minutes_since_midnight_drops_seconds() {
        let t = TimeOfDay::parse("16:09:45").unwrap();
        assert_eq!(t.minutes_since_midnight(), 16 * 60 + 9);
    }

    #[test]
    fn from_str() {
        let t: TimeOfDay = "08:00:00".parse().unwrap();
        assert_eq!(t.minutes_since_midnight(), 480);
        assert!("bogus".parse::<TimeOfDay>().is_err());
    }
}

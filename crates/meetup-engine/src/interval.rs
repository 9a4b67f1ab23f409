//! Busy intervals in, free slots out.
//!
//! [`BusyInterval`] is what a calendar source reports for one participant.
//! [`FreeSlot`] is a candidate meetup window produced by
//! [`crate::availability::find_mutual_free_slots`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// Label used when a calendar entry has no title.
pub const DEFAULT_BUSY_LABEL: &str = "Busy";

fn default_label() -> String {
    DEFAULT_BUSY_LABEL.to_string()
}

/// A span during which one participant is unavailable.
///
/// `start <= end` is expected but not enforced here; use
/// [`BusyInterval::parse`] for validated construction from raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default = "default_label")]
    pub label: String,
}

impl BusyInterval {
    /// Build an interval with the default `"Busy"` label.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            label: default_label(),
        }
    }

    /// Replace the display label. Empty labels fall back to `"Busy"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.trim().is_empty() {
            default_label()
        } else {
            label
        };
        self
    }

    /// Parse an interval from calendar-style timestamps.
    ///
    /// Each bound may be RFC 3339 (`2026-10-19T14:00:00-04:00`), a naive
    /// datetime (`2026-10-19T14:00:00`) or a bare date (`2026-10-19`, an
    /// all-day entry). Naive values are read as wall-clock time in `tz`.
    ///
    /// # Errors
    /// `InvalidTimestamp` if either bound is unparseable, `InvalidInterval`
    /// if `start` is after `end`.
    pub fn parse(start: &str, end: &str, label: Option<&str>, tz: Tz) -> Result<Self> {
        let start_at = parse_timestamp(start, tz)?;
        let end_at = parse_timestamp(end, tz)?;
        if start_at > end_at {
            return Err(SchedulingError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self::new(start_at, end_at).with_label(label.unwrap_or(DEFAULT_BUSY_LABEL)))
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Which branch of the day scan produced a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Nothing touched the day; the slot is exactly the requested duration
    /// starting at opening time.
    OpenDay,
    /// A whole gap between busy intervals, at least the requested duration.
    Gap,
}

/// A candidate meetup window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Weekday of `start` in the scheduling timezone, e.g. `"Monday"`.
    pub day_label: String,
    /// 12-hour start time in the scheduling timezone, e.g. `"2:30 PM"`.
    pub display_time: String,
    pub duration_minutes: i64,
    pub kind: SlotKind,
}

impl FreeSlot {
    /// Build a slot, deriving its display fields from `start` in `tz`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, kind: SlotKind, tz: Tz) -> Self {
        let local = start.with_timezone(&tz);
        Self {
            start,
            end,
            day_label: local.format("%A").to_string(),
            display_time: local.format("%-I:%M %p").to_string(),
            duration_minutes: (end - start).num_minutes(),
            kind,
        }
    }
}

/// Parse a calendar timestamp into UTC.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD`; naive
/// forms are interpreted as wall-clock time in `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return localize(naive, tz, s);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return localize(date.and_time(NaiveTime::MIN), tz, s);
    }
    Err(SchedulingError::InvalidTimestamp(s.to_string()))
}

fn localize(naive: NaiveDateTime, tz: Tz, raw: &str) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SchedulingError::InvalidTimestamp(format!("{} does not exist in {}", raw, tz.name()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_timestamp_uses_timezone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let dt = parse_timestamp("2026-10-19T09:00:00", tz).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap());
    }

    #[test]
    fn bare_date_is_local_midnight() {
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let dt = parse_timestamp("2026-10-20", tz).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 10, 19, 22, 0, 0).unwrap());
    }

    #[test]
    fn nonexistent_local_time_is_rejected() {
        // Clocks jump from 02:00 to 03:00 on this date.
        let tz: Tz = "America/New_York".parse().unwrap();
        let err = parse_timestamp("2026-03-08T02:30:00", tz).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidTimestamp(_)));
    }

    #[test]
    fn blank_label_falls_back_to_busy() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let interval = BusyInterval::new(at, at).with_label("  ");
        assert_eq!(interval.label, DEFAULT_BUSY_LABEL);
    }
}

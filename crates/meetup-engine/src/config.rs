//! Scheduling window configuration: timezone, working hours, lookahead, cap.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SchedulingError};

/// Days scanned ahead of `now`.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;

/// Upper bound on slots returned to the caller.
pub const MAX_SUGGESTED_SLOTS: usize = 5;

/// Longest lookahead the calculator honours; larger values are clamped.
pub const MAX_LOOKAHEAD_DAYS: u32 = 366;

const DEFAULT_OPEN: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("09:00 is a valid time of day"),
};

const DEFAULT_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(20, 0, 0) {
    Some(time) => time,
    None => panic!("20:00 is a valid time of day"),
};

/// The daily window within which meetups may be proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    open: NaiveTime,
    close: NaiveTime,
}

impl WorkingHours {
    /// # Errors
    /// Returns `SchedulingError::InvalidWorkingHours` unless `open < close`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self> {
        if open >= close {
            return Err(SchedulingError::InvalidWorkingHours { open, close });
        }
        Ok(Self { open, close })
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// Opening and closing instants of `date` in `tz`.
    ///
    /// Returns `None` when either wall-clock time falls in a DST gap.
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    pub fn bounds_on(&self, date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let open = tz.from_local_datetime(&date.and_time(self.open)).earliest()?;
        let close = tz.from_local_datetime(&date.and_time(self.close)).earliest()?;
        Some((open.with_timezone(&Utc), close.with_timezone(&Utc)))
    }
}

impl Default for WorkingHours {
    /// 09:00 to 20:00.
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN,
            close: DEFAULT_CLOSE,
        }
    }
}

/// Everything the calculator needs besides the busy lists and `now`.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityConfig {
    /// Timezone in which calendar days and working hours are evaluated.
    pub timezone: Tz,
    pub working_hours: WorkingHours,
    pub lookahead_days: u32,
    /// `None` returns every qualifying slot.
    pub max_slots: Option<usize>,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            working_hours: WorkingHours::default(),
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            max_slots: Some(MAX_SUGGESTED_SLOTS),
        }
    }
}

impl AvailabilityConfig {
    /// Default configuration in the named IANA timezone.
    ///
    /// # Errors
    /// Returns `SchedulingError::InvalidTimezone` for unknown names.
    pub fn with_timezone(name: &str) -> Result<Self> {
        Ok(Self {
            timezone: parse_timezone(name)?,
            ..Self::default()
        })
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SchedulingError::InvalidTimezone(name.to_string()))
}

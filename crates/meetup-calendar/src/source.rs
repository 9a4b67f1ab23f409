//! The busy-interval source capability and the two-party fetch.
//!
//! A [`BusyIntervalSource`] answers one question: which intervals are busy
//! on this calendar within this range. Each participant brings their own
//! source (and therefore their own credential); the pure calculator in
//! `meetup-engine` never sees either.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use meetup_engine::{find_mutual_free_slots, AvailabilityConfig, BusyInterval, FreeSlot};
use tracing::{debug, instrument};

use crate::error::Result;

/// Calendar used when none is specified.
pub const PRIMARY_CALENDAR: &str = "primary";

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[now, now + days)`, saturating at the latest representable instant.
    pub fn lookahead(now: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: now,
            end: now
                .checked_add_signed(Duration::days(i64::from(days)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// True when `interval` shares any instant with this range.
    pub fn overlaps(&self, interval: &BusyInterval) -> bool {
        interval.start < self.end && interval.end > self.start
    }
}

/// Anything that can report one participant's busy time.
pub trait BusyIntervalSource {
    /// Fetch busy intervals for `calendar_id` overlapping `range`.
    fn fetch_busy(
        &self,
        calendar_id: &str,
        range: TimeRange,
    ) -> impl Future<Output = Result<Vec<BusyInterval>>> + Send;
}

/// In-memory calendars keyed by id.
///
/// Used in tests and as the canned fallback when no live calendar is
/// connected. Unknown ids yield an empty list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    calendars: HashMap<String, Vec<BusyInterval>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>, busy: Vec<BusyInterval>) -> Self {
        self.calendars.insert(calendar_id.into(), busy);
        self
    }
}

impl BusyIntervalSource for StaticSource {
    async fn fetch_busy(&self, calendar_id: &str, range: TimeRange) -> Result<Vec<BusyInterval>> {
        Ok(self
            .calendars
            .get(calendar_id)
            .map(|busy| busy.iter().filter(|b| range.overlaps(b)).cloned().collect())
            .unwrap_or_default())
    }
}

/// One side of a meetup: where to read their calendar from.
#[derive(Debug)]
pub struct Participant<'a, S> {
    pub source: &'a S,
    pub calendar_id: &'a str,
}

impl<'a, S> Participant<'a, S> {
    pub fn new(source: &'a S, calendar_id: &'a str) -> Self {
        Self {
            source,
            calendar_id,
        }
    }

    /// The participant's primary calendar.
    pub fn primary(source: &'a S) -> Self {
        Self::new(source, PRIMARY_CALENDAR)
    }
}

/// Fetch both participants' busy time for the lookahead window, concurrently,
/// and compute their mutual free slots.
///
/// # Errors
/// Propagates the first fetch failure from either source.
#[instrument(skip_all, fields(me = me.calendar_id, them = them.calendar_id))]
pub async fn fetch_mutual_free_slots<A, B>(
    me: Participant<'_, A>,
    them: Participant<'_, B>,
    duration_minutes: u32,
    now: DateTime<Utc>,
    config: &AvailabilityConfig,
) -> Result<Vec<FreeSlot>>
where
    A: BusyIntervalSource,
    B: BusyIntervalSource,
{
    // Slots on the last day may run to closing time, past `now + lookahead`.
    let range = TimeRange::lookahead(now, config.lookahead_days.saturating_add(1));

    let (mine, theirs) = tokio::try_join!(
        me.source.fetch_busy(me.calendar_id, range),
        them.source.fetch_busy(them.calendar_id, range),
    )?;
    debug!(mine = mine.len(), theirs = theirs.len(), "Fetched busy intervals");

    Ok(find_mutual_free_slots(
        &mine,
        &theirs,
        duration_minutes,
        now,
        config,
    ))
}

//! Mutual free-time computation for two participants.
//!
//! Both participants' busy intervals are pooled and sorted, then each local
//! calendar day in the lookahead window is scanned with a monotonic cursor
//! across its working hours. Gaps long enough for the meetup become
//! [`FreeSlot`]s.
//!
//! A day that no busy interval touches yields a single slot of exactly the
//! requested duration at opening time, while a day with busy intervals yields
//! whole gaps. [`SlotKind`] records which branch produced each slot.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::config::{AvailabilityConfig, MAX_LOOKAHEAD_DAYS};
use crate::interval::{BusyInterval, FreeSlot, SlotKind};

/// Meetup length used when the caller has no preference.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// How many leading slots the UI offers as one-tap suggestions.
pub const QUICK_PICK_COUNT: usize = 3;

/// Find candidate meetup slots free for both participants.
///
/// Scans every local calendar day from `now` through `now + lookahead_days`.
/// On each day only `[open, close]` of the working hours is considered, with
/// `open` moved up to `now` on the first day. A slot may run to closing time
/// even on the last day, but none starts after the window end. Busy intervals
/// are matched to a day when their start or end falls on it, so one crossing
/// midnight counts for both days.
///
/// Output is in ascending start order and truncated to `config.max_slots`.
/// A `duration_minutes` of zero is treated as one minute.
pub fn find_mutual_free_slots(
    mine: &[BusyInterval],
    theirs: &[BusyInterval],
    duration_minutes: u32,
    now: DateTime<Utc>,
    config: &AvailabilityConfig,
) -> Vec<FreeSlot> {
    let duration = Duration::minutes(i64::from(duration_minutes.max(1)));
    let tz = config.timezone;
    let window_start = now;
    let lookahead = Duration::days(i64::from(config.lookahead_days.min(MAX_LOOKAHEAD_DAYS)));
    let Some(window_end) = now.checked_add_signed(lookahead) else {
        return Vec::new();
    };

    // Overlaps are left in place; the cursor walk absorbs them.
    // `sort_by_key` is stable, so equal starts keep their input order.
    let mut busy: Vec<&BusyInterval> = mine.iter().chain(theirs.iter()).collect();
    busy.sort_by_key(|b| b.start);

    let first_day = local_date(window_start, tz);
    let last_day = local_date(window_end, tz);

    let mut slots = Vec::new();
    for day in first_day.iter_days().take_while(|d| *d <= last_day) {
        let Some((open, close)) = config.working_hours.bounds_on(day, tz) else {
            trace!(%day, "working hours do not exist on this day");
            continue;
        };
        let open = open.max(window_start);
        if open >= close || open > window_end {
            continue;
        }

        let touching: Vec<&BusyInterval> = busy
            .iter()
            .copied()
            .filter(|b| local_date(b.start, tz) == day || local_date(b.end, tz) == day)
            .collect();

        trace!(%day, busy = touching.len(), "scanning day");

        if touching.is_empty() {
            let end = open + duration;
            if end <= close {
                slots.push(FreeSlot::new(open, end, SlotKind::OpenDay, tz));
            }
            continue;
        }

        let mut cursor = open;
        for b in touching {
            let gap_end = b.start.min(close);
            if gap_end > cursor && gap_end - cursor >= duration && cursor <= window_end {
                slots.push(FreeSlot::new(cursor, gap_end, SlotKind::Gap, tz));
            }
            cursor = cursor.max(b.end);
        }

        if cursor < close && close - cursor >= duration && cursor <= window_end {
            slots.push(FreeSlot::new(cursor, close, SlotKind::Gap, tz));
        }
    }

    if let Some(max) = config.max_slots {
        slots.truncate(max);
    }
    slots
}

/// [`find_mutual_free_slots`] evaluated at the current wall-clock time.
pub fn find_mutual_free_slots_now(
    mine: &[BusyInterval],
    theirs: &[BusyInterval],
    duration_minutes: u32,
    config: &AvailabilityConfig,
) -> Vec<FreeSlot> {
    find_mutual_free_slots(mine, theirs, duration_minutes, Utc::now(), config)
}

/// The leading slots offered as quick suggestions.
pub fn quick_picks(slots: &[FreeSlot]) -> &[FreeSlot] {
    &slots[..slots.len().min(QUICK_PICK_COUNT)]
}

fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, d, h, m, 0).unwrap()
    }

    #[test]
    fn busy_interval_after_closing_caps_gap_at_close() {
        // 19 Oct: busy 21:00-22:00 touches the day but sits after closing.
        let config = AvailabilityConfig {
            max_slots: None,
            lookahead_days: 1,
            ..AvailabilityConfig::default()
        };
        let mine = vec![BusyInterval::new(at(19, 21, 0), at(19, 22, 0))];

        let slots = find_mutual_free_slots(&mine, &[], 60, at(19, 8, 0), &config);

        assert_eq!(slots[0].start, at(19, 9, 0));
        assert_eq!(slots[0].end, at(19, 20, 0));
        assert_eq!(slots[0].kind, SlotKind::Gap);
    }

    #[test]
    fn zero_duration_is_treated_as_one_minute() {
        let config = AvailabilityConfig {
            lookahead_days: 0,
            ..AvailabilityConfig::default()
        };
        let slots = find_mutual_free_slots(&[], &[], 0, at(19, 8, 0), &config);
        assert!(slots.is_empty(), "zero-length lookahead window has no room");

        let config = AvailabilityConfig {
            lookahead_days: 1,
            ..AvailabilityConfig::default()
        };
        let slots = find_mutual_free_slots(&[], &[], 0, at(19, 8, 0), &config);
        assert_eq!(slots[0].duration_minutes, 1);
    }

    #[test]
    fn quick_picks_takes_at_most_three() {
        let config = AvailabilityConfig::default();
        let slots = find_mutual_free_slots(&[], &[], 60, at(19, 8, 0), &config);
        assert_eq!(quick_picks(&slots).len(), 3);
        assert_eq!(quick_picks(&slots[..1]).len(), 1);
        assert!(quick_picks(&[]).is_empty());
    }
}

//! # meetup-engine
//!
//! Mutual free-time computation for proposing meetups between two people.
//!
//! Given each participant's busy intervals and a meeting length, the engine
//! returns a short, chronologically ordered list of slots that fall inside
//! daily working hours over the coming week. It performs no I/O: calendar
//! data is fetched elsewhere and handed in as plain values.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use meetup_engine::{find_mutual_free_slots, AvailabilityConfig, BusyInterval};
//!
//! let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
//! let mine = vec![BusyInterval::new(
//!     Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
//! )];
//!
//! let slots = find_mutual_free_slots(&mine, &[], 60, now, &AvailabilityConfig::default());
//! assert_eq!(slots[0].display_time, "12:00 PM");
//! assert_eq!(slots[0].day_label, "Monday");
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — `BusyInterval` / `FreeSlot` and timestamp parsing
//! - [`config`] — timezone, working hours, lookahead and result cap
//! - [`availability`] — the day-by-day gap scan
//! - [`error`] — Error types

pub mod availability;
pub mod config;
pub mod error;
pub mod interval;

pub use availability::{
    find_mutual_free_slots, find_mutual_free_slots_now, quick_picks, DEFAULT_DURATION_MINUTES,
    QUICK_PICK_COUNT,
};
pub use config::{
    AvailabilityConfig, WorkingHours, DEFAULT_LOOKAHEAD_DAYS, MAX_LOOKAHEAD_DAYS,
    MAX_SUGGESTED_SLOTS,
};
pub use error::SchedulingError;
pub use interval::{BusyInterval, FreeSlot, SlotKind, DEFAULT_BUSY_LABEL};

//! # meetup-calendar
//!
//! Calendar integration for meetup scheduling: fetch each participant's busy
//! intervals and feed them to [`meetup_engine::find_mutual_free_slots`].
//!
//! Credentials are explicit values passed to a client, never ambient state,
//! and the scheduling math stays a pure function in `meetup-engine`.
//!
//! ## Modules
//!
//! - [`source`] — `BusyIntervalSource` capability, `StaticSource`, two-party fetch
//! - [`google`] — Google Calendar v3 implementation
//! - [`credentials`] — `AccessToken`
//! - [`error`] — Error types

pub mod credentials;
pub mod error;
pub mod google;
pub mod source;

pub use credentials::{AccessToken, DEFAULT_TOKEN_ENV};
pub use error::CalendarError;
pub use google::GoogleCalendarClient;
pub use source::{
    fetch_mutual_free_slots, BusyIntervalSource, Participant, StaticSource, TimeRange,
    PRIMARY_CALENDAR,
};

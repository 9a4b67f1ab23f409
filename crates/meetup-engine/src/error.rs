//! Error types for meetup-engine input parsing and configuration.
//!
//! The slot calculator itself is total; only the layers that turn raw
//! strings into typed values can fail.

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid busy interval: start {start} is after end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Invalid working hours: {open} must be before {close}")]
    InvalidWorkingHours { open: NaiveTime, close: NaiveTime },
}

pub type Result<T> = std::result::Result<T, SchedulingError>;

//! Error types for calendar fetching.

use meetup_engine::SchedulingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

pub type Result<T> = std::result::Result<T, CalendarError>;

//! Google Calendar busy-interval source.
//!
//! Reads the `events` collection of a calendar with recurring events
//! expanded server-side (`singleEvents=true`). Cancelled and transparent
//! ("show me as available") entries do not block time and are dropped.

use chrono_tz::Tz;
use meetup_engine::BusyInterval;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::credentials::AccessToken;
use crate::error::{CalendarError, Result};
use crate::source::{BusyIntervalSource, TimeRange};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Client for the Google Calendar v3 API.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    token: AccessToken,
    base_url: String,
    timezone: Tz,
}

impl GoogleCalendarClient {
    /// Creates a new client with the given access token.
    pub fn new(token: AccessToken) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Creates a new client against a custom API root.
    pub fn with_base_url(token: AccessToken, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url: base_url.into(),
            timezone: Tz::UTC,
        }
    }

    /// Timezone used to place all-day entries, which Google reports as bare
    /// dates.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalendarError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("calendars")
            .push(calendar_id)
            .push("events");
        Ok(url)
    }

    async fn fetch_page(
        &self,
        url: &Url,
        range: TimeRange,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let time_min = range.start.to_rfc3339();
        let time_max = range.end.to_rfc3339();
        let mut query = vec![
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(url.clone())
            .header("Authorization", self.token.bearer())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl BusyIntervalSource for GoogleCalendarClient {
    #[instrument(skip(self))]
    async fn fetch_busy(&self, calendar_id: &str, range: TimeRange) -> Result<Vec<BusyInterval>> {
        let url = self.events_url(calendar_id)?;
        let mut busy = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            debug!(page = ?page_token, "Fetching calendar events");
            let page = self.fetch_page(&url, range, page_token.as_deref()).await?;
            busy.extend(busy_intervals(page.items, self.timezone));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        debug!(count = busy.len(), "Received busy intervals");
        Ok(busy)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: Option<String>,
    summary: Option<String>,
    status: Option<String>,
    transparency: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl EventTime {
    fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

impl GoogleEvent {
    fn blocks_time(&self) -> bool {
        self.status.as_deref() != Some("cancelled")
            && self.transparency.as_deref() != Some("transparent")
    }
}

/// Convert API events into busy intervals, skipping entries that do not
/// block time or that carry unusable timestamps.
fn busy_intervals(items: Vec<GoogleEvent>, tz: Tz) -> Vec<BusyInterval> {
    items
        .into_iter()
        .filter(GoogleEvent::blocks_time)
        .filter_map(|event| {
            let id = event.id.as_deref().unwrap_or("<no id>");
            let (Some(start), Some(end)) = (
                event.start.as_ref().and_then(EventTime::value),
                event.end.as_ref().and_then(EventTime::value),
            ) else {
                warn!(event_id = id, "Skipping event without start/end time");
                return None;
            };
            match BusyInterval::parse(start, end, event.summary.as_deref(), tz) {
                Ok(interval) => Some(interval),
                Err(e) => {
                    warn!(event_id = id, error = %e, "Skipping event with bad timestamps");
                    None
                }
            }
        })
        .collect()
}

/// Pull `error.message` out of an API error body, or fall back to the body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn page(json: &str) -> EventsPage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn timed_and_all_day_events_are_converted() {
        let page = page(
            r#"{
                "items": [
                    {"id": "a", "summary": "Lecture",
                     "start": {"dateTime": "2026-10-19T10:00:00-04:00"},
                     "end": {"dateTime": "2026-10-19T11:30:00-04:00"}},
                    {"id": "b",
                     "start": {"date": "2026-10-20"},
                     "end": {"date": "2026-10-21"}}
                ]
            }"#,
        );

        let busy = busy_intervals(page.items, Tz::UTC);

        assert_eq!(busy.len(), 2);
        assert_eq!(busy[0].label, "Lecture");
        assert_eq!(busy[0].start, Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 0).unwrap());
        assert_eq!(busy[0].duration_minutes(), 90);
        assert_eq!(busy[1].label, "Busy");
        assert_eq!(busy[1].start, Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap());
        assert_eq!(busy[1].duration_minutes(), 24 * 60);
    }

    #[test]
    fn cancelled_transparent_and_malformed_events_are_skipped() {
        let page = page(
            r#"{
                "items": [
                    {"id": "c", "status": "cancelled",
                     "start": {"dateTime": "2026-10-19T10:00:00Z"},
                     "end": {"dateTime": "2026-10-19T11:00:00Z"}},
                    {"id": "t", "transparency": "transparent",
                     "start": {"dateTime": "2026-10-19T12:00:00Z"},
                     "end": {"dateTime": "2026-10-19T13:00:00Z"}},
                    {"id": "n", "start": {}, "end": {"dateTime": "2026-10-19T13:00:00Z"}},
                    {"id": "x", "start": {"dateTime": "soon"}, "end": {"dateTime": "later"}},
                    {"id": "ok",
                     "start": {"dateTime": "2026-10-19T15:00:00Z"},
                     "end": {"dateTime": "2026-10-19T16:00:00Z"}}
                ]
            }"#,
        );

        let busy = busy_intervals(page.items, Tz::UTC);

        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].start, Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap());
    }

    #[test]
    fn missing_items_means_empty_page() {
        let page = page(r#"{"kind": "calendar#events"}"#);
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn error_message_extracted_from_body() {
        let body = r#"{"error": {"code": 401, "message": "Invalid Credentials"}}"#;
        assert_eq!(api_error_message(body), "Invalid Credentials");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(api_error_message(""), "Unknown error");
    }

    #[test]
    fn calendar_id_is_escaped_into_path() {
        let client = GoogleCalendarClient::with_base_url(
            AccessToken::new("t"),
            "https://example.test/calendar/v3/",
        );
        let url = client.events_url("team/room#1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/calendar/v3/calendars/team%2Froom%231/events"
        );
    }

    #[test]
    fn non_base_url_rejected() {
        let client = GoogleCalendarClient::with_base_url(AccessToken::new("t"), "mailto:x@y.z");
        assert!(matches!(
            client.events_url("primary"),
            Err(CalendarError::InvalidUrl(_))
        ));
    }
}

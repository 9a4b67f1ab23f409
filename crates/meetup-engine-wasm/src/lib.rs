//! WASM bindings for meetup-engine.
//!
//! Exposes mutual free-slot computation to the browser app via
//! `wasm-bindgen`. Complex types cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p meetup-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/meetup_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use meetup_engine::config::parse_timezone;
use meetup_engine::interval::parse_timestamp;
use meetup_engine::{AvailabilityConfig, BusyInterval, FreeSlot};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for busy intervals passed from JavaScript.
#[derive(Deserialize)]
struct BusyInput {
    start: String,
    end: String,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Serialize)]
struct FreeSlotDto {
    start: String,
    end: String,
    day_label: String,
    display_time: String,
    duration_minutes: i64,
    kind: meetup_engine::SlotKind,
}

impl From<&FreeSlot> for FreeSlotDto {
    fn from(s: &FreeSlot) -> Self {
        Self {
            start: s.start.to_rfc3339(),
            end: s.end.to_rfc3339(),
            day_label: s.day_label.clone(),
            display_time: s.display_time.clone(),
            duration_minutes: s.duration_minutes,
            kind: s.kind,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON plumbing, kept free of JsValue so it runs in native tests
// ---------------------------------------------------------------------------

fn parse_busy_json(json: &str, tz: Tz) -> Result<Vec<BusyInterval>, String> {
    let inputs: Vec<BusyInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid busy intervals JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            BusyInterval::parse(&input.start, &input.end, input.label.as_deref(), tz)
                .map_err(|e| e.to_string())
        })
        .collect()
}

fn parse_now(now: &str, tz: Tz) -> Result<DateTime<Utc>, String> {
    if now.trim().is_empty() {
        return Ok(Utc::now());
    }
    parse_timestamp(now, tz).map_err(|e| e.to_string())
}

fn mutual_free_slots_json(
    my_busy_json: &str,
    their_busy_json: &str,
    duration_minutes: u32,
    now: &str,
    timezone: &str,
) -> Result<String, String> {
    let config = AvailabilityConfig {
        timezone: parse_timezone(timezone).map_err(|e| e.to_string())?,
        ..AvailabilityConfig::default()
    };
    let mine = parse_busy_json(my_busy_json, config.timezone)?;
    let theirs = parse_busy_json(their_busy_json, config.timezone)?;
    let now = parse_now(now, config.timezone)?;

    let slots = meetup_engine::find_mutual_free_slots(&mine, &theirs, duration_minutes, now, &config);
    let dtos: Vec<FreeSlotDto> = slots.iter().map(FreeSlotDto::from).collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find up to five meetup slots free for both participants over the next week.
///
/// `my_busy_json` and `their_busy_json` are JSON arrays of
/// `{start, end, label?}` objects whose timestamps are ISO 8601 datetimes or
/// bare dates. `now` is an ISO 8601 instant, or an empty string for the
/// current time. `timezone` is an IANA name such as `"America/New_York"`.
///
/// Returns a JSON array of `{start, end, day_label, display_time,
/// duration_minutes, kind}` objects.
#[wasm_bindgen(js_name = "findMutualFreeSlots")]
pub fn find_mutual_free_slots(
    my_busy_json: &str,
    their_busy_json: &str,
    duration_minutes: Option<u32>,
    now: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    mutual_free_slots_json(
        my_busy_json,
        their_busy_json,
        duration_minutes.unwrap_or(meetup_engine::DEFAULT_DURATION_MINUTES),
        now,
        timezone,
    )
    .map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn computes_slots_from_json() {
        let mine = r#"[{"start": "2026-10-19T09:00:00", "end": "2026-10-19T12:00:00", "label": "Class"}]"#;
        let theirs = r#"[{"start": "2026-10-19T13:00:00", "end": "2026-10-19T20:00:00"}]"#;

        let json =
            mutual_free_slots_json(mine, theirs, 60, "2026-10-19T08:00:00", "America/New_York")
                .unwrap();
        let slots: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(slots.as_array().unwrap().len(), 5);
        assert_eq!(slots[0]["start"], "2026-10-19T16:00:00+00:00");
        assert_eq!(slots[0]["display_time"], "12:00 PM");
        assert_eq!(slots[0]["kind"], "gap");
        assert_eq!(slots[1]["day_label"], "Tuesday");
        assert_eq!(slots[1]["kind"], "open_day");
    }

    #[test]
    fn rejects_bad_timezone() {
        let err = mutual_free_slots_json("[]", "[]", 60, "", "Nowhere/Special").unwrap_err();
        assert!(err.contains("Invalid timezone"));
    }

    #[test]
    fn rejects_malformed_interval_list() {
        let err = mutual_free_slots_json("{", "[]", 60, "", "UTC").unwrap_err();
        assert!(err.starts_with("Invalid busy intervals JSON"));
    }

    #[test]
    fn rejects_inverted_interval() {
        let mine = r#"[{"start": "2026-10-19T12:00:00Z", "end": "2026-10-19T09:00:00Z"}]"#;
        let err = mutual_free_slots_json(mine, "[]", 60, "", "UTC").unwrap_err();
        assert!(err.contains("after end"));
    }
}

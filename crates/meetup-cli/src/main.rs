//! `campusmatch` CLI — find mutual meetup times from two calendars.
//!
//! ## Usage
//!
//! ```sh
//! # Slots from two JSON busy lists
//! campusmatch slots --mine me.json --theirs them.json --duration 45
//!
//! # Same, as JSON, without the five-slot cap
//! campusmatch slots --mine me.json --theirs them.json --all --format json
//!
//! # Dump one participant's Google Calendar busy time for the next week
//! GOOGLE_ACCESS_TOKEN=ya29... campusmatch fetch --calendar primary -o me.json
//!
//! # Fetch both calendars and compute in one go
//! campusmatch mutual --my-token-env ALEX_TOKEN --their-token-env SAM_TOKEN
//! ```
//!
//! Set `RUST_LOG=debug` for request-level logging on stderr.

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use meetup_calendar::{
    fetch_mutual_free_slots, AccessToken, BusyIntervalSource, GoogleCalendarClient, Participant,
    TimeRange, DEFAULT_TOKEN_ENV, PRIMARY_CALENDAR,
};
use meetup_engine::interval::parse_timestamp;
use meetup_engine::{find_mutual_free_slots, quick_picks, BusyInterval, FreeSlot};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::FileConfig;

const NO_AVAILABILITY: &str =
    "No mutual availability found. Try suggesting a time manually.";

#[derive(Parser)]
#[command(
    name = "campusmatch",
    version,
    about = "Find meetup times that work for both people"
)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true, env = "CAMPUSMATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute mutual free slots from two JSON busy-interval files
    Slots {
        /// My busy intervals ("-" for stdin)
        #[arg(long)]
        mine: String,
        /// Their busy intervals ("-" for stdin)
        #[arg(long)]
        theirs: String,
        #[command(flatten)]
        opts: SlotOptions,
    },
    /// Fetch one calendar's busy intervals as JSON
    Fetch {
        /// Calendar identifier
        #[arg(long, default_value = PRIMARY_CALENDAR)]
        calendar: String,
        /// Environment variable holding the access token
        #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
        token_env: String,
        /// IANA timezone used to place all-day events
        #[arg(long)]
        timezone: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Fetch both calendars and compute mutual free slots
    Mutual {
        #[arg(long, default_value = PRIMARY_CALENDAR)]
        my_calendar: String,
        #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
        my_token_env: String,
        #[arg(long, default_value = PRIMARY_CALENDAR)]
        their_calendar: String,
        #[arg(long)]
        their_token_env: String,
        #[command(flatten)]
        opts: SlotOptions,
    },
}

#[derive(clap::Args)]
struct SlotOptions {
    /// Meeting length in minutes
    #[arg(short, long)]
    duration: Option<u32>,
    /// Evaluate as of this instant instead of the current time (ISO 8601)
    #[arg(long)]
    now: Option<String>,
    /// IANA timezone for days and working hours
    #[arg(long)]
    timezone: Option<String>,
    /// Return every qualifying slot instead of the first five
    #[arg(long)]
    all: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Busy interval as written by hand or by `fetch`.
#[derive(Deserialize)]
struct BusyInput {
    start: String,
    end: String,
    #[serde(default)]
    label: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let file = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Slots { mine, theirs, opts } => {
            let mut config = file.availability(opts.timezone.as_deref())?;
            if opts.all {
                config.max_slots = None;
            }
            let now = resolve_now(opts.now.as_deref(), config.timezone)?;

            let mine = read_busy(&mine, config.timezone)?;
            let theirs = read_busy(&theirs, config.timezone)?;
            info!(mine = mine.len(), theirs = theirs.len(), "Loaded busy intervals");

            let slots = find_mutual_free_slots(
                &mine,
                &theirs,
                file.duration_minutes(opts.duration),
                now,
                &config,
            );
            print_slots(&slots, opts.format)?;
        }
        Commands::Fetch {
            calendar,
            token_env,
            timezone,
            output,
        } => {
            let config = file.availability(timezone.as_deref())?;
            let client = google_client(&token_env, config.timezone)?;

            let busy = client
                .fetch_busy(
                    &calendar,
                    TimeRange::lookahead(Utc::now(), config.lookahead_days.saturating_add(1)),
                )
                .await
                .with_context(|| format!("Failed to fetch calendar '{}'", calendar))?;

            let json = serde_json::to_string_pretty(&busy)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Mutual {
            my_calendar,
            my_token_env,
            their_calendar,
            their_token_env,
            opts,
        } => {
            let mut config = file.availability(opts.timezone.as_deref())?;
            if opts.all {
                config.max_slots = None;
            }
            let now = resolve_now(opts.now.as_deref(), config.timezone)?;
            let me = google_client(&my_token_env, config.timezone)?;
            let them = google_client(&their_token_env, config.timezone)?;

            let slots = fetch_mutual_free_slots(
                Participant::new(&me, &my_calendar),
                Participant::new(&them, &their_calendar),
                file.duration_minutes(opts.duration),
                now,
                &config,
            )
            .await
            .context("Failed to fetch calendars")?;
            print_slots(&slots, opts.format)?;
        }
    }

    Ok(())
}

fn google_client(token_env: &str, timezone: Tz) -> Result<GoogleCalendarClient> {
    let token = AccessToken::from_env(token_env)?;
    Ok(GoogleCalendarClient::new(token).with_timezone(timezone))
}

fn resolve_now(now: Option<&str>, tz: Tz) -> Result<DateTime<Utc>> {
    match now {
        Some(raw) => parse_timestamp(raw, tz).with_context(|| format!("Invalid --now value '{}'", raw)),
        None => Ok(Utc::now()),
    }
}

fn read_busy(path: &str, tz: Tz) -> Result<Vec<BusyInterval>> {
    let json = read_input(path)?;
    let inputs: Vec<BusyInput> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse busy intervals from {}", path))?;
    inputs
        .into_iter()
        .map(|input| {
            BusyInterval::parse(&input.start, &input.end, input.label.as_deref(), tz)
                .with_context(|| format!("Bad busy interval in {}", path))
        })
        .collect()
}

fn print_slots(slots: &[FreeSlot], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(slots)?),
        OutputFormat::Text => print!("{}", render_text(slots)),
    }
    Ok(())
}

/// One line per slot; quick picks are marked with `*`.
fn render_text(slots: &[FreeSlot]) -> String {
    if slots.is_empty() {
        return format!("{}\n", NO_AVAILABILITY);
    }
    let picks = quick_picks(slots).len();
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let marker = if i < picks { '*' } else { ' ' };
            format!(
                "{} {} {} ({} min)\n",
                marker, slot.day_label, slot.display_time, slot.duration_minutes
            )
        })
        .collect()
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

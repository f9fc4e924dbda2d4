//! Parsing of user-supplied times and durations.

use agenda_core::TimeInterval;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};

/// Meetings without an explicit end or duration last this long.
const DEFAULT_MEETING_MINUTES: i64 = 60;

const FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse RFC 3339, `YYYY-MM-DD HH:MM` (local time), or natural language
/// like "tomorrow 3pm".
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
        .or_else(|| fuzzydate::parse(input).ok())
        .ok_or_else(|| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    local_to_utc(naive)
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("{} does not exist in the local time zone", naive))
}

pub fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

/// Build an interval from a start and either an end or a duration.
pub fn parse_interval(
    start: &str,
    end: Option<&str>,
    duration: Option<&str>,
) -> Result<TimeInterval> {
    let start = parse_datetime(start)?;

    let end = match (end, duration) {
        (Some(end), _) => parse_datetime(end)?,
        (None, Some(duration)) => offset(start, parse_duration(duration)?)?,
        (None, None) => offset(start, Duration::minutes(DEFAULT_MEETING_MINUTES))?,
    };

    Ok(TimeInterval::new(start, end)?)
}

fn offset(start: DateTime<Utc>, duration: Duration) -> Result<DateTime<Utc>> {
    start
        .checked_add_signed(duration)
        .with_context(|| format!("Duration too large: {} from {}", duration, start))
}

/// Interval for listing: unbounded on whichever side is not given.
pub fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<TimeInterval> {
    let from = from.map(parse_datetime).transpose()?.unwrap_or(DateTime::<Utc>::MIN_UTC);
    let to = to.map(parse_datetime).transpose()?.unwrap_or(DateTime::<Utc>::MAX_UTC);

    Ok(TimeInterval::new(from, to)?)
}

//! Reminder text parsing and next-fire computation
//!
//! Accepts `HH:MM` (next occurrence of a time of day), relative durations such
//! as `30m`, `2h45m`, `in 1.5h`, and clearing keywords.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Fractional values and day/week units in durations
//! - 1.0.0: Initial HH:MM and duration parsing

use chrono::{DateTime, Duration, Offset, TimeZone, Utc};
use std::fmt;
use thiserror::Error;

/// Keywords that explicitly clear a configured reminder (compared lowercase)
const CLEAR_KEYWORDS: &[&str] = &["none", "off", "clear", "0", "なし", "解除", "オフ"];

/// Prefixes stripped before reading a relative duration
const DURATION_PREFIXES: &[&str] = &["in ", "after "];

/// Longest accepted relative reminder (52 weeks)
pub const MAX_DURATION_SECS: u64 = 52 * 604_800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// Next occurrence of a local time of day
    TimeOfDay { hour: u32, minute: u32 },
    /// Fixed delay after the bookmark is saved
    Duration { seconds: u64 },
}

/// Reminder configuration attached to an emoji preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSpec {
    pub kind: ReminderKind,
    /// Whether pressing "Done" on the bookmark also cancels the reminder
    pub remove_on_complete: bool,
}

impl ReminderSpec {
    pub fn new(kind: ReminderKind) -> Self {
        Self {
            kind,
            remove_on_complete: true,
        }
    }
}

/// Outcome of reading the `reminder` option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderInput {
    /// Nothing was typed; keep whatever is configured
    Unchanged,
    /// A clearing keyword was typed
    Clear,
    Set(ReminderKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderParseError {
    #[error("invalid time. Use HH:MM such as 08:30")]
    InvalidTime,
    #[error("unable to read hour value `{0}`")]
    InvalidHour(String),
    #[error("unable to read minute value `{0}`")]
    InvalidMinute(String),
    #[error("hour must be between 0 and 23")]
    HourOutOfRange,
    #[error("minute must be between 0 and 59")]
    MinuteOutOfRange,
    #[error("use durations like `30m` or `2h45m`")]
    InvalidDuration,
    #[error("reminders must be at least 1s in the future")]
    NonPositiveDuration,
    #[error("reminders can be at most 52w in the future")]
    DurationTooLong,
    #[error("the reminder configuration is invalid. Please set it again")]
    InvalidConfiguration,
}

/// Concrete next reminder instance with display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub at: DateTime<Utc>,
    pub description: String,
}

/// Parse raw user input into a reminder instruction.
pub fn parse(raw: &str) -> Result<ReminderInput, ReminderParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(ReminderInput::Unchanged);
    }

    let lowered = trimmed.to_lowercase();
    if CLEAR_KEYWORDS.contains(&lowered.as_str()) {
        return Ok(ReminderInput::Clear);
    }

    if trimmed.contains(':') {
        return parse_time_of_day(trimmed).map(ReminderInput::Set);
    }

    let mut cleaned = lowered.as_str();
    for prefix in DURATION_PREFIXES {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest;
        }
    }

    let seconds = parse_duration(cleaned.trim())?;
    Ok(ReminderInput::Set(ReminderKind::Duration { seconds }))
}

fn parse_time_of_day(input: &str) -> Result<ReminderKind, ReminderParseError> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() != 2 {
        return Err(ReminderParseError::InvalidTime);
    }

    let hour_text = parts[0].trim();
    let minute_text = parts[1].trim();
    let hour: i64 = hour_text
        .parse()
        .map_err(|_| ReminderParseError::InvalidHour(hour_text.to_string()))?;
    let minute: i64 = minute_text
        .parse()
        .map_err(|_| ReminderParseError::InvalidMinute(minute_text.to_string()))?;

    if !(0..=23).contains(&hour) {
        return Err(ReminderParseError::HourOutOfRange);
    }
    if !(0..=59).contains(&minute) {
        return Err(ReminderParseError::MinuteOutOfRange);
    }

    Ok(ReminderKind::TimeOfDay {
        hour: hour as u32,
        minute: minute as u32,
    })
}

/// Parse a duration made of `<number><unit>` groups (`s`, `m`, `h`, `d`, `w`) into whole seconds.
fn parse_duration(input: &str) -> Result<u64, ReminderParseError> {
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    if body.is_empty() {
        return Err(ReminderParseError::InvalidDuration);
    }

    let is_number_char = |c: char| c.is_ascii_digit() || c == '.';
    let mut total = 0f64;
    let mut rest = body;

    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !is_number_char(c)).unwrap_or(rest.len());
        if number_len == 0 {
            return Err(ReminderParseError::InvalidDuration);
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| ReminderParseError::InvalidDuration)?;
        rest = &rest[number_len..];

        let unit_len = rest.find(is_number_char).unwrap_or(rest.len());
        let unit_seconds = match &rest[..unit_len] {
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3_600.0,
            "d" => 86_400.0,
            "w" => 604_800.0,
            _ => return Err(ReminderParseError::InvalidDuration),
        };
        rest = &rest[unit_len..];

        total += value * unit_seconds;
    }

    if negative || total < 1.0 {
        return Err(ReminderParseError::NonPositiveDuration);
    }

    if total > MAX_DURATION_SECS as f64 {
        return Err(ReminderParseError::DurationTooLong);
    }

    Ok(total.floor() as u64)
}

/// Compute the next fire time for `kind` relative to `now`.
///
/// Time-of-day reminders resolve in `now`'s timezone and always land strictly after
/// `now`, within the next 24 hours. Only this single instance is produced.
pub fn next<Tz>(kind: &ReminderKind, now: &DateTime<Tz>) -> Result<Schedule, ReminderParseError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match *kind {
        ReminderKind::TimeOfDay { hour, minute } => {
            let naive = now
                .date_naive()
                .and_hms_opt(hour, minute, 0)
                .ok_or(ReminderParseError::InvalidConfiguration)?;
            let tz = now.timezone();
            let mut target = match tz.from_local_datetime(&naive).earliest() {
                Some(local) => local,
                // Skipped by a DST transition; read it with the current offset
                None => {
                    let offset = i64::from(now.offset().fix().local_minus_utc());
                    tz.from_utc_datetime(&(naive - Duration::seconds(offset)))
                }
            };
            if target <= *now {
                target = target + Duration::hours(24);
            }

            let description = format!("Next alert at {} (daily)", target.format("%Y-%m-%d %H:%M"));
            Ok(Schedule {
                at: target.with_timezone(&Utc),
                description,
            })
        }
        ReminderKind::Duration { seconds } => {
            let delta = i64::try_from(seconds)
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(Duration::try_seconds)
                .ok_or(ReminderParseError::InvalidConfiguration)?;
            let target = now
                .clone()
                .checked_add_signed(delta)
                .ok_or(ReminderParseError::InvalidConfiguration)?;

            let description = format!(
                "Reminder in {} ({})",
                format_duration(seconds),
                target.format("%Y-%m-%d %H:%M")
            );
            Ok(Schedule {
                at: target.with_timezone(&Utc),
                description,
            })
        }
    }
}

/// Short listing text for a configured reminder.
pub fn describe(spec: Option<&ReminderSpec>) -> String {
    match spec.map(|s| s.kind) {
        Some(ReminderKind::TimeOfDay { hour, minute }) => {
            format!("Every day at {hour:02}:{minute:02}")
        }
        Some(ReminderKind::Duration { seconds }) => {
            format!("{} after saving", format_duration(seconds))
        }
        None => "No reminder".to_string(),
    }
}

/// Render a duration for display: `N min` below one minute, otherwise `<H>h <M>m`.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        let minutes = ((seconds as f64 + 0.5) / 60.0) as u64;
        return format!("{} min", minutes.max(1));
    }

    let hours = seconds / 3_600;
    let remainder = seconds % 3_600;
    let minutes = remainder / 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if parts.is_empty() {
        let secs = remainder % 60;
        if secs > 0 {
            parts.push(format!("{secs}s"));
        }
    }

    if parts.is_empty() {
        return "a few minutes".to_string();
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn set(input: &str) -> ReminderKind {
        match parse(input).unwrap() {
            ReminderInput::Set(kind) => kind,
            other => panic!("expected a reminder for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_input_is_unchanged() {
        assert_eq!(parse("").unwrap(), ReminderInput::Unchanged);
        assert_eq!(parse("   \t").unwrap(), ReminderInput::Unchanged);
    }

    #[test]
    fn test_clear_keywords() {
        for keyword in ["none", "OFF", "Clear", "0", "なし", "解除"] {
            assert_eq!(parse(keyword).unwrap(), ReminderInput::Clear, "{keyword}");
        }
    }

    #[test]
    fn test_time_of_day_all_valid_hours() {
        for hour in 0..24u32 {
            for minute in [0u32, 1, 30, 59] {
                let kind = set(&format!("{hour}:{minute:02}"));
                assert_eq!(kind, ReminderKind::TimeOfDay { hour, minute });
            }
        }
    }

    #[test]
    fn test_time_of_day_out_of_range() {
        assert_eq!(parse("24:00"), Err(ReminderParseError::HourOutOfRange));
        assert_eq!(parse("99:10"), Err(ReminderParseError::HourOutOfRange));
        assert_eq!(parse("12:60"), Err(ReminderParseError::MinuteOutOfRange));
        assert_eq!(parse("-1:00"), Err(ReminderParseError::HourOutOfRange));
    }

    #[test]
    fn test_time_of_day_malformed() {
        assert_eq!(parse("08:30:00"), Err(ReminderParseError::InvalidTime));
        assert!(matches!(parse("ab:30"), Err(ReminderParseError::InvalidHour(_))));
        assert!(matches!(parse("08:xx"), Err(ReminderParseError::InvalidMinute(_))));
        assert!(matches!(parse(":30"), Err(ReminderParseError::InvalidHour(_))));
    }

    #[test]
    fn test_durations() {
        assert_eq!(set("30m"), ReminderKind::Duration { seconds: 1_800 });
        assert_eq!(set("2h45m"), ReminderKind::Duration { seconds: 9_900 });
        assert_eq!(set("in 90s"), ReminderKind::Duration { seconds: 90 });
        assert_eq!(set("After 1h"), ReminderKind::Duration { seconds: 3_600 });
        assert_eq!(set("1.5h"), ReminderKind::Duration { seconds: 5_400 });
        assert_eq!(set("1d"), ReminderKind::Duration { seconds: 86_400 });
        assert_eq!(set("1w"), ReminderKind::Duration { seconds: 604_800 });
    }

    #[test]
    fn test_non_positive_durations_fail() {
        assert_eq!(parse("0m"), Err(ReminderParseError::NonPositiveDuration));
        assert_eq!(parse("-30m"), Err(ReminderParseError::NonPositiveDuration));
        assert_eq!(parse("0.2s"), Err(ReminderParseError::NonPositiveDuration));
    }

    #[test]
    fn test_durations_capped_at_one_year() {
        assert_eq!(set("52w"), ReminderKind::Duration { seconds: MAX_DURATION_SECS });
        for input in ["52w1s", "100000000w", "99999999999999999999999999d"] {
            assert_eq!(parse(input), Err(ReminderParseError::DurationTooLong), "{input}");
        }
    }

    #[test]
    fn test_unparseable_durations_fail() {
        for input in ["soon", "30", "m30", "2 h", "1.2.3h", "tomorrow", "in ", "5y"] {
            assert_eq!(
                parse(input),
                Err(ReminderParseError::InvalidDuration),
                "{input}"
            );
        }
    }

    #[test]
    fn test_next_time_of_day_later_today() {
        let now = utc(2026, 10, 18, 7, 15);
        let schedule = next(&ReminderKind::TimeOfDay { hour: 8, minute: 0 }, &now).unwrap();
        assert_eq!(schedule.at, utc(2026, 10, 18, 8, 0));
        assert_eq!(schedule.description, "Next alert at 2026-10-18 08:00 (daily)");
    }

    #[test]
    fn test_next_time_of_day_already_passed_rolls_to_tomorrow() {
        let now = utc(2026, 10, 18, 9, 15);
        let kind = set("8:00");
        let schedule = next(&kind, &now).unwrap();
        assert_eq!(schedule.at, utc(2026, 10, 19, 8, 0));
    }

    #[test]
    fn test_next_time_of_day_exactly_now_rolls_over() {
        let now = utc(2026, 10, 18, 8, 0);
        let schedule = next(&ReminderKind::TimeOfDay { hour: 8, minute: 0 }, &now).unwrap();
        assert_eq!(schedule.at, utc(2026, 10, 19, 8, 0));
    }

    #[test]
    fn test_next_time_of_day_within_24h_and_same_minute_of_day() {
        let now = utc(2026, 10, 18, 13, 37);
        for hour in 0..24u32 {
            for minute in [0u32, 15, 37, 59] {
                let schedule = next(&ReminderKind::TimeOfDay { hour, minute }, &now).unwrap();
                let delta = schedule.at - now;
                assert!(delta > Duration::zero() && delta <= Duration::hours(24));
                assert_eq!(schedule.at.hour(), hour);
                assert_eq!(schedule.at.minute(), minute);
            }
        }
    }

    #[test]
    fn test_next_time_of_day_uses_local_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3_600).unwrap();
        let now = tokyo.with_ymd_and_hms(2026, 10, 18, 9, 15, 0).unwrap();
        let schedule = next(&ReminderKind::TimeOfDay { hour: 8, minute: 0 }, &now).unwrap();
        // 08:00 JST on the 19th
        assert_eq!(schedule.at, utc(2026, 10, 18, 23, 0));
        assert_eq!(schedule.description, "Next alert at 2026-10-19 08:00 (daily)");
    }

    #[test]
    fn test_next_duration_is_exact() {
        let now = utc(2026, 10, 18, 9, 15) + Duration::milliseconds(250);
        for seconds in [1u64, 59, 1_800, 9_900, 86_400 * 3] {
            let schedule = next(&ReminderKind::Duration { seconds }, &now).unwrap();
            assert_eq!(schedule.at, now + Duration::seconds(seconds as i64));
        }
    }

    #[test]
    fn test_next_duration_description() {
        let now = utc(2026, 10, 18, 9, 15);
        let schedule = next(&ReminderKind::Duration { seconds: 1_800 }, &now).unwrap();
        assert_eq!(schedule.description, "Reminder in 30m (2026-10-18 09:45)");
    }

    #[test]
    fn test_next_zero_duration_is_invalid() {
        let now = utc(2026, 10, 18, 9, 15);
        assert_eq!(
            next(&ReminderKind::Duration { seconds: 0 }, &now),
            Err(ReminderParseError::InvalidConfiguration)
        );
    }

    #[test]
    fn test_format_duration_ladder() {
        assert_eq!(format_duration(0), "1 min");
        assert_eq!(format_duration(45), "1 min");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(1_800), "30m");
        assert_eq!(format_duration(3_600), "1h");
        assert_eq!(format_duration(9_900), "2h 45m");
        assert_eq!(format_duration(3_659), "1h");
        assert_eq!(format_duration(90_000), "25h");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(None), "No reminder");
        let daily = ReminderSpec::new(ReminderKind::TimeOfDay { hour: 8, minute: 5 });
        assert_eq!(describe(Some(&daily)), "Every day at 08:05");
        let relative = ReminderSpec::new(ReminderKind::Duration { seconds: 2_700 });
        assert_eq!(describe(Some(&relative)), "45m after saving");
    }

    #[test]
    fn test_new_spec_removes_on_complete_by_default() {
        let spec = ReminderSpec::new(ReminderKind::Duration { seconds: 60 });
        assert!(spec.remove_on_complete);
    }
}

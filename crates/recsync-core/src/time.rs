//! Local date/time normalization.
//!
//! Form inputs carry wall-clock strings such as `2024-03-01T09:30` in the
//! user's timezone. Records store UTC instants. The functions here convert
//! between the two and apply a [`TimeRangePolicy`] to start/end pairs.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::ValidationError;

/// Format of `<input type="datetime-local">` values.
pub const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

const LOCAL_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// How a start/end pair is resolved when the end lies before the start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRangePolicy {
    /// Keep both instants as entered and reject `end < start`.
    #[default]
    Strict,
    /// Snap the start to 00:00 and the end to 23:59 of their local days,
    /// then reject if the end is still before the start.
    WholeDays,
}

/// Parse a timezone offset.
///
/// Accepts `UTC`, `Z`, `+HH:MM`, `-HHMM` and `+HH`.
pub fn parse_offset(s: &str) -> Result<FixedOffset, ValidationError> {
    let value = s.trim();
    let invalid = || ValidationError::InvalidTimezone {
        value: s.to_string(),
    };

    if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Convert a local date/time string in `offset` to a UTC instant.
///
/// Date-only strings resolve to local midnight. Strings that already carry
/// an offset (RFC 3339) keep their own offset.
pub fn normalize_instant(
    local: &str,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, ValidationError> {
    let value = local.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = parse_naive(value).ok_or_else(|| ValidationError::InvalidDateTime {
        value: local.to_string(),
        reason: "expected YYYY-MM-DDTHH:MM or YYYY-MM-DD".to_string(),
    })?;

    from_local(naive, offset, local)
}

/// Format a UTC instant as a local `YYYY-MM-DDTHH:MM` string.
pub fn localize_instant(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format(LOCAL_FORMAT).to_string()
}

/// Resolve optional local start/end strings into UTC instants.
///
/// Empty strings count as absent.
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    offset: FixedOffset,
    policy: TimeRangePolicy,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), ValidationError> {
    let start = non_blank(start)
        .map(|s| normalize_instant(s, offset))
        .transpose()?;
    let end = non_blank(end)
        .map(|s| normalize_instant(s, offset))
        .transpose()?;

    let (start, end) = match policy {
        TimeRangePolicy::Strict => (start, end),
        TimeRangePolicy::WholeDays => (
            start.map(|s| snap_to(s, offset, NaiveTime::MIN)),
            end.map(|e| snap_to(e, offset, end_of_day())),
        ),
    };

    check_order(start, end)?;
    Ok((start, end))
}

/// Reject `end < start` when both are present.
pub fn check_order(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::TimeRange {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        }),
        _ => Ok(()),
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn from_local(
    naive: NaiveDateTime,
    offset: FixedOffset,
    original: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::InvalidDateTime {
            value: original.to_string(),
            reason: "out of range".to_string(),
        })
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

fn snap_to(instant: DateTime<Utc>, offset: FixedOffset, time: NaiveTime) -> DateTime<Utc> {
    let day = instant.with_timezone(&offset).date_naive();
    offset
        .from_local_datetime(&day.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(instant)
}

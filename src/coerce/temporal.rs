//! Date and time conversions.
//!
//! Resolution order, first match wins:
//! 1. the legacy textual calendar format (`Tue Jan 02 10:30:00 UTC 2024`),
//!    with its UTC-offset correction; a failure here falls through
//! 2. the pattern passed by the caller, else the pattern configured in the
//!    context for the temporal kind; its failure is reported
//! 3. ISO-8601, whose failure is reported
//!
//! Patterns are chrono format strings (`%d/%m/%Y`).

use super::coerced::Coerced;
use super::descriptor::TemporalKind;
use crate::context::CoercionContext;
use crate::error::{Error, Result};
use crate::value::{Value, canonical_string, describe};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::trace;

const LEGACY_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

pub(crate) fn coerce_temporal(
    value: &Value,
    kind: TemporalKind,
    pattern: Option<&str>,
    ctx: &CoercionContext,
) -> Result<Coerced> {
    if kind == TemporalKind::Time {
        if let Some(seconds) = value.as_i64() {
            return time_of_day(seconds);
        }
    }

    let Some(text) = canonical_string(value) else {
        return Ok(Coerced::Null);
    };

    if let Some(coerced) = parse_legacy(&text, kind) {
        return Ok(coerced);
    }

    if let Some(pattern) = pattern.or_else(|| ctx.pattern_for(kind)) {
        return parse_with_pattern(&text, kind, pattern)
            .map_err(|e| Error::coercion_caused_by(text.as_str(), kind.as_str(), e));
    }

    parse_iso(&text, kind).map_err(|e| Error::coercion_caused_by(text.as_str(), kind.as_str(), e))
}

fn time_of_day(seconds: i64) -> Result<Coerced> {
    u32::try_from(seconds)
        .ok()
        .and_then(|s| NaiveTime::from_num_seconds_from_midnight_opt(s, 0))
        .map(Coerced::Time)
        .ok_or_else(|| {
            Error::coercion(
                describe(&Value::from(seconds)),
                TemporalKind::Time.as_str(),
            )
        })
}

fn parse_with_pattern(
    text: &str,
    kind: TemporalKind,
    pattern: &str,
) -> std::result::Result<Coerced, chrono::ParseError> {
    Ok(match kind {
        TemporalKind::Date => Coerced::Date(NaiveDate::parse_from_str(text, pattern)?),
        TemporalKind::Time => Coerced::Time(NaiveTime::parse_from_str(text, pattern)?),
        TemporalKind::DateTime => Coerced::DateTime(NaiveDateTime::parse_from_str(text, pattern)?),
        TemporalKind::ZonedDateTime => Coerced::Zoned(DateTime::parse_from_str(text, pattern)?),
    })
}

/// Parse the legacy textual calendar format.
///
/// Values in this format were normalized to the writer's local zone, so
/// dates move forward a day west of UTC and date-times shift back by the
/// local offset. Times never use this format, and an unknown zone token
/// means the text is not in it.
fn parse_legacy(text: &str, kind: TemporalKind) -> Option<Coerced> {
    if kind == TemporalKind::Time {
        return None;
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [weekday, month, day, time, zone, year] = tokens.as_slice() else {
        return None;
    };
    let offset = zone_offset(zone)?;

    let without_zone = format!("{weekday} {month} {day} {time} {year}");
    let naive = NaiveDateTime::parse_from_str(&without_zone, LEGACY_FORMAT).ok()?;
    let local_offset = Local::now().offset().local_minus_utc();
    trace!(text = %text, local_offset, "legacy calendar format");

    match kind {
        TemporalKind::Date => {
            let days = if local_offset < 0 { 1 } else { 0 };
            Some(Coerced::Date(naive.date() + Duration::days(days)))
        }
        TemporalKind::DateTime => Some(Coerced::DateTime(
            naive - Duration::seconds(i64::from(local_offset)),
        )),
        TemporalKind::ZonedDateTime => naive
            .and_local_timezone(offset)
            .single()
            .map(Coerced::Zoned),
        TemporalKind::Time => None,
    }
}

/// Common zone abbreviations and their offsets from UTC in minutes.
const ZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("UT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", 60),
    ("BST", 60),
    ("CET", 60),
    ("CEST", 120),
    ("MET", 60),
    ("MEST", 120),
    ("EET", 120),
    ("EEST", 180),
    ("IST", 330),
    ("MSK", 180),
    ("PKT", 300),
    ("ICT", 420),
    ("WIB", 420),
    ("CST", -360),
    ("CDT", -300),
    ("SGT", 480),
    ("HKT", 480),
    ("AWST", 480),
    ("JST", 540),
    ("KST", 540),
    ("ACST", 570),
    ("ACDT", 630),
    ("AEST", 600),
    ("AEDT", 660),
    ("NZST", 720),
    ("NZDT", 780),
    ("AST", -240),
    ("ADT", -180),
    ("EST", -300),
    ("EDT", -240),
    ("MST", -420),
    ("MDT", -360),
    ("PST", -480),
    ("PDT", -420),
    ("AKST", -540),
    ("AKDT", -480),
    ("HST", -600),
    ("BRT", -180),
    ("ART", -180),
];

/// Resolve the zone token of the legacy format to a fixed offset.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    if let Some((_, minutes)) = ZONE_ABBREVIATIONS.iter().find(|(name, _)| *name == zone) {
        return FixedOffset::east_opt(minutes * 60);
    }

    let offset = zone
        .strip_prefix("GMT")
        .or_else(|| zone.strip_prefix("UTC"))
        .unwrap_or(zone);

    let (sign, rest) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_iso(text: &str, kind: TemporalKind) -> std::result::Result<Coerced, chrono::ParseError> {
    match kind {
        TemporalKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Coerced::Date),
        TemporalKind::Time => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map(Coerced::Time),
        TemporalKind::DateTime => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
            .map(Coerced::DateTime),
        TemporalKind::ZonedDateTime => {
            // A trailing region id (`[Europe/Paris]`) adds nothing to the offset.
            let text = match text.find('[') {
                Some(i) if text.ends_with(']') => &text[..i],
                _ => text,
            };
            DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z"))
                .map(Coerced::Zoned)
        }
    }
}

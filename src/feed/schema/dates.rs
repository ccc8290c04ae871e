//! Date formats used by the supported dialects.
//!
//! RSS 2.0 uses RFC 2822 dates, Atom and Dublin Core use W3C date-times
//! (an RFC 3339 profile). Every parser returns UTC.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{FeedError, FeedResult};

/// `11 Jun 2008 15:30:59 +0900` (weekday already stripped).
const RFC2822_NUMERIC_ZONE: &str = "%d %b %Y %H:%M:%S %z";
/// `11 Jun 2008 15:30:59`, followed by a zone mnemonic handled separately.
const RFC2822_LOCAL: &str = "%d %b %Y %H:%M:%S";

/// Parses an RFC 2822 date with a numeric offset, retrying once with a zone
/// mnemonic (`GMT`, `EST`, `JST`...) before giving up.
///
/// The weekday is optional and not cross-checked against the date; plenty of
/// publishers get it wrong.
pub fn parse_rfc2822(value: &str) -> FeedResult<DateTime<Utc>> {
    let value = value.trim();
    let body = strip_weekday(value);

    if let Ok(dt) = DateTime::parse_from_str(body, RFC2822_NUMERIC_ZONE) {
        return Ok(dt.with_timezone(&Utc));
    }

    let with_mnemonic = body.rsplit_once(' ').and_then(|(stamp, zone)| {
        let offset = zone_offset(zone)?;
        let naive = NaiveDateTime::parse_from_str(stamp.trim_end(), RFC2822_LOCAL).ok()?;
        offset.from_local_datetime(&naive).single()
    });
    match with_mnemonic {
        Some(dt) => Ok(dt.with_timezone(&Utc)),
        None => Err(FeedError::InvalidDate(value.to_string())),
    }
}

/// Parses a W3C date-time: full RFC 3339, RFC 3339 without seconds, a
/// zoneless date-time (taken as UTC), or a bare date (midnight UTC).
pub fn parse_w3c(value: &str) -> FeedResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(FeedError::InvalidDate(value.to_string()))
}

/// Applies `parse` unless `value` is blank, in which case the date is absent.
pub fn optional(
    value: &str,
    parse: fn(&str) -> FeedResult<DateTime<Utc>>,
) -> FeedResult<Option<DateTime<Utc>>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

fn strip_weekday(value: &str) -> &str {
    match value.split_once(',') {
        Some((day, rest)) if !day.is_empty() && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => value,
    }
}

/// Offset for a zone mnemonic. Unknown alphabetic mnemonics read as UTC,
/// the same way Go's `time.Parse` and most feed readers treat them.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    if zone.is_empty() || zone.len() > 5 || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let hours = match zone.to_ascii_uppercase().as_str() {
        "EST" | "CDT" => -5,
        "EDT" => -4,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        "CET" => 1,
        "CEST" | "EET" => 2,
        "EEST" | "MSK" => 3,
        "IST" => return FixedOffset::east_opt(5 * 3600 + 1800),
        "JST" | "KST" => 9,
        _ => 0,
    };
    FixedOffset::east_opt(hours * 3600)
}

//! Parsing of caller-supplied `created_at` / `updated_at` values.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid timestamp `{0}`: expected RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`")]
pub struct InvalidTimestamp(String);

/// Accepts RFC 3339, a zone-less date-time (taken as UTC) or a bare date (midnight UTC).
/// The result is always in UTC, the way a `TIMESTAMPTZ` column hands it back.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, InvalidTimestamp> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts.to_offset(UtcOffset::UTC));
    }
    let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let t_separated = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(raw, spaced)
        .or_else(|_| PrimitiveDateTime::parse(raw, t_separated))
    {
        return Ok(dt.assume_utc());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| InvalidTimestamp(raw.to_string()))
}

/// Serde hook for optional request timestamps. An empty string counts as absent.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s).map(Some).map_err(serde::de::Error::custom),
    }
}

//! Serde adapter for backend timestamps.
//!
//! The store writes naive ISO-8601 (`2024-05-01T10:00:00.123456`) for some
//! records and RFC 3339 for others. Naive values are read as UTC; output is
//! always RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(value.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, NAIVE_FORMAT)
        .map(|value| value.and_utc())
        .map_err(|err| format!("invalid timestamp `{trimmed}`: {err}"))
}

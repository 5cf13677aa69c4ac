//! Serde helpers for the loose shapes the volume API emits.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;

/// Timestamp layout used by Cinder: no offset, UTC implied.
const CINDER_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, CINDER_TIMESTAMP)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Decodes an optional timestamp; `null`, absent, and empty strings map to
/// `None`.
pub(crate) fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::invalid_value(Unexpected::Str(&raw), &"a Cinder timestamp"))
}

/// Treats an explicit `null` like an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseBool {
    Bool(bool),
    Text(String),
}

/// Accepts `true`, `"true"`, `"True"` and their `false` counterparts.
pub(crate) fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseBool>::deserialize(deserializer)? {
        None => Ok(false),
        Some(LooseBool::Bool(value)) => Ok(value),
        Some(LooseBool::Text(text)) => match text.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            _ => Err(de::Error::invalid_value(
                Unexpected::Str(&text),
                &"a boolean or boolean string",
            )),
        },
    }
}

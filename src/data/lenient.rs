//! Decoders for the loosely-typed fields the academic API returns: ids that are
//! sometimes strings, flags that are sometimes numbers, and blank strings that
//! mean "not set".

use crate::data::{Choice, RecordId};
use jiff::civil::Date;
use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordId, D::Error> {
    opt_id(deserializer)?.ok_or_else(|| D::Error::custom("record without a usable id"))
}

pub fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RecordId>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

pub fn opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

///accepts `2001-05-03` and anything starting with it, eg. `2001-05-03T00:00:00.000000Z`
pub fn opt_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
    let Some(raw) = opt_string(deserializer)? else {
        return Ok(None);
    };

    Ok(raw.get(..10).and_then(|prefix| prefix.parse().ok()))
}

pub fn opt_choice<'de, D: Deserializer<'de>, T: Choice>(
    deserializer: D,
) -> Result<Option<T>, D::Error> {
    Ok(opt_string(deserializer)?.and_then(|raw| T::parse(&raw)))
}

pub fn choice_or_default<'de, D: Deserializer<'de>, T: Choice + Default>(
    deserializer: D,
) -> Result<T, D::Error> {
    let raw = opt_string(deserializer)?;
    Ok(match raw.as_deref().map(T::parse) {
        Some(Some(choice)) => choice,
        Some(None) => {
            warn!(?raw, "unknown choice from API, using default");
            T::default()
        }
        None => T::default(),
    })
}

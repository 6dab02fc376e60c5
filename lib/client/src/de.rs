//! Deserialization helpers for the backend's `false`-means-unset scalars.
//!
//! The wire format reports empty char/text/many2one columns as JSON `false`
//! rather than `null`. These adapters fold that into `None` so typed
//! records never choke on an unset column.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn falsy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

pub fn falsy_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        _ => None,
    })
}

/// `[id, display_name]` reference pairs, or `false` when unset.
pub fn falsy_ref<'de, D>(deserializer: D) -> Result<Option<(i64, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    match items.as_slice() {
        [id, name] => Ok(id
            .as_i64()
            .map(|id| (id, name.as_str().unwrap_or_default().to_string()))),
        _ => Ok(None),
    }
}

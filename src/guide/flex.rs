//! Lenient deserializers for loosely-typed provider JSON.
//!
//! The listings API serializes the same field as a number in one payload
//! and a string in the next, and omits keys freely across payload
//! revisions. These helpers absorb that here, once, so the rest of the
//! crate works with plain typed fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// String-or-number-or-null to `Option<String>`.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Number-or-numeric-string-or-null to `Option<i64>`.
pub(crate) fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Bool(b)) => Some(i64::from(b)),
        _ => None,
    })
}

/// Bool-or-number-or-string to `Option<bool>`.
pub(crate) fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => Some(n.as_i64().is_some_and(|i| i != 0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Decodes a list item by item, skipping elements that fail to decode.
///
/// A malformed record is logged and dropped; the remaining records are
/// kept. `null` or an absent list decodes to empty.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut items = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(item) => items.push(item),
            Err(error) => warn!(index, %error, "skipping malformed record"),
        }
    }
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        text: Option<String>,
        #[serde(default, deserialize_with = "opt_i64")]
        number: Option<i64>,
        #[serde(default, deserialize_with = "opt_bool")]
        flag: Option<bool>,
    }

    #[test]
    fn test_opt_string_accepts_numbers() {
        let probe: Probe = serde_json::from_str(r#"{"text": 42}"#).unwrap();
        assert_eq!(probe.text.as_deref(), Some("42"));
    }

    #[test]
    fn test_opt_string_null_is_none() {
        let probe: Probe = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert_eq!(probe.text, None);
    }

    #[test]
    fn test_opt_i64_accepts_numeric_strings() {
        let probe: Probe = serde_json::from_str(r#"{"number": "17"}"#).unwrap();
        assert_eq!(probe.number, Some(17));

        let probe: Probe = serde_json::from_str(r#"{"number": "junk"}"#).unwrap();
        assert_eq!(probe.number, None);
    }

    #[test]
    fn test_opt_bool_accepts_mixed_encodings() {
        for (json, expected) in [
            (r#"{"flag": true}"#, Some(true)),
            (r#"{"flag": 1}"#, Some(true)),
            (r#"{"flag": "true"}"#, Some(true)),
            (r#"{"flag": 0}"#, Some(false)),
            (r#"{"flag": "no"}"#, Some(false)),
            (r#"{}"#, None),
        ] {
            let probe: Probe = serde_json::from_str(json).unwrap();
            assert_eq!(probe.flag, expected, "{json}");
        }
    }

    #[derive(Debug, Deserialize)]
    struct ListProbe {
        #[serde(default, deserialize_with = "lenient_vec")]
        items: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        id: i64,
    }

    #[test]
    fn test_lenient_vec_skips_malformed_items() {
        let probe: ListProbe =
            serde_json::from_str(r#"{"items": [{"id": 1}, "garbage", {"id": 3}]}"#).unwrap();
        let ids: Vec<i64> = probe.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_lenient_vec_null_is_empty() {
        let probe: ListProbe = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(probe.items.is_empty());
    }
}

//! Serde helpers for backend records.
//!
//! The backend is loose about identifier types: the same field may arrive as
//! a string, a number or an embedded object depending on the endpoint.

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or integer identifier")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

/// Deserializes an optional identifier that may be a string or a number.
///
/// # Errors
///
/// Returns an error if the value is neither a string, an integer nor null.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IdVisitor)
}

/// Deserializes a required identifier that may be a string or a number.
///
/// # Errors
///
/// Returns an error if the value is missing, null, or of an unsupported type.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_id(deserializer)?.ok_or_else(|| de::Error::custom("identifier is null"))
}

/// Deserializes an optional number sent either as JSON number or numeric string.
///
/// Empty strings are treated as absent.
///
/// # Errors
///
/// Returns an error if a string value does not parse as a number.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid number {s:?}: {e}"))),
    }
}

/// A foreign-key style reference: either a bare id or the embedded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    /// Bare identifier.
    Id(#[serde(deserialize_with = "id")] String),
    /// Embedded record.
    Expanded(Box<T>),
}

impl<T> Related<T> {
    /// Returns the embedded record, if the backend expanded it.
    #[must_use]
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Self::Expanded(record) => Some(record),
            Self::Id(_) => None,
        }
    }

    /// Returns the bare identifier, if the backend sent one.
    #[must_use]
    pub fn bare_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Expanded(_) => None,
        }
    }
}

/// Deserializes an optional count sent as an integer or a numeric string.
///
/// Null, empty strings and values that are not a non-negative integer are
/// treated as absent.
///
/// # Errors
///
/// Only fails if the underlying deserializer does.
pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_of))
}

fn count_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Deserializes an optional value, treating null and any shape `T` rejects
/// as absent.
///
/// # Errors
///
/// Only fails if the underlying deserializer does.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Response body listing records, bare or wrapped in `{"data": [...]}`.
///
/// Records are decoded one by one so a failure names the record and, when
/// it can be isolated, the field at fault.
#[derive(Debug)]
pub enum ListEnvelope<T> {
    /// `[...]`
    Bare(Vec<T>),
    /// `{"data": [...]}`
    Wrapped {
        /// Wrapped records.
        data: Vec<T>,
    },
}

const SHAPE_ERROR: &str = "expected a list or an object with a `data` list";

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListEnvelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let envelope = match Value::deserialize(deserializer)? {
            Value::Array(items) => records(&items).map(Self::Bare),
            Value::Object(mut body) => match body.remove("data") {
                Some(Value::Array(items)) => records(&items).map(|data| Self::Wrapped { data }),
                _ => Err(SHAPE_ERROR.to_string()),
            },
            _ => Err(SHAPE_ERROR.to_string()),
        };
        envelope.map_err(de::Error::custom)
    }
}

fn records<T: DeserializeOwned>(items: &[Value]) -> Result<Vec<T>, String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| match culprit::<T>(item) {
                Some(field) => format!("record {index}, field `{field}`: {e}"),
                None => format!("record {index}: {e}"),
            })
        })
        .collect()
}

/// Finds the field whose removal lets the record decode.
fn culprit<T: DeserializeOwned>(record: &Value) -> Option<String> {
    let fields = record.as_object()?;
    fields.keys().find_map(|key| {
        let mut trimmed = fields.clone();
        trimmed.remove(key);
        T::deserialize(&Value::Object(trimmed))
            .is_ok()
            .then(|| key.clone())
    })
}

impl<T> ListEnvelope<T> {
    /// Unwraps the records.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

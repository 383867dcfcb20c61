//! Lenient field deserializers
//!
//! Media routes accept either a JSON body or `multipart/form-data`. Multipart
//! text fields always arrive as strings, so request types use these helpers
//! for fields that are numbers, lists or objects in JSON.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::shared::users::BikeDetails;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BikeOrText {
    Details(BikeDetails),
    Text(String),
}

/// Number from a JSON number or a numeric string; blank is absent
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(number)) => Ok(Some(number)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {}", text))),
    }
}

/// Text where an empty or whitespace-only value counts as absent
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|text| !text.trim().is_empty()))
}

/// User IDs from a JSON array or a comma-separated string
pub fn opt_uuid_list<'de, D>(deserializer: D) -> Result<Option<Vec<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = match Option::<ListOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(ListOrText::List(items)) => items,
        Some(ListOrText::Text(text)) => {
            let text = text.trim();
            if text.starts_with('[') {
                serde_json::from_str(text).map_err(D::Error::custom)?
            } else {
                text.split(',').map(str::to_string).collect()
            }
        }
    };
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| {
            Uuid::parse_str(item).map_err(|_| D::Error::custom(format!("invalid user id: {}", item)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Bike details from a JSON object or a JSON-encoded string; blank is absent
pub fn opt_bike_details<'de, D>(deserializer: D) -> Result<Option<BikeDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BikeOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BikeOrText::Details(details)) => Ok(Some(details)),
        Some(BikeOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(BikeOrText::Text(text)) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|_| D::Error::custom("bikeDetails must be an object")),
    }
}

/// Free-form JSON; a string holding a JSON object or array is decoded
pub fn opt_json<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(value) => value,
    };
    match value {
        serde_json::Value::String(text) if text.trim().is_empty() => Ok(None),
        serde_json::Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                if let Ok(decoded) = serde_json::from_str(trimmed) {
                    return Ok(Some(decoded));
                }
            }
            Ok(Some(serde_json::Value::String(text)))
        }
        other => Ok(Some(other)),
    }
}

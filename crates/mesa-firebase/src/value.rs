//! Document-store typed values
//!
//! The REST API wraps every field in a one-key object naming its type
//! (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...). Favorites travel
//! as plain JSON in the rest of the workspace, so this module converts between
//! the two. `savedAt` is the only field written as a timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value, json};

use mesa_api::{Favorite, PersistenceError};

pub const SAVED_AT_FIELD: &str = "savedAt";

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Integers are sent as decimal strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            if values.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

pub fn decode_value(value: &Value) -> Result<Value, PersistenceError> {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Err(malformed(value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool).ok_or_else(|| malformed(value)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| malformed(value))
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            // Non-finite doubles have no JSON representation
            Ok(parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| malformed(value)),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Object(fields))
        }
        "geoPointValue" => Ok(json!({
            "lat": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "lng": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        _ => Err(malformed(value)),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, PersistenceError> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

fn malformed(value: &Value) -> PersistenceError {
    PersistenceError::Serialization {
        message: format!("unrecognized document value: {}", value),
    }
}

/// Document `fields` for a favorite record.
pub fn favorite_to_fields(favorite: &Favorite) -> Result<Map<String, Value>, PersistenceError> {
    let Value::Object(record) = serde_json::to_value(favorite)? else {
        return Err(PersistenceError::Serialization {
            message: "favorite did not serialize to an object".to_string(),
        });
    };

    let mut fields = encode_fields(&record);
    fields.insert(
        SAVED_AT_FIELD.to_string(),
        json!({ "timestampValue": format_timestamp(favorite.saved_at) }),
    );
    Ok(fields)
}

/// Favorite record from document `fields`.
pub fn favorite_from_fields(fields: &Map<String, Value>) -> Result<Favorite, PersistenceError> {
    let record = decode_fields(fields)?;
    Ok(serde_json::from_value(Value::Object(record))?)
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

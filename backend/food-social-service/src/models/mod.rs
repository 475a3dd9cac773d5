/// Record schemas for food-social-service
///
/// Each schema is a typed record stored as one document in its own collection:
/// - Restaurant: a place with coordinates, stored in `restaurant`
/// - Post: a social post optionally tied to a restaurant, stored in `post`
///
/// Incoming payloads are checked in three passes (required keys, typed
/// deserialization, range rules). A failing pass does not stop the later
/// ones, so every violating field is reported.
pub mod post;
pub mod restaurant;

pub use post::Post;
pub use restaurant::Restaurant;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use serde_path_to_error::Segment;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Payload rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid payload: {}", DisplayFields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldViolation>,
}

struct DisplayFields<'a>(&'a [FieldViolation]);

impl fmt::Display for DisplayFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn new(fields: Vec<FieldViolation>) -> Self {
        Self { fields }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, message)])
    }

    /// Names of the violating fields, in report order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|v| v.field.as_str()).collect()
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code));
                    FieldViolation::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self { fields }
    }
}

/// A record shape persisted as a document in a named collection.
pub trait Schema: Serialize + DeserializeOwned + Validate + Sized {
    /// Collection holding documents of this shape.
    const COLLECTION: &'static str;

    /// Fields that must be present and non-null.
    const REQUIRED: &'static [&'static str];

    /// A value of the right type that passes every rule for `field`.
    ///
    /// Stands in for a missing or mistyped field so the remaining fields can
    /// still be checked; violations on stand-ins are never reported.
    fn placeholder(field: &str) -> Option<Value>;

    /// Validate a raw JSON payload into a normalized record.
    ///
    /// Unknown keys are dropped; optional keys that are absent take their
    /// declared defaults. Every violating field is reported, sorted by name.
    fn from_payload(payload: Value) -> Result<Self, ValidationError> {
        let mut map = match payload {
            Value::Object(map) => map,
            other => {
                return Err(ValidationError::single(
                    "body",
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ))
            }
        };

        let mut violations = Vec::new();
        let mut substituted: HashSet<String> = HashSet::new();

        for key in Self::REQUIRED {
            if map.get(*key).map_or(true, Value::is_null) {
                violations.push(FieldViolation::new(*key, "field required"));
                stand_in::<Self>(&mut map, key);
                substituted.insert(key.to_string());
            }
        }

        // Each pass replaces one mistyped field, so this ends after at most
        // one pass per field.
        let record: Self = loop {
            let attempt: Result<Self, _> =
                serde_path_to_error::deserialize(Value::Object(map.clone()));
            match attempt {
                Ok(record) => break record,
                Err(err) => {
                    let field = match err.path().iter().next() {
                        Some(Segment::Map { key }) if !substituted.contains(key) => key.clone(),
                        _ => {
                            violations.push(FieldViolation::new("body", err.inner().to_string()));
                            return Err(sorted(violations));
                        }
                    };
                    violations.push(FieldViolation::new(field.as_str(), err.inner().to_string()));
                    stand_in::<Self>(&mut map, &field);
                    substituted.insert(field);
                }
            }
        };

        if let Err(errors) = record.validate() {
            violations.extend(
                ValidationError::from(errors)
                    .fields
                    .into_iter()
                    .filter(|v| !substituted.contains(&v.field)),
            );
        }

        if violations.is_empty() {
            Ok(record)
        } else {
            Err(sorted(violations))
        }
    }

    /// Flatten the record into document fields for the store.
    fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "record serialized to {} instead of an object",
                json_kind(&other)
            ))),
        }
    }
}

/// Put a valid stand-in for `field` into `map`, or drop the key when the
/// field is optional.
fn stand_in<S: Schema>(map: &mut Map<String, Value>, field: &str) {
    match S::placeholder(field) {
        Some(value) => {
            map.insert(field.to_string(), value);
        }
        None => {
            map.remove(field);
        }
    }
}

fn sorted(mut fields: Vec<FieldViolation>) -> ValidationError {
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    ValidationError::new(fields)
}

/// Accept integers, and floats with no fractional part, as `Option<i64>`.
pub(crate) fn lax_optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<serde_json::Number>::deserialize(deserializer)? {
        Some(number) => number,
        None => return Ok(None),
    };
    if let Some(i) = number.as_i64() {
        return Ok(Some(i));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(D::Error::custom(format!(
            "invalid value: {}, expected an integer",
            number
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Restaurant::from_payload(json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.field_names(), vec!["body"]);
        assert!(err.fields[0].message.contains("array"));
    }

    #[test]
    fn display_joins_every_field() {
        let err = ValidationError::new(vec![
            FieldViolation::new("latitude", "out of range"),
            FieldViolation::new("longitude", "out of range"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid payload: latitude: out of range; longitude: out of range"
        );
    }
}

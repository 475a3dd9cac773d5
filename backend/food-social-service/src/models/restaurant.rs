use super::Schema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

/// A restaurant listed on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Restaurant {
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Cover image URL
    #[serde(default)]
    pub image_url: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
    #[serde(default = "default_is_open")]
    pub is_open: bool,
}

fn default_is_open() -> bool {
    true
}

impl Schema for Restaurant {
    const COLLECTION: &'static str = "restaurant";
    const REQUIRED: &'static [&'static str] = &["name", "latitude", "longitude"];

    fn placeholder(field: &str) -> Option<Value> {
        match field {
            "name" => Some(json!("")),
            "latitude" | "longitude" => Some(json!(0.0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let r = Restaurant::from_payload(json!({
            "name": "Pasta Place",
            "latitude": 40.0,
            "longitude": -73.0,
        }))
        .unwrap();

        assert!(r.is_open);
        assert_eq!(r.cuisine, None);
        assert_eq!(r.description, None);
        assert_eq!(r.image_url, None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        for (lat, lng) in [(90.0, 180.0), (-90.0, -180.0)] {
            let payload = json!({"name": "Edge", "latitude": lat, "longitude": lng});
            assert!(Restaurant::from_payload(payload).is_ok(), "{lat},{lng}");
        }
    }

    #[test]
    fn every_out_of_range_coordinate_is_reported() {
        let err = Restaurant::from_payload(json!({
            "name": "Nowhere",
            "latitude": 90.5,
            "longitude": -180.01,
        }))
        .unwrap_err();

        assert_eq!(err.field_names(), vec!["latitude", "longitude"]);
    }

    #[test]
    fn missing_required_fields_are_listed_together() {
        let err = Restaurant::from_payload(json!({"cuisine": "thai", "latitude": null})).unwrap_err();
        assert_eq!(err.field_names(), vec!["latitude", "longitude", "name"]);
        assert!(err.fields.iter().all(|f| f.message == "field required"));
    }

    #[test]
    fn range_rules_still_run_when_fields_are_missing() {
        let err = Restaurant::from_payload(json!({"latitude": 100.0})).unwrap_err();
        assert_eq!(err.field_names(), vec!["latitude", "longitude", "name"]);
        assert_eq!(err.fields[0].message, "must be between -90 and 90");
        assert_eq!(err.fields[1].message, "field required");
    }

    #[test]
    fn extra_fields_are_dropped() {
        let r = Restaurant::from_payload(json!({
            "name": "Taco Stand",
            "latitude": 19.4,
            "longitude": -99.1,
            "owner": "someone",
        }))
        .unwrap();

        let fields = r.to_fields().unwrap();
        assert!(!fields.contains_key("owner"));
        assert_eq!(fields.get("cuisine"), Some(&serde_json::Value::Null));
        assert_eq!(fields.get("is_open"), Some(&json!(true)));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = Restaurant::from_payload(json!({
            "name": "Typo",
            "latitude": "forty",
            "longitude": 1.0,
        }))
        .unwrap_err();
        assert_eq!(err.field_names(), vec!["latitude"]);
        assert!(err.fields[0].message.contains("invalid type"));
    }

    #[test]
    fn type_and_range_errors_are_reported_together() {
        let err = Restaurant::from_payload(json!({
            "name": 42,
            "latitude": "forty",
            "longitude": 500.0,
            "is_open": "yes",
        }))
        .unwrap_err();
        assert_eq!(
            err.field_names(),
            vec!["is_open", "latitude", "longitude", "name"]
        );
    }
}

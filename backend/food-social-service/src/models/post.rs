use super::{lax_optional_int, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

/// A social post about food, optionally tied to a restaurant.
///
/// `restaurant_id` is a plain string reference; nothing checks that the
/// restaurant exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Post {
    #[serde(default)]
    pub restaurant_id: Option<String>,
    /// Author display name
    pub author: String,
    pub content: String,
    /// Image URLs
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Whole number 1-5; `4.0` is accepted as `4`
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    #[serde(default, deserialize_with = "lax_optional_int")]
    #[schema(value_type = Option<i64>)]
    pub rating: Option<i64>,
}

impl Schema for Post {
    const COLLECTION: &'static str = "post";
    const REQUIRED: &'static [&'static str] = &["author", "content"];

    fn placeholder(field: &str) -> Option<Value> {
        match field {
            "author" | "content" => Some(json!("")),
            _ => None,
        }
    }
}

/// Restaurant handlers - HTTP endpoints for restaurant operations
use super::{create_record, list_records, CreatedResponse};
use crate::db::{Filter, StoredDocument};
use crate::error::Result;
use crate::models::{Restaurant, Schema};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde_json::Value;

/// Create a restaurant
#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "restaurants",
    request_body = Restaurant,
    responses(
        (status = 201, description = "Restaurant stored", body = CreatedResponse),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Payload failed validation"),
        (status = 500, description = "Document store failure"),
    )
)]
pub async fn create_restaurant(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse> {
    create_record::<Restaurant>(&state, payload.into_inner()).await
}

/// List all restaurants
#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurants",
    responses(
        (status = 200, description = "Every stored restaurant", body = [StoredDocument]),
        (status = 500, description = "Document store failure"),
    )
)]
pub async fn list_restaurants(state: web::Data<AppState>) -> Result<HttpResponse> {
    list_records(&state, Restaurant::COLLECTION, Filter::new()).await
}

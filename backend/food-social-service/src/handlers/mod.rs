/// HTTP handlers for food-social-service
///
/// This module contains handlers for:
/// - Restaurants: create and list
/// - Posts: create and list, optionally filtered by restaurant
/// - Health: root banner and the `/test` database diagnostic
///
/// Resource routes are served both at the root and under `/api`.
pub mod health;
pub mod posts;
pub mod restaurants;

pub use health::{database_diagnostics, root};
pub use posts::{create_post, list_posts};
pub use restaurants::{create_restaurant, list_restaurants};

use crate::db::{Filter, StoreError};
use crate::error::{AppError, Result};
use crate::metrics::{DOCUMENTS_CREATED_TOTAL, STORE_ERRORS_TOTAL, VALIDATION_FAILURES_TOTAL};
use crate::models::Schema;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Body returned by create endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    /// Store-assigned identifier
    pub id: String,
}

/// Register the resource routes (restaurants and posts) on `cfg`.
pub fn resource_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/restaurants")
            .route(web::post().to(create_restaurant))
            .route(web::get().to(list_restaurants)),
    )
    .service(
        web::resource("/posts")
            .route(web::post().to(create_post))
            .route(web::get().to(list_posts)),
    );
}

/// Full route table: banner, diagnostics and the resource routes at `/` and `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(root))
        .route("/test", web::get().to(database_diagnostics))
        .service(web::scope("/api").configure(resource_routes))
        .configure(resource_routes);
}

/// Largest accepted JSON body.
pub const JSON_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// JSON extractor settings; unparseable bodies become 400s in the service's error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Validate `payload` as `S`, insert it and answer `201 {id}`.
pub(crate) async fn create_record<S: Schema>(
    state: &AppState,
    payload: Value,
) -> Result<HttpResponse> {
    let record = S::from_payload(payload).map_err(|err| {
        VALIDATION_FAILURES_TOTAL
            .with_label_values(&[S::COLLECTION])
            .inc();
        tracing::warn!(collection = S::COLLECTION, error = %err, "payload rejected");
        err
    })?;

    let fields = record.to_fields()?;
    let id = state
        .store()
        .map_err(|e| store_failure("create", S::COLLECTION, e))?
        .create_document(S::COLLECTION, fields)
        .await
        .map_err(|e| store_failure("create", S::COLLECTION, e))?;

    DOCUMENTS_CREATED_TOTAL
        .with_label_values(&[S::COLLECTION])
        .inc();
    tracing::info!(collection = S::COLLECTION, id = %id, "document created");

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// List every document of `collection` matching `filter`.
pub(crate) async fn list_records(
    state: &AppState,
    collection: &'static str,
    filter: Filter,
) -> Result<HttpResponse> {
    let docs = state
        .store()
        .map_err(|e| store_failure("list", collection, e))?
        .get_documents(collection, filter)
        .await
        .map_err(|e| store_failure("list", collection, e))?;

    tracing::debug!(collection, count = docs.len(), "documents listed");
    Ok(HttpResponse::Ok().json(docs))
}

fn store_failure(operation: &str, collection: &str, err: StoreError) -> AppError {
    STORE_ERRORS_TOTAL
        .with_label_values(&[operation, collection])
        .inc();
    tracing::error!(operation, collection, error = %err, "document store call failed");
    AppError::Store(err)
}

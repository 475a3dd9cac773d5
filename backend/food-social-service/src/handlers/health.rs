/// Service banner and database diagnostics
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest error excerpt echoed back by the diagnostic route.
const ERROR_EXCERPT_CHARS: usize = 80;
const MAX_LISTED_COLLECTIONS: usize = 10;

/// Free-form database status report served at `/test`.
///
/// Failures never escape as errors; they are folded into the `database` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl Default for DiagnosticReport {
    fn default() -> Self {
        Self {
            backend: "Running".to_string(),
            database: "Not Available".to_string(),
            database_url: "Not Set".to_string(),
            database_name: "Not Set".to_string(),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        }
    }
}

fn excerpt(message: &str) -> String {
    message.chars().take(ERROR_EXCERPT_CHARS).collect()
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is running"))
)]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Food Social Platform API running"
    }))
}

/// Report backend and database availability
#[utoipa::path(
    get,
    path = "/test",
    tag = "health",
    responses((status = 200, description = "Diagnostic report", body = DiagnosticReport))
)]
pub async fn database_diagnostics(state: web::Data<AppState>) -> HttpResponse {
    let mut report = DiagnosticReport::default();

    if let Ok(store) = state.store() {
        report.database = "Available".to_string();
        report.database_url = if state.database_url_set() {
            "Set".to_string()
        } else {
            "Not Set".to_string()
        };
        report.database_name = store.database_name();
        report.connection_status = "Connected".to_string();

        match store.list_collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                report.collections = names;
                report.database = "Connected & Working".to_string();
            }
            Err(err) => {
                tracing::warn!(error = %err, "collection listing failed during diagnostics");
                report.database = format!("Connected but Error: {}", excerpt(&err.to_string()));
            }
        }
    }

    HttpResponse::Ok().json(report)
}

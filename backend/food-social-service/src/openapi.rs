/// OpenAPI documentation for the Food Social Service
use crate::db::StoredDocument;
use crate::handlers::{self, health::DiagnosticReport, CreatedResponse};
use crate::models::{FieldViolation, Post, Restaurant};
use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Social Platform API",
        version = "1.0.0",
        description = "Restaurants and the posts people write about them. Payloads are validated against the Restaurant and Post schemas before being stored as documents; list responses carry the store-assigned `_id` as a string.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    ),
    paths(
        handlers::health::root,
        handlers::health::database_diagnostics,
        handlers::restaurants::create_restaurant,
        handlers::restaurants::list_restaurants,
        handlers::posts::create_post,
        handlers::posts::list_posts,
    ),
    components(schemas(
        Restaurant,
        Post,
        StoredDocument,
        CreatedResponse,
        FieldViolation,
        DiagnosticReport,
    )),
    tags(
        (name = "health", description = "Service banner and database diagnostics"),
        (name = "restaurants", description = "Restaurant creation and listing"),
        (name = "posts", description = "Post creation and listing"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/openapi.json"
    }
}

/// Serve the OpenAPI document registered as app data.
pub async fn openapi_json(
    doc: web::Data<utoipa::openapi::OpenApi>,
) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(doc.get_ref()).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[::core::prelude::v1::test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/test", "/restaurants", "/posts"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[actix_web::test]
    async fn openapi_json_serves_the_document() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ApiDoc::openapi()))
                .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(ApiDoc::openapi_json_path())
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["info"]["title"], "Food Social Platform API");
        assert!(body["paths"]["/restaurants"]["post"].is_object());
    }
}

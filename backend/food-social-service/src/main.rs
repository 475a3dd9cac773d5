use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use food_social_service::config::{Config, DatabaseBackend};
use food_social_service::db::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore};
use food_social_service::handlers;
use food_social_service::metrics;
use food_social_service::middleware::MetricsMiddleware;
use food_social_service::openapi::{self, ApiDoc};
use food_social_service::AppState;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Build the document store selected by configuration.
///
/// Returns `None` when MongoDB is selected but no connection string is set,
/// or when the client cannot be constructed; the service then runs without
/// a database.
async fn build_store(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Some(Arc::new(InMemoryDocumentStore::new()))
        }
        DatabaseBackend::Mongodb => {
            let Some(url) = config.database.url.as_deref() else {
                tracing::warn!("DATABASE_URL not set; running without a database");
                return None;
            };

            match MongoDocumentStore::connect(url, config.database.name.as_deref()).await {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::error!("MongoDB client initialization failed: {}", e);
                    None
                }
            }
        }
    }
}

/// Food Social Service
///
/// Create/list endpoints for restaurants and posts backed by MongoDB.
///
/// # Routes
///
/// - `GET /` - banner
/// - `GET /test` - database diagnostics
/// - `POST|GET /restaurants` (also under `/api`)
/// - `POST|GET /posts` (also under `/api`)
/// - `GET /metrics`, `GET /openapi.json`, `/docs/`
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Support container healthchecks via CLI subcommand: `healthcheck`
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let url = format!("http://127.0.0.1:{}/", port);
        return match reqwest::Client::new().get(&url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => {
                eprintln!("healthcheck HTTP status: {}", resp.status());
                Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
            }
            Err(e) => {
                eprintln!("healthcheck HTTP error: {}", e);
                Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
            }
        };
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting food-social-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let store = build_store(&config).await;
    let state = web::Data::new(AppState::new(store, config.database.url_is_set()));

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let mut server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .app_data(web::Data::new(openapi_doc.clone()))
            .wrap(MetricsMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi_doc))
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi::openapi_json))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .configure(handlers::configure)
    });
    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    let server = server.bind(&bind_address)?.run();
    let server_handle = server.handle();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = tokio::select! {
        result = server => result,
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            Ok(())
        }
    };

    tracing::info!("food-social-service shutting down");
    result
}

/// Food Social Service Library
///
/// REST backend for a food-social platform: restaurants and the posts people
/// write about them, stored as documents in MongoDB.
///
/// # Modules
///
/// - `models`: Restaurant and Post schemas with payload validation
/// - `db`: Document store gateway (MongoDB and in-memory implementations)
/// - `handlers`: HTTP request handlers and route table
/// - `middleware`: Request metrics middleware
/// - `metrics`: Prometheus collectors
/// - `openapi`: OpenAPI document
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;

pub use config::Config;
pub use error::{AppError, Result};

use db::{DocumentStore, StoreError};
use std::sync::Arc;

/// Process-wide state shared with every handler.
///
/// `store` is `None` when no database is configured; data routes then fail
/// with [`StoreError::Unavailable`] while the diagnostic route keeps working.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn DocumentStore>>,
    database_url_set: bool,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, database_url_set: bool) -> Self {
        Self {
            store,
            database_url_set,
        }
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(Some(store), true)
    }

    pub fn without_store() -> Self {
        Self::new(None, false)
    }

    pub fn store(&self) -> std::result::Result<&dyn DocumentStore, StoreError> {
        self.store.as_deref().ok_or(StoreError::Unavailable)
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn database_url_set(&self) -> bool {
        self.database_url_set
    }
}

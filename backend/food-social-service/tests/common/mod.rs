//! Shared fixtures for the HTTP integration tests.

use actix_web::{web, App};
use async_trait::async_trait;
use food_social_service::db::{
    DocumentStore, Filter, InMemoryDocumentStore, StoreError, StoreResult, StoredDocument,
};
use food_social_service::handlers;
use food_social_service::AppState;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Store whose every call fails the way an unreachable MongoDB would.
pub struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn create_document(
        &self,
        _collection: &str,
        _record: Map<String, Value>,
    ) -> StoreResult<String> {
        Err(StoreError::Connection(
            "Server selection timeout: No available servers".to_string(),
        ))
    }

    async fn get_documents(
        &self,
        _collection: &str,
        _filter: Filter,
    ) -> StoreResult<Vec<StoredDocument>> {
        Err(StoreError::Connection(
            "Server selection timeout: No available servers".to_string(),
        ))
    }

    fn database_name(&self) -> String {
        "food_social".to_string()
    }

    async fn list_collection_names(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::Rejected(format!(
            "command listCollections requires authentication {}",
            "x".repeat(200)
        )))
    }
}

pub fn memory_state() -> (Arc<InMemoryDocumentStore>, web::Data<AppState>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let state = web::Data::new(AppState::with_store(store.clone()));
    (store, state)
}

pub fn app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(handlers::configure)
}

/// Document store gateway
///
/// All database access goes through [`DocumentStore`]: one insert and one
/// equality-filtered query per call, against a named collection. Records
/// arrive already validated; the gateway only stamps timestamps and returns
/// store-assigned identifiers as strings.
pub mod memory;
pub mod mongo;

pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Field name holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Equality filter: every listed field must equal the given value.
pub type Filter = Map<String, Value>;

/// Failure talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No database is configured for this process.
    #[error("Database not available")]
    Unavailable,

    #[error("Database connection failed: {0}")]
    Connection(String),

    /// The store refused the insert or query.
    #[error("{0}")]
    Rejected(String),

    #[error("Document serialization failed: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A document read back from the store, identifier normalized to a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

impl StoredDocument {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `record` as a new document and return its identifier.
    async fn create_document(&self, collection: &str, record: Map<String, Value>)
        -> StoreResult<String>;

    /// All documents in `collection` matching `filter`; empty filter matches all.
    async fn get_documents(&self, collection: &str, filter: Filter)
        -> StoreResult<Vec<StoredDocument>>;

    /// Name of the backing database, for diagnostics.
    fn database_name(&self) -> String;

    async fn list_collection_names(&self) -> StoreResult<Vec<String>>;
}

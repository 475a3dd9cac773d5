//! Process-local document store.
//!
//! Keeps collections in memory with MongoDB-style ObjectId identifiers. Used
//! by the HTTP tests and by `DATABASE_BACKEND=memory` for local runs; data is
//! lost on restart.

use super::{DocumentStore, Filter, StoreResult, StoredDocument};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

pub const MEMORY_DATABASE_NAME: &str = "memory";

#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn matches(doc: &StoredDocument, filter: &Filter) -> bool {
    filter.iter().all(|(key, expected)| match key.as_str() {
        super::ID_FIELD => expected.as_str() == Some(doc.id.as_str()),
        _ => doc.fields.get(key).unwrap_or(&Value::Null) == expected,
    })
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(
        &self,
        collection: &str,
        mut record: Map<String, Value>,
    ) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        record.insert("created_at".to_string(), Value::String(now.clone()));
        record.insert("updated_at".to_string(), Value::String(now));

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                fields: record,
            });

        Ok(id)
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Filter,
    ) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn database_name(&self) -> String {
        MEMORY_DATABASE_NAME.to_string()
    }

    async fn list_collection_names(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_object_id_and_timestamps() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create_document("restaurant", fields(json!({"name": "Pasta Place"})))
            .await
            .unwrap();

        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        let docs = store.get_documents("restaurant", Filter::new()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].get("created_at"), docs[0].get("updated_at"));
    }

    #[tokio::test]
    async fn filter_is_exact_match() {
        let store = InMemoryDocumentStore::new();
        for rid in ["abc", "abcd", "abc"] {
            store
                .create_document("post", fields(json!({"restaurant_id": rid})))
                .await
                .unwrap();
        }
        store
            .create_document("post", fields(json!({"restaurant_id": null})))
            .await
            .unwrap();

        let filter = fields(json!({"restaurant_id": "abc"}));
        let docs = store.get_documents("post", filter).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(store.count("post").await, 4);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.get_documents("nope", Filter::new()).await.unwrap().is_empty());
        assert!(store.list_collection_names().await.unwrap().is_empty());
    }
}

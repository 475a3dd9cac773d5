//! MongoDB-backed document store.

use super::{DocumentStore, Filter, StoreError, StoreResult, StoredDocument, ID_FIELD};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Database used when neither the config nor the connection string names one.
pub const DEFAULT_DATABASE_NAME: &str = "food_social";

#[derive(Clone)]
pub struct MongoDocumentStore {
    db: Database,
}

impl MongoDocumentStore {
    /// Build a client from a connection string.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation rather than here.
    pub async fn connect(url: &str, database_name: Option<&str>) -> StoreResult<Self> {
        let options = ClientOptions::parse(url).await.map_err(StoreError::from)?;
        let name = database_name
            .map(str::to_string)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let client = Client::with_options(options).map_err(StoreError::from)?;
        info!(database = %name, "MongoDB client initialized");

        Ok(Self::from_database(client.database(&name)))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn create_document(
        &self,
        collection: &str,
        record: Map<String, Value>,
    ) -> StoreResult<String> {
        let mut doc =
            bson::to_document(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let now = bson::DateTime::now();
        doc.insert("created_at", now);
        doc.insert("updated_at", now);

        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(doc, None)
            .await?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        debug!(collection, id = %id, "document inserted");
        Ok(id)
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Filter,
    ) -> StoreResult<Vec<StoredDocument>> {
        let filter =
            bson::to_document(&filter).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, None)
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;

        Ok(docs.into_iter().map(into_stored).collect())
    }

    fn database_name(&self) -> String {
        self.db.name().to_string()
    }

    async fn list_collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.db.list_collection_names(None).await?)
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::InvalidArgument { .. } => StoreError::Connection(err.to_string()),
            _ => StoreError::Rejected(err.to_string()),
        }
    }
}

fn into_stored(mut doc: Document) -> StoredDocument {
    let id = match doc.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let fields = doc
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();

    StoredDocument { id, fields }
}

/// Relaxed extended JSON, except ObjectIds and dates become plain strings.
fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn object_id_is_lifted_out_as_hex() {
        let oid = ObjectId::new();
        let stored = into_stored(doc! {
            "_id": oid,
            "name": "Pasta Place",
            "latitude": 40.0,
            "is_open": true,
            "cuisine": Bson::Null,
        });

        assert_eq!(stored.id, oid.to_hex());
        assert_eq!(stored.id.len(), 24);
        assert!(!stored.fields.contains_key("_id"));
        assert_eq!(stored.get("name"), Some(&json!("Pasta Place")));
        assert_eq!(stored.get("latitude"), Some(&json!(40.0)));
        assert_eq!(stored.get("cuisine"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn malformed_connection_string_is_a_connection_error() {
        let err = MongoDocumentStore::connect("not-a-mongo-url", None)
            .await
            .err()
            .expect("parse should fail");
        assert!(matches!(err, StoreError::Connection(_)));
    }

    #[tokio::test]
    async fn database_name_falls_back_to_connection_string_then_default() {
        let store = MongoDocumentStore::connect("mongodb://127.0.0.1:27017/reviews", None)
            .await
            .expect("client");
        assert_eq!(store.database_name(), "reviews");

        let store = MongoDocumentStore::connect("mongodb://127.0.0.1:27017", None)
            .await
            .expect("client");
        assert_eq!(store.database_name(), DEFAULT_DATABASE_NAME);

        let store = MongoDocumentStore::connect("mongodb://127.0.0.1:27017/reviews", Some("other"))
            .await
            .expect("client");
        assert_eq!(store.database_name(), "other");
    }

    #[test]
    fn dates_render_as_rfc3339() {
        let dt = bson::DateTime::from_millis(0);
        assert_eq!(
            bson_to_json(Bson::DateTime(dt)),
            json!("1970-01-01T00:00:00Z")
        );
    }

    #[test]
    fn arrays_and_integers_stay_plain() {
        let value = bson_to_json(Bson::Document(doc! {
            "images": ["a.jpg", "b.jpg"],
            "rating": 4_i64,
        }));
        assert_eq!(value, json!({"images": ["a.jpg", "b.jpg"], "rating": 4}));
    }
}

/// Post handlers - HTTP endpoints for post operations
use super::{create_record, list_records, CreatedResponse};
use crate::db::{Filter, StoredDocument};
use crate::error::Result;
use crate::models::{Post, Schema};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// Only return posts whose `restaurant_id` equals this value exactly
    pub restaurant_id: Option<String>,
}

impl ListPostsQuery {
    /// Equality filter for the store. An empty `restaurant_id` means no filter.
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(id) = self.restaurant_id.as_deref().filter(|id| !id.is_empty()) {
            filter.insert("restaurant_id".to_string(), Value::String(id.to_string()));
        }
        filter
    }
}

/// Create a post
#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    request_body = Post,
    responses(
        (status = 201, description = "Post stored", body = CreatedResponse),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Payload failed validation"),
        (status = 500, description = "Document store failure"),
    )
)]
pub async fn create_post(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse> {
    create_record::<Post>(&state, payload.into_inner()).await
}

/// List posts, optionally for one restaurant
#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Matching posts", body = [StoredDocument]),
        (status = 500, description = "Document store failure"),
    )
)]
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    list_records(&state, Post::COLLECTION, query.to_filter()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_restaurant_id_does_not_filter() {
        let query = ListPostsQuery {
            restaurant_id: Some(String::new()),
        };
        assert!(query.to_filter().is_empty());
        assert!(ListPostsQuery::default().to_filter().is_empty());
    }

    #[test]
    fn restaurant_id_becomes_equality_filter() {
        let query = ListPostsQuery {
            restaurant_id: Some("65f0c2a1e4b0a1b2c3d4e5f6".into()),
        };
        let filter = query.to_filter();
        assert_eq!(filter.len(), 1);
        assert_eq!(
            filter.get("restaurant_id"),
            Some(&Value::String("65f0c2a1e4b0a1b2c3d4e5f6".into()))
        );
    }
}

//! Query string extractor and parameter sets

use agora_core::{SortOption, TopicSort};
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::response::ApiError;

/// `Query<T>` with rejections in the API error format
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;
        Ok(QueryParams(params))
    }
}

/// `GET /api/topics?sort=&country=`
#[derive(Debug, Default, Deserialize)]
pub struct TopicFeedParams {
    #[serde(default, deserialize_with = "lenient_topic_sort")]
    pub sort: TopicSort,
    #[serde(default)]
    pub country: Option<String>,
}

/// Unknown feed orders fall back to newest first
fn lenient_topic_sort<'de, D>(deserializer: D) -> Result<TopicSort, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

/// `GET /api/topics/search?q=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/topics/:id/thread?sort=`
#[derive(Debug, Default, Deserialize)]
pub struct ThreadParams {
    #[serde(default)]
    pub sort: SortOption,
}

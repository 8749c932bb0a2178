//! API Handlers
//!
//! HTTP request handlers mapping gateway endpoints onto cache operations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::Cache;
use crate::error::{CacheError, CacheResult};
use crate::models::{
    DeleteResponse, GetManyResponse, GetResponse, HealthResponse, KeysRequest, PatternRequest,
    SetManyRequest, SetManyResponse, SetRequest, SetResponse, StatsResponse, VersionQuery,
};
use crate::repository::InMemoryRepository;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Cache façade
    pub cache: Cache,
    /// Set when the cache runs on the in-memory backend, for `/stats`
    pub memory: Option<InMemoryRepository>,
}

impl AppState {
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            memory: None,
        }
    }

    /// Exposes in-memory statistics through `/stats`.
    pub fn with_memory_stats(mut self, repository: InMemoryRepository) -> Self {
        self.memory = Some(repository);
        self
    }
}

/// Handler for `PUT /cache/:key`
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<VersionQuery>,
    Json(req): Json<SetRequest>,
) -> CacheResult<Json<SetResponse>> {
    let version = query.version();
    let written = if req.nx {
        state
            .cache
            .set_nx(&key, &req.value, req.expire, version.as_ref())
            .await?
    } else {
        state
            .cache
            .set(&key, &req.value, req.expire, version.as_ref())
            .await?
    };

    Ok(Json(SetResponse { key, written }))
}

/// Handler for `GET /cache/:key`
///
/// Answers 404 with `found: false` when the key is absent.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<VersionQuery>,
) -> CacheResult<Response> {
    let value = state.cache.get(&key, query.version().as_ref()).await?;

    let status = if value.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, Json(GetResponse::new(key, value))).into_response())
}

/// Handler for `DELETE /cache/:key`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<VersionQuery>,
) -> CacheResult<Json<DeleteResponse>> {
    let removed = state.cache.delete(&key, query.version().as_ref()).await?;
    Ok(Json(DeleteResponse { removed }))
}

/// Handler for `POST /batch/set`
pub async fn set_many_handler(
    State(state): State<AppState>,
    Json(req): Json<SetManyRequest>,
) -> CacheResult<Json<SetManyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let written = state
        .cache
        .set_many(&req.items, req.expire, req.version.as_ref())
        .await?;

    Ok(Json(SetManyResponse {
        written,
        count: req.items.len(),
    }))
}

/// Handler for `POST /batch/get`
pub async fn get_many_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> CacheResult<Json<GetManyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let values = state.cache.get_many(&req.keys, req.version.as_ref()).await?;
    let entries = req
        .keys
        .into_iter()
        .zip(values)
        .map(|(key, value)| GetResponse::new(key, value))
        .collect();

    Ok(Json(GetManyResponse { entries }))
}

/// Handler for `POST /batch/delete`
pub async fn delete_many_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> CacheResult<Json<DeleteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let removed = state
        .cache
        .delete_many(&req.keys, req.version.as_ref())
        .await?;
    Ok(Json(DeleteResponse { removed }))
}

/// Handler for `POST /pattern/delete`
pub async fn delete_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<PatternRequest>,
) -> CacheResult<Json<DeleteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let removed = state
        .cache
        .delete_pattern(&req.pattern, req.version.as_ref())
        .await?;
    Ok(Json(DeleteResponse { removed }))
}

/// Handler for `GET /stats`
pub async fn stats_handler(State(state): State<AppState>) -> CacheResult<Json<StatsResponse>> {
    let repository = state.memory.as_ref().ok_or_else(|| {
        CacheError::Unsupported(format!(
            "statistics are not tracked by the {} backend",
            state.cache.repository().backend_name()
        ))
    })?;

    Ok(Json(repository.stats().await.into()))
}

/// Handler for `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.cache.repository().backend_name(),
    ))
}

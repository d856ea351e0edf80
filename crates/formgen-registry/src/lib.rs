//! Registry service for published form code.
//!
//! Stores generated output as schema-tagged JSON documents so a form can
//! be shared by id. Documents live in memory with a 24-hour expiry; this
//! is a low-stakes sharing feature, so there is no durability and errors
//! surface verbatim in the response envelope instead of being retried.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

const ITEM_SCHEMA: &str = "https://ui.shadcn.com/schema/registry-item.json";
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no registry item named \"{0}\"")]
    NotFound(String),

    #[error("registry store is unavailable")]
    StorePoisoned,
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match self {
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::StorePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiResponse::<serde_json::Value> {
            data: None,
            error: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// The fire-and-forget response envelope: exactly one of `data` and
/// `error` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

/// One generated file in a publish request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    pub path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Body of a publish request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub registry_dependencies: Vec<String>,
    pub files: Vec<RegistryFile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishedId {
    pub id: String,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    inserted_at: Instant,
    document: serde_json::Value,
}

/// In-memory document store with per-document expiry. Expired documents
/// are purged lazily, on publish and on lookup.
#[derive(Clone)]
pub struct RegistryStore {
    inner: Arc<RwLock<HashMap<String, StoredDocument>>>,
    ttl: Duration,
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores a document and returns its generated id.
    pub fn insert(&self, name: &str, document: serde_json::Value) -> Result<String, RegistryError> {
        let id = format!("{}-{}", name, Uuid::new_v4());
        let mut map = self
            .inner
            .write()
            .map_err(|_| RegistryError::StorePoisoned)?;
        map.retain(|_, doc| doc.inserted_at.elapsed() < self.ttl);
        map.insert(
            id.clone(),
            StoredDocument {
                inserted_at: Instant::now(),
                document,
            },
        );
        Ok(id)
    }

    /// Looks up a document by id, removing it first if it has expired.
    pub fn get(&self, id: &str) -> Result<serde_json::Value, RegistryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RegistryError::StorePoisoned)?;
        match map.get(id) {
            Some(doc) if doc.inserted_at.elapsed() < self.ttl => Ok(doc.document.clone()),
            Some(_) => {
                map.remove(id);
                Err(RegistryError::NotFound(id.to_string()))
            }
            None => Err(RegistryError::NotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The registry router: publish and fetch share the `/r/{id}.json` path.
pub fn router(store: RegistryStore) -> Router {
    Router::new()
        .route("/r/:id", post(publish).get(fetch))
        .with_state(store)
}

/// Ids arrive with a literal `.json` suffix from registry clients; strip
/// it before lookup.
fn strip_json_suffix(id: &str) -> &str {
    id.strip_suffix(".json").unwrap_or(id)
}

async fn publish(
    State(store): State<RegistryStore>,
    Path(name): Path<String>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<ApiResponse<PublishedId>>, RegistryError> {
    let name = strip_json_suffix(&name);

    let document = serde_json::json!({
        "$schema": ITEM_SCHEMA,
        "name": request.name,
        "type": "registry:block",
        "dependencies": request.dependencies,
        "registryDependencies": request.registry_dependencies,
        "files": request.files,
    });

    let id = store.insert(name, document)?;
    info!(%id, "published registry item");

    Ok(Json(ApiResponse {
        data: Some(PublishedId { id }),
        error: None,
    }))
}

async fn fetch(
    State(store): State<RegistryStore>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, RegistryError> {
    let document = store.get(strip_json_suffix(&id))?;
    Ok(Json(document))
}

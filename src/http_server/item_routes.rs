//! Item HTTP Routes
//!
//! CRUD endpoints over dictionary entries. Handlers only parse the path and
//! body; validation and canonicalization happen in the gateway.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use regex::Regex;
use serde_json::{Map, Value};

use crate::dictionary::DictionaryEntry;
use crate::gateway::{DictionaryStore, GatewayResult};

use super::errors::{ItemError, ItemResult};

// ==================
// Item Routes
// ==================

/// Create item routes
pub fn item_routes<S: DictionaryStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route(
            "/item",
            get(list_items_handler::<S>)
                .post(create_items_handler::<S>)
                .patch(missing_id_handler)
                .delete(missing_id_handler),
        )
        .route(
            "/item/:id",
            get(get_item_handler::<S>)
                .patch(update_item_handler::<S>)
                .delete(delete_item_handler::<S>),
        )
        .with_state(store)
}

// ==================
// Helper Functions
// ==================

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]*$").expect("id pattern is valid"))
}

/// Integer-looking path segment to a JSON integer
fn parse_path_id(raw: &str) -> ItemResult<Value> {
    if !id_pattern().is_match(raw) {
        return Err(ItemError::InvalidPath(raw.to_string()));
    }

    raw.parse::<i64>()
        .map(Value::from)
        .map_err(|_| ItemError::InvalidPath(raw.to_string()))
}

fn parse_body(body: Result<Json<Value>, JsonRejection>) -> ItemResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|e| ItemError::InvalidBody(e.body_text()))
}

/// Run a store call on the blocking pool
async fn run_store<S, F>(store: &Arc<S>, op: F) -> ItemResult<Vec<DictionaryEntry>>
where
    S: DictionaryStore + 'static,
    F: FnOnce(&S) -> GatewayResult<Vec<DictionaryEntry>> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| ItemError::Internal(e.to_string()))?
        .map_err(ItemError::from)
}

fn render<S: DictionaryStore>(store: &S, rows: &[DictionaryEntry]) -> Vec<Value> {
    rows.iter().map(|e| e.to_json(store.config())).collect()
}

/// First row of a point operation, or 404
fn single<S: DictionaryStore>(store: &S, rows: Vec<DictionaryEntry>) -> ItemResult<Json<Value>> {
    rows.first()
        .map(|e| Json(e.to_json(store.config())))
        .ok_or(ItemError::NotFound)
}

// ==================
// Handlers
// ==================

/// `GET /item?ja=…&en=…`; an empty parameter value filters for blanks
async fn list_items_handler<S: DictionaryStore + 'static>(
    State(store): State<Arc<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> ItemResult<Json<Vec<Value>>> {
    let filter: Map<String, Value> = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let filter = Value::Object(filter);

    let rows = run_store(&store, move |s| s.fetch_by_filter(&filter)).await?;
    Ok(Json(render(store.as_ref(), &rows)))
}

/// `POST /item` with one object (201 + entry) or an array (201 + entries)
async fn create_items_handler<S: DictionaryStore + 'static>(
    State(store): State<Arc<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ItemResult<(StatusCode, Json<Value>)> {
    let body = parse_body(body)?;
    let batch = body.is_array();

    let rows = run_store(&store, move |s| s.insert(&body)).await?;
    if rows.is_empty() {
        return Err(ItemError::Internal("insert returned no rows".to_string()));
    }

    let data = if batch {
        Json(Value::Array(render(store.as_ref(), &rows)))
    } else {
        single(store.as_ref(), rows)?
    };
    Ok((StatusCode::CREATED, data))
}

async fn get_item_handler<S: DictionaryStore + 'static>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> ItemResult<Json<Value>> {
    let id = parse_path_id(&id)?;
    let rows = run_store(&store, move |s| s.fetch_by_id(&id)).await?;
    single(store.as_ref(), rows)
}

async fn update_item_handler<S: DictionaryStore + 'static>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ItemResult<Json<Value>> {
    let id = parse_path_id(&id)?;
    let body = parse_body(body)?;
    let rows = run_store(&store, move |s| s.update_by_id(&id, &body)).await?;
    single(store.as_ref(), rows)
}

async fn delete_item_handler<S: DictionaryStore + 'static>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> ItemResult<Json<Value>> {
    let id = parse_path_id(&id)?;
    let rows = run_store(&store, move |s| s.delete_by_id(&id)).await?;
    single(store.as_ref(), rows)
}

async fn missing_id_handler() -> ItemError {
    ItemError::MissingId
}

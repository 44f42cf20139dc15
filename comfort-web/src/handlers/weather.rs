//! Ranked city list and cache diagnostics.

use axum::{Json, extract::State};
use comfort_core::ScoredCity;
use serde_json::{Value, json};

use crate::state::SharedState;

pub async fn list_cities(State(state): State<SharedState>) -> Json<Vec<ScoredCity>> {
    let batch = state.comfort.ranked_cities().await;
    Json(batch.to_vec())
}

pub async fn cache_status(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "status": state.comfort.last_cache_status() }))
}

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

pub async fn status() -> Json<Value> {
    Json(json!({ "status": "API is running!", "timestamp": Utc::now() }))
}

use axum::{http::StatusCode, Json};
use serde_json::{json, Value as JsonValue};

pub async fn health() -> (StatusCode, Json<JsonValue>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

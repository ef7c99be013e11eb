pub mod authn;
pub mod health;
pub mod rest;
pub mod root;

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value as JsonValue;

pub const HAL_JSON: &str = "application/hal+json";

/// A `200 OK` HAL document.
pub fn hal_json(body: JsonValue) -> Response {
    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
    response
}

//! HTTP surface
//!
//! Every read endpoint goes through the repository registry; the handlers
//! never touch services or the store directly.

pub mod handlers;
pub mod middleware;
pub mod params;

use axum::{
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth::auth_middleware, config::ServerConfig, state::AppState};
use handlers::{authn, health, rest, root};
use middleware::{
    metrics::{metrics_handler, metrics_middleware},
    security::security_headers_middleware,
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api", get(root::api_root))
        .route("/api/authn/status", get(authn::status))
        .route("/api/:category/:model", get(rest::find_all))
        .route("/api/:category/:model/:id", get(rest::find_one))
        .route("/api/:category/:model/:id/:relation", get(rest::find_link))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let mut router = Router::new()
        .merge(api)
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.server) {
        router = router.layer(cors);
    }

    router.with_state(state)
}

/// CORS is only enabled for explicitly configured origins.
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
            .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::ACCEPT])
            .allow_credentials(true),
    )
}

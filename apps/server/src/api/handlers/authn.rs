use axum::{extract::State, response::Response};
use serde_json::json;

use super::hal_json;
use crate::{context::Context, state::AppState};

/// `GET /api/authn/status`
pub async fn status(State(state): State<AppState>, ctx: Context) -> Response {
    let converter = state.registry.converter();
    let mut links = serde_json::Map::new();
    links.insert(
        "self".to_string(),
        json!({ "href": format!("{}/authn/status", converter.api_url()) }),
    );
    if let Some(eperson) = ctx.current_user() {
        links.insert(
            "eperson".to_string(),
            json!({ "href": converter.entity_href("eperson", "epersons", &eperson.to_string()) }),
        );
    }

    hal_json(json!({
        "okay": true,
        "authenticated": ctx.is_authenticated(),
        "type": "status",
        "_links": links,
    }))
}

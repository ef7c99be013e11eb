use axum::{extract::State, response::Response};
use serde_json::{json, Map};

use super::hal_json;
use crate::state::AppState;

/// `GET /api`: every registered entity endpoint.
pub async fn api_root(State(state): State<AppState>) -> Response {
    let converter = state.registry.converter();

    let mut links = Map::new();
    for (category, model) in state.registry.endpoints() {
        links.insert(
            model.to_string(),
            json!({ "href": converter.collection_href(category, model) }),
        );
    }
    links.insert("self".to_string(), json!({ "href": converter.api_url() }));

    hal_json(json!({
        "dspaceServer": state.config.rest.base_url,
        "dspaceVersion": concat!("dspace-rest ", env!("CARGO_PKG_VERSION")),
        "type": "root",
        "_links": links,
    }))
}

//! Generic read endpoints over the repository registry.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::hal_json;
use crate::{api::params::parse_read_params, context::Context, state::AppState, Error, Result};

/// `GET /api/{category}/{model}`
pub async fn find_all(
    State(state): State<AppState>,
    ctx: Context,
    Path((category, model)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let params = parse_read_params(query.as_deref(), &state.config.rest)?;
    let repository = state.registry.entity(&category, &model)?;

    tracing::debug!(
        request_id = %ctx.request_id(),
        category,
        model,
        page = params.pageable.page,
        size = params.pageable.size,
        "find_all"
    );

    let page = repository.find_all(&ctx, params.pageable).await?;
    let href = state.converter.collection_href(&category, &model);
    let body = state
        .registry
        .render_page(&ctx, page, &params.projection, repository.model(), &href)
        .await?;
    Ok(hal_json(body))
}

/// `GET /api/{category}/{model}/{id}`
pub async fn find_one(
    State(state): State<AppState>,
    ctx: Context,
    Path((category, model, id)): Path<(String, String, String)>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let params = parse_read_params(query.as_deref(), &state.config.rest)?;
    let repository = state.registry.entity(&category, &model)?;

    tracing::debug!(request_id = %ctx.request_id(), category, model, id, "find_one");

    let Some(resource) = repository.find_one(&ctx, &id).await? else {
        return Err(Error::NotFound(format!(
            "No such {} with id {id}",
            repository.model()
        )));
    };
    let body = state
        .registry
        .render(&ctx, resource, &params.projection)
        .await?;
    Ok(hal_json(body))
}

/// `GET /api/{category}/{model}/{id}/{relation}`
pub async fn find_link(
    State(state): State<AppState>,
    ctx: Context,
    Path((category, model, id, relation)): Path<(String, String, String, String)>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let params = parse_read_params(query.as_deref(), &state.config.rest)?;
    let link = state.registry.link(&category, &model, &relation)?;

    tracing::debug!(
        request_id = %ctx.request_id(),
        category,
        model,
        id,
        relation,
        "find_link"
    );

    let target = link.resolve(&ctx, &id, params.pageable).await?;
    let href = format!(
        "{}/{}",
        state.converter.entity_href(&category, &model, &id),
        link.relation()
    );
    let body = state
        .registry
        .render_link(&ctx, target, &params.projection, link.relation(), &href)
        .await?;

    Ok(match body {
        Some(body) => hal_json(body),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

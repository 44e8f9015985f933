use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, info};

use confide_filter::{ValidationError, validate_message};
use confide_types::api::{CreateConfessionRequest, CreateConfessionResponse, ListConfessionsResponse};
use confide_types::events::FeedEvent;

use crate::error::AppError;
use crate::resolver::DEFAULT_LIST_LIMIT;
use crate::state::AppState;

pub const MAX_LIST_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

/// GET /api/confessions: newest first.
pub async fn list_confessions(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListConfessionsResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        debug!("Rejected list query: {}", e);
        AppError::Malformed("Invalid limit")
    })?;
    let limit = query.limit.min(MAX_LIST_LIMIT);
    let items = state.backend.list(limit).await?;
    Ok(Json(ListConfessionsResponse { items }))
}

/// POST /api/confessions: screen, store, and announce on the live feed.
pub async fn create_confession(
    State(state): State<AppState>,
    payload: Result<Json<CreateConfessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload.map_err(|e| {
        debug!("Rejected confession body: {}", e);
        ValidationError::Required
    })?;

    let raw = req.message.ok_or(ValidationError::Required)?;
    let message = validate_message(&raw)?;

    if let Some(term) = state.filter.check(message) {
        info!("Route filter matched '{}'", term);
        return Err(AppError::Profanity);
    }

    let confession = state.backend.create(message).await?;
    state.dispatcher.broadcast(FeedEvent::from(&confession));

    Ok((
        StatusCode::CREATED,
        Json(CreateConfessionResponse {
            success: true,
            confession,
        }),
    ))
}

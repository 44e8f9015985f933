use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Check `x-api-key` against the configured resolver key.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state.resolver_key.as_deref().ok_or(AppError::Unauthorized)?;

    let provided = req
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    // Compare digests so the comparison does not short-circuit on the raw key
    if Sha256::digest(provided.as_bytes()) != Sha256::digest(expected.as_bytes()) {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}

//! Handler for short link redirects.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::metrics::names;
use crate::state::AppState;

/// Redirects a short link to its destination.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// # Responses
///
/// - **302 Found** with `Location` set to the destination
/// - **404 Not Found** for malformed tokens and tokens without an active link
///
/// A segment the router cannot decode (e.g. `%FF`, not UTF-8) is malformed
/// too and gets the same 404.
///
/// Redirect responses carry `Cache-Control: no-store` so that browsers come
/// back through the service and every visit is counted.
pub async fn redirect_handler(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Ok(Path(short_url)) = path else {
        debug!("Rejected undecodable token");
        metrics::counter!(names::REDIRECT_NOT_FOUND_TOTAL).increment(1);
        return Err(AppError::not_found("Short link not found", json!({})));
    };

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let destination = state
        .redirect_service
        .resolve(&short_url, user_agent)
        .await?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, destination),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
    )
        .into_response())
}

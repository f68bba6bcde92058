//! Handler for revoking links.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::AppError;
use crate::state::AppState;

/// Permanently revokes a link.
///
/// # Endpoint
///
/// `DELETE /l/{short_code}`
///
/// # Responses
///
/// - **204 No Content** on success, including repeat revocations
/// - **404 Not Found** for an unknown code
pub async fn revoke_link_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.revoke_service.revoke(&short_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

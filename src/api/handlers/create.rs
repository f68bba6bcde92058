//! Handler for creating redirect links.

use axum::{extract::State, http::StatusCode, response::Json};
use validator::Validate;

use crate::api::dto::create_link::{CreateLinkRequest, CreateLinkResponse};
use crate::application::services::LinkOptions;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a secure link that redirects to a URL.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Responses
///
/// - **201 Created** with the issued code and access URL
/// - **400 Bad Request** on validation failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    request.validate()?;

    let created = state
        .create_service
        .create_redirect(
            &request.target_url,
            LinkOptions {
                expires_at: request.expires_at,
                max_views: request.max_views,
                password: request.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

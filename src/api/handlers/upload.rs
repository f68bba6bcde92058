//! Handler for creating file download links via multipart upload.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::api::dto::create_link::CreateLinkResponse;
use crate::application::services::LinkOptions;
use crate::error::AppError;
use crate::state::AppState;

/// Parsed multipart form for an upload request.
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    expires_at: Option<DateTime<Utc>>,
    max_views: Option<i32>,
    password: Option<String>,
}

/// Stores an uploaded file and issues a download link for it.
///
/// # Endpoint
///
/// `POST /api/links/upload`
///
/// # Form Fields
///
/// - `file` - the payload (required)
/// - `expires_at` - RFC 3339 timestamp (optional)
/// - `max_views` - positive integer (optional)
/// - `password` - plaintext password (optional)
///
/// # Responses
///
/// - **201 Created** with the issued code and access URL
/// - **400 Bad Request** on a missing file or malformed field
pub async fn upload_link_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    let form = parse_form(multipart).await?;

    let Some((filename, content)) = form.file else {
        return Err(AppError::bad_request(
            "Missing 'file' field in upload",
            json!({}),
        ));
    };

    let created = state
        .create_service
        .create_upload(
            &filename,
            content,
            LinkOptions {
                expires_at: form.expires_at,
                max_views: form.max_views,
                password: form.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn parse_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("Malformed multipart body", json!({ "reason": e.to_string() })))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|f| !f.is_empty())
                    .ok_or_else(|| {
                        AppError::bad_request("Uploaded file must have a filename", json!({}))
                    })?;
                let content = field.bytes().await.map_err(|e| {
                    AppError::bad_request(
                        "Failed to read uploaded file",
                        json!({ "reason": e.to_string() }),
                    )
                })?;
                form.file = Some((filename, content.to_vec()));
            }
            "expires_at" => {
                let raw = text_field(field, "expires_at").await?;
                let parsed = DateTime::parse_from_rfc3339(&raw).map_err(|_| {
                    AppError::bad_request(
                        "expires_at must be an RFC 3339 timestamp",
                        json!({ "expires_at": raw }),
                    )
                })?;
                form.expires_at = Some(parsed.with_timezone(&Utc));
            }
            "max_views" => {
                let raw = text_field(field, "max_views").await?;
                let parsed = raw.parse::<i32>().map_err(|_| {
                    AppError::bad_request(
                        "max_views must be an integer",
                        json!({ "max_views": raw }),
                    )
                })?;
                form.max_views = Some(parsed);
            }
            "password" => {
                form.password = Some(text_field(field, "password").await?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field.text().await.map_err(|e| {
        AppError::bad_request(
            format!("Failed to read '{}' field", name),
            json!({ "reason": e.to_string() }),
        )
    })
}

//! Handler for secure link resolution.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Redirect, Response},
};
use std::net::SocketAddr;

use crate::api::dto::resolve::ResolveResponse;
use crate::application::services::Resolution;
use crate::domain::entities::AccessContext;
use crate::error::AppError;
use crate::state::AppState;

const PASSWORD_HEADER: &str = "x-link-password";

/// Resolves a short code to its redirect or file download.
///
/// # Endpoint
///
/// `GET /l/{short_code}`
///
/// # Request
///
/// - `X-Link-Password` - plaintext password for protected links
/// - `Accept: application/json` - return a JSON target descriptor instead
///   of an HTTP redirect (redirect links only)
///
/// # Responses
///
/// - **307** redirect to the target URL
/// - **200** JSON descriptor, or file content as an attachment
/// - **401** password required or wrong
/// - **404** unknown code or missing backing file
/// - **410** revoked, expired, or view limit reached
pub async fn resolve_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let password = headers
        .get(PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let context = client_context(&headers, addr, state.behind_proxy);

    let resolution = state
        .resolve_service
        .resolve(&short_code, password.as_deref(), &context)
        .await?;

    match resolution {
        Resolution::Redirect { url } => {
            if wants_json(&headers) {
                Ok(Json(ResolveResponse {
                    short_code,
                    target_url: url,
                })
                .into_response())
            } else {
                Ok(Redirect::temporary(&url).into_response())
            }
        }
        Resolution::Download { content, filename } => Ok((
            [
                (
                    header::CONTENT_TYPE,
                    "application/octet-stream".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", sanitize_filename(&filename)),
                ),
            ],
            content,
        )
            .into_response()),
    }
}

/// Builds the audit context from the request.
///
/// Forwarding headers are only trusted when the service is configured as
/// running behind a reverse proxy; otherwise the peer address wins.
fn client_context(headers: &HeaderMap, addr: SocketAddr, behind_proxy: bool) -> AccessContext {
    let forwarded_ip = behind_proxy
        .then(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .or_else(|| {
                    headers
                        .get("x-real-ip")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string)
                })
        })
        .flatten();

    AccessContext {
        ip_address: Some(forwarded_ip.unwrap_or_else(|| addr.ip().to_string())),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Keeps the Content-Disposition header well-formed for arbitrary upload
/// names.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}

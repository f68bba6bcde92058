//! DTO for JSON-negotiated link resolution.

use serde::Serialize;

/// Returned instead of an HTTP redirect when the client asks for JSON.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub short_code: String,
    pub target_url: String,
}

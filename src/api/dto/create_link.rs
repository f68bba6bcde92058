//! DTOs for link creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CreatedLink;

/// Request body for creating a redirect link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL the short code will redirect to.
    #[validate(url(message = "target_url must be a valid URL"))]
    pub target_url: String,

    /// Absolute expiry timestamp. Defaults to the configured TTL when omitted.
    pub expires_at: Option<DateTime<Utc>>,

    /// Maximum number of successful resolutions before the link expires.
    #[validate(range(min = 1, message = "max_views must be at least 1"))]
    pub max_views: Option<i32>,

    /// Plaintext password required at resolution. Blank means unprotected.
    #[validate(length(max = 128, message = "password must be at most 128 characters"))]
    pub password: Option<String>,
}

/// Response body for a freshly issued link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_code: String,
    pub access_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i32>,
}

impl From<CreatedLink> for CreateLinkResponse {
    fn from(created: CreatedLink) -> Self {
        Self {
            short_code: created.short_code,
            access_url: created.access_url,
            expires_at: created.expires_at,
            max_views: created.max_views,
        }
    }
}

//! Short code generation.
//!
//! Produces the compact public identifier that appears in access URLs.

use base64::Engine as _;

/// Length of random bytes before base64 encoding. Six bytes encode to a
/// fixed 8-character URL-safe code.
const CODE_LENGTH_BYTES: usize = 6;

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character code.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Formats the public access URL for a short code.
pub fn access_url(base_url: &str, short_code: &str) -> String {
    format!("{}/l/{}", base_url.trim_end_matches('/'), short_code)
}

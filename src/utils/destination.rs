//! Validation of destination URLs accepted by the admin tooling.

use url::Url;

/// Reasons a destination URL is refused.
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS destinations are allowed")]
    UnsupportedProtocol,

    #[error("Destination URL must include a host")]
    MissingHost,
}

/// Parses and canonicalizes a destination URL.
///
/// Only `http` and `https` are accepted, which keeps `javascript:`, `data:`
/// and `file:` targets out of redirects. The returned string is the parsed
/// URL's serialization: scheme and host lowercased, default port dropped,
/// path, query and fragment kept.
///
/// # Errors
///
/// See [`DestinationError`].
pub fn validate_destination(input: &str) -> Result<String, DestinationError> {
    let url = Url::parse(input.trim())
        .map_err(|e| DestinationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(DestinationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(DestinationError::MissingHost);
    }

    Ok(url.to_string())
}

//! Short link token rules: shape check, normalization and generation.
//!
//! Tokens are case-insensitive. Everything is stored and looked up in
//! lowercase, so `Aaa` and `aaa` name the same link.

use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("token pattern is valid"));

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of tokens produced by [`generate_token`] when none is requested.
pub const DEFAULT_TOKEN_LENGTH: usize = 7;

/// Longest token accepted from operators.
pub const MAX_TOKEN_LENGTH: usize = 64;

/// Tokens that would shadow fixed routes.
const RESERVED_TOKENS: &[&str] = &["health", "metrics"];

/// Returns the lowercase form of `raw`, or `None` if it is empty or contains
/// anything outside `[a-zA-Z0-9-]`.
pub fn normalize_token(raw: &str) -> Option<String> {
    if raw.is_empty() || !TOKEN_PATTERN.is_match(raw) {
        return None;
    }
    Some(raw.to_ascii_lowercase())
}

/// Generates a random lowercase alphanumeric token.
pub fn generate_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Validates an operator-supplied token before it is stored.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the token is malformed, too long or
/// reserved.
pub fn validate_custom_token(token: &str) -> Result<String, AppError> {
    let Some(normalized) = normalize_token(token) else {
        return Err(AppError::bad_request(
            "Token may only contain letters, digits and hyphens",
            json!({ "token": token }),
        ));
    };

    if normalized.len() > MAX_TOKEN_LENGTH {
        return Err(AppError::bad_request(
            format!("Token must be at most {MAX_TOKEN_LENGTH} characters"),
            json!({ "provided_length": normalized.len() }),
        ));
    }

    if RESERVED_TOKENS.contains(&normalized.as_str()) {
        return Err(AppError::bad_request(
            "This token is reserved",
            json!({ "token": normalized }),
        ));
    }

    Ok(normalized)
}

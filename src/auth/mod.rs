//! Admin authentication: configured credentials and bearer tokens.
//!
//! String comparisons against secrets are constant-time to mitigate timing attacks.

mod credentials;
mod token;

pub use credentials::*;
pub use token::*;

use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

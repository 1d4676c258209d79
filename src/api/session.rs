//! Admin login and token verification endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::{bearer_token, Claims, Identity};
use crate::errors::AppError;
use crate::AppState;

/// Request body for POST /api/auth.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub email: String,
    pub expires_in: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: Claims,
}

/// POST /api/auth - Exchange admin credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<LoginResponse> {
    let body = body.map_err(AppError::from)?;
    let request: LoginRequest = serde_json::from_slice(&body).map_err(AppError::from)?;

    tracing::info!(email = %request.email, "Login attempt");

    let Some(index) = state
        .credentials
        .authenticate(&request.email, &request.password)?
    else {
        tracing::warn!(email = %request.email, "Login rejected");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()).into());
    };

    let email = state
        .credentials
        .email(index)
        .map(str::to_string)
        .ok_or_else(|| AppError::Internal(format!("No admin email at index {}", index)))?;
    let identity = Identity {
        email: email.clone(),
        user_index: index,
    };

    let token = state
        .tokens
        .issue(&identity)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(email = %email, "Admin signed in");

    success(LoginResponse {
        success: true,
        token,
        email,
        expires_in: state.tokens.expires_in_label(),
    })
}

/// GET /api/verify - Check a bearer token and echo its claims.
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<VerifyResponse> {
    let token = bearer_token(&headers)?;
    let user = state.tokens.verify(token).map_err(AppError::from)?;

    success(VerifyResponse { valid: true, user })
}

//! REST API module.
//!
//! Contains all routes and handlers following the front-end contract.

mod blog;
mod cors;
mod projects;
mod session;

pub use blog::*;
pub use cors::*;
pub use projects::*;
pub use session::*;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, ErrorReply};

/// Success response: a status code and a JSON body.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        Self { status, data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, ErrorReply>;

/// Create a 200 response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(StatusCode::OK, data))
}

/// Create a 201 response.
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(StatusCode::CREATED, data))
}

/// Parse a request body as JSON. An empty body reads as an empty object.
pub fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<Value, AppError> {
    let body = body?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Parse the `:id` path segment.
pub fn parse_id(raw: Result<Path<String>, PathRejection>, entity: &str) -> Result<i64, AppError> {
    let Path(raw) = raw?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} id must be a number", entity)))
}

/// Fallback for paths no resource claims.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Fallback for a known resource hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// ANY /api/cars - Retired endpoint.
pub async fn retired_cars() -> AppError {
    AppError::Gone {
        message: "This endpoint has been retired.".to_string(),
        details: "Use /api/projects for Redemption Renovations project management.".to_string(),
    }
}

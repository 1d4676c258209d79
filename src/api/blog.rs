//! Blog API endpoints.
//!
//! Reads are public but only show published posts unless the caller presents
//! a valid admin token. Writes always require one.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
};
use serde::Serialize;

use super::{created, parse_body, parse_id, success, ApiResult};
use crate::errors::AppError;
use crate::models::{BlogPost, BlogPostInput};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BlogPostDeleted {
    pub success: bool,
    pub deleted: BlogPost,
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

/// GET /api/blog - List posts; drafts only for admins.
pub async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<BlogPost>> {
    let Ok(repo) = state.repo() else {
        return success(Vec::new());
    };

    match state.viewer(&headers) {
        Some(_) => success(
            repo.list_blog_posts(true)
                .await
                .map_err(|e| state.admin_error(e))?,
        ),
        None => success(repo.list_blog_posts(false).await?),
    }
}

/// GET /api/blog/:id - Get a single post; drafts are hidden from the public.
pub async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<BlogPost> {
    let repo = state.repo()?;
    let id = parse_id(id, "Post")?;
    let is_admin = state.viewer(&headers).is_some();

    match repo.get_blog_post(id).await? {
        Some(post) if post.published || is_admin => success(post),
        _ => Err(post_not_found().into()),
    }
}

/// POST /api/blog - Create a new post.
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<BlogPost> {
    let repo = state.repo()?;
    let admin = state.authorize(&headers)?;
    let input = BlogPostInput::from_json(&parse_body(body)?)?;

    let post = repo
        .create_blog_post(&input)
        .await
        .map_err(|e| state.admin_error(e))?;

    tracing::info!(post_id = post.id, published = post.published, admin = %admin.email, "Created blog post");
    created(post)
}

/// PUT /api/blog/:id - Replace a post.
pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<BlogPost> {
    let repo = state.repo()?;
    let admin = state.authorize(&headers)?;
    let id = parse_id(id, "Post")?;
    let input = BlogPostInput::from_json(&parse_body(body)?)?;

    let post = repo
        .update_blog_post(id, &input)
        .await
        .map_err(|e| state.admin_error(e))?
        .ok_or_else(post_not_found)?;

    tracing::info!(post_id = id, published = post.published, admin = %admin.email, "Updated blog post");
    success(post)
}

/// DELETE /api/blog/:id - Delete a post.
pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<BlogPostDeleted> {
    let repo = state.repo()?;
    let admin = state.authorize(&headers)?;
    let id = parse_id(id, "Post")?;

    let deleted = repo
        .delete_blog_post(id)
        .await
        .map_err(|e| state.admin_error(e))?
        .ok_or_else(post_not_found)?;

    tracing::info!(post_id = id, admin = %admin.email, "Deleted blog post");
    success(BlogPostDeleted {
        success: true,
        deleted,
    })
}

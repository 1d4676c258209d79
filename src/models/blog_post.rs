//! Blog post model. Field names stay snake_case; the blog pages read them that way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Payload;
use crate::errors::AppError;

/// Author used when a post does not name one.
pub const DEFAULT_AUTHOR: &str = "Redemption Renovations";

/// A blog post, draft or published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: String,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub published: bool,
    /// Set on the first publish and never touched again.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or fully replacing a post.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: String,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub published: bool,
}

impl BlogPostInput {
    /// Validate a request body.
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let mut payload = Payload::new(body);

        let title = payload.required_text("title", "Title");
        let content = payload.required_text("content", "Content");
        let excerpt = payload.optional_text("excerpt", "Excerpt");
        let author = payload
            .optional_text("author", "Author")
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let featured_image = payload.optional_text("featured_image", "Featured image");
        let images = payload.string_list("images", "Images").unwrap_or_default();
        let tags = payload.string_list("tags", "Tags").unwrap_or_default();
        let published = payload.flag("published", "Published").unwrap_or(false);

        payload.finish(Self {
            title,
            content,
            excerpt,
            author,
            featured_image,
            images,
            tags,
            published,
        })
    }
}

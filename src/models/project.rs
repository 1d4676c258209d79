//! Project model matching the gallery and admin panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Payload;
use crate::errors::AppError;

/// A completed (or showcased) renovation project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub completed_date: Option<String>,
    pub description: Option<String>,
    /// First entry is the cover image.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Validated fields for creating or fully replacing a project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub title: String,
    pub project_type: String,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub completed_date: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
}

impl ProjectInput {
    /// Validate a request body.
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let mut payload = Payload::new(body);

        let title = payload.required_text("title", "Title");
        let project_type = payload.required_text("type", "Type");
        let location = payload.optional_text("location", "Location");
        let completed_date = payload.optional_text("completedDate", "Completed date");
        let description = payload.optional_text("description", "Description");

        let images = payload.string_list("images", "Images");
        match &images {
            Some(list) if list.is_empty() => payload.issue("At least one image is required"),
            None if body.get("images").map_or(true, Value::is_null) => {
                payload.issue("At least one image is required")
            }
            _ => {}
        }

        // Older clients send no tags; the primary type stands in.
        let tags = payload
            .string_list("tags", "Tags")
            .unwrap_or_else(|| vec![project_type.clone()]);

        payload.finish(Self {
            title,
            project_type,
            tags,
            location,
            completed_date,
            description,
            images: images.unwrap_or_default(),
        })
    }
}

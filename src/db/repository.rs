//! Database repository for CRUD operations.
//!
//! Every statement is scoped to the repository's client id and runs as a
//! single atomic statement; nothing spans tables.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{BlogPost, BlogPostInput, Project, ProjectInput};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    client_id: i64,
}

impl Repository {
    pub fn new(pool: SqlitePool, client_id: i64) -> Self {
        Self { pool, client_id }
    }

    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects, newest first. Projects have no visibility flag, so
    /// public and admin callers see the same list.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, type, tags, location, completed_date, description, images, created_at, updated_at FROM projects WHERE client_id = ? ORDER BY created_at DESC, id DESC"
        )
        .bind(self.client_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(project_from_row).collect()
    }

    /// Number of projects stored for this client.
    pub async fn count_projects(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE client_id = ?")
            .bind(self.client_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: i64) -> Result<Option<Project>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, type, tags, location, completed_date, description, images, created_at, updated_at FROM projects WHERE id = ? AND client_id = ?"
        )
        .bind(id)
        .bind(self.client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(project_from_row).transpose()
    }

    /// Create a new project.
    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, AppError> {
        let now = timestamp_now();

        let row = sqlx::query(
            "INSERT INTO projects (client_id, title, type, tags, location, completed_date, description, images, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, title, type, tags, location, completed_date, description, images, created_at, updated_at"
        )
        .bind(self.client_id)
        .bind(&input.title)
        .bind(&input.project_type)
        .bind(to_json_array(&input.tags))
        .bind(&input.location)
        .bind(&input.completed_date)
        .bind(&input.description)
        .bind(to_json_array(&input.images))
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        project_from_row(&row)
    }

    /// Replace every mutable field of a project. `None` when the id is unknown.
    pub async fn update_project(
        &self,
        id: i64,
        input: &ProjectInput,
    ) -> Result<Option<Project>, AppError> {
        let now = timestamp_now();

        let row = sqlx::query(
            "UPDATE projects SET title = ?, type = ?, tags = ?, location = ?, completed_date = ?, description = ?, images = ?, updated_at = ? WHERE id = ? AND client_id = ? RETURNING id, title, type, tags, location, completed_date, description, images, created_at, updated_at"
        )
        .bind(&input.title)
        .bind(&input.project_type)
        .bind(to_json_array(&input.tags))
        .bind(&input.location)
        .bind(&input.completed_date)
        .bind(&input.description)
        .bind(to_json_array(&input.images))
        .bind(&now)
        .bind(id)
        .bind(self.client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(project_from_row).transpose()
    }

    /// Delete a project. `false` when the id is unknown.
    pub async fn delete_project(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ? AND client_id = ?")
            .bind(id)
            .bind(self.client_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== BLOG OPERATIONS ====================

    /// List posts. Admins see everything newest first; the public sees
    /// published posts only, most recently published first.
    pub async fn list_blog_posts(&self, authenticated: bool) -> Result<Vec<BlogPost>, AppError> {
        let sql = if authenticated {
            "SELECT id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at FROM blog_posts WHERE client_id = ? ORDER BY created_at DESC, id DESC"
        } else {
            "SELECT id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at FROM blog_posts WHERE client_id = ? AND published = 1 ORDER BY published_at DESC, id DESC"
        };

        let rows = sqlx::query(sql)
            .bind(self.client_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(blog_post_from_row).collect()
    }

    /// Number of posts stored for this client, drafts included.
    pub async fn count_blog_posts(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts WHERE client_id = ?")
            .bind(self.client_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Get a post by ID, published or not.
    pub async fn get_blog_post(&self, id: i64) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at FROM blog_posts WHERE id = ? AND client_id = ?"
        )
        .bind(id)
        .bind(self.client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(blog_post_from_row).transpose()
    }

    /// Create a new post; publishing on creation stamps `published_at`.
    pub async fn create_blog_post(&self, input: &BlogPostInput) -> Result<BlogPost, AppError> {
        let now = timestamp_now();
        let published_at = input.published.then(|| now.clone());

        let row = sqlx::query(
            "INSERT INTO blog_posts (client_id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at"
        )
        .bind(self.client_id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(&input.author)
        .bind(&input.featured_image)
        .bind(to_json_array(&input.images))
        .bind(to_json_array(&input.tags))
        .bind(input.published)
        .bind(&published_at)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        blog_post_from_row(&row)
    }

    /// Replace every mutable field of a post. `published_at` is stamped the
    /// first time the post is published and kept as-is afterwards, including
    /// across unpublish/republish. `None` when the id is unknown.
    pub async fn update_blog_post(
        &self,
        id: i64,
        input: &BlogPostInput,
    ) -> Result<Option<BlogPost>, AppError> {
        let now = timestamp_now();

        let row = sqlx::query(
            "UPDATE blog_posts SET title = ?, content = ?, excerpt = ?, author = ?, featured_image = ?, images = ?, tags = ?, published = ?, published_at = CASE WHEN ? AND published_at IS NULL THEN ? ELSE published_at END, updated_at = ? WHERE id = ? AND client_id = ? RETURNING id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at"
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(&input.author)
        .bind(&input.featured_image)
        .bind(to_json_array(&input.images))
        .bind(to_json_array(&input.tags))
        .bind(input.published)
        .bind(input.published)
        .bind(&now)
        .bind(&now)
        .bind(id)
        .bind(self.client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(blog_post_from_row).transpose()
    }

    /// Delete a post, returning what was removed. `None` when the id is unknown.
    pub async fn delete_blog_post(&self, id: i64) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query(
            "DELETE FROM blog_posts WHERE id = ? AND client_id = ? RETURNING id, title, content, excerpt, author, featured_image, images, tags, published, published_at, created_at, updated_at"
        )
        .bind(id)
        .bind(self.client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(blog_post_from_row).transpose()
    }
}

// Helper functions for row conversion

fn project_from_row(row: &SqliteRow) -> Result<Project, AppError> {
    let tags: String = row.try_get("tags")?;
    let images: String = row.try_get("images")?;
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        project_type: row.try_get("type")?,
        tags: parse_json_array(&tags, "tags")?,
        location: row.try_get("location")?,
        completed_date: row.try_get("completed_date")?,
        description: row.try_get("description")?,
        images: parse_json_array(&images, "images")?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
    })
}

fn blog_post_from_row(row: &SqliteRow) -> Result<BlogPost, AppError> {
    let images: String = row.try_get("images")?;
    let tags: String = row.try_get("tags")?;
    let published_at: Option<String> = row.try_get("published_at")?;
    Ok(BlogPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        excerpt: row.try_get("excerpt")?,
        author: row.try_get("author")?,
        featured_image: row.try_get("featured_image")?,
        images: parse_json_array(&images, "images")?,
        tags: parse_json_array(&tags, "tags")?,
        published: row.try_get("published")?,
        published_at: published_at.as_deref().map(parse_timestamp).transpose()?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
    })
}

/// Fixed-width UTC timestamps so that text ordering is chronological.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::Storage(format!("Invalid stored timestamp {:?}: {}", s, e)))
}

fn to_json_array(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn parse_json_array(s: &str, column: &str) -> Result<Vec<String>, AppError> {
    serde_json::from_str(s)
        .map_err(|e| AppError::Storage(format!("Invalid stored {} {:?}: {}", column, s, e)))
}

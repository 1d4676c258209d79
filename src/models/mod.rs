//! Data models for the site backend.
//!
//! Serialized shapes match what the gallery, blog and admin scripts already consume.

mod blog_post;
mod payload;
mod project;

pub use blog_post::*;
pub use payload::*;
pub use project::*;

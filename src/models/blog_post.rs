use serde::{Deserialize, Serialize};

/// A blog/archive post. Read-only from the public API; rows are managed
/// through the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub published_at: i64,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Defaults to now when omitted.
    #[serde(default)]
    pub published_at: Option<i64>,
}

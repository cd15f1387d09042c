//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned post identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier
    pub id: PostId,

    /// Post title
    pub title: String,

    /// Slug (URL-friendly name), unique per post
    pub slug: String,

    /// Short summary, may be empty
    pub excerpt: String,

    /// Raw body. Empty when the post came from a summary query.
    pub content: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Publication date
    pub published_at: Option<DateTime<Utc>>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Whether the post is published
    pub published: bool,

    /// Words in the body, known even when `content` is empty
    #[serde(default)]
    pub word_count: usize,
}

impl Post {
    /// Create a new published post with minimal required fields
    pub fn new(id: impl Into<PostId>, title: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            slug: slug::slugify(title),
            excerpt: String::new(),
            content: String::new(),
            tags: Vec::new(),
            published_at: None,
            created_at,
            published: true,
            word_count: 0,
        }
    }

    /// Date used for ordering and display
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    /// Words in the body, falling back to the stored count for summaries
    pub fn words(&self) -> usize {
        if self.content.is_empty() {
            self.word_count
        } else {
            self.content.split_whitespace().count()
        }
    }

    /// Whether the title, excerpt or any tag contains `needle`.
    /// `needle` must already be lowercase.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

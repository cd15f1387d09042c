//! Content store boundary
//!
//! Posts live in an external store. The blog only ever reads from it,
//! through the three queries of [`ContentStore`].

mod files;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;
use thiserror::Error;

pub use files::FileStore;
pub use memory::MemoryStore;

use crate::content::PostId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed post data in {origin}: {message}")]
    Malformed { origin: String, message: String },
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A post row as the store hands it out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Words in the body, kept when a summary query drops the body
    #[serde(skip)]
    pub word_count: usize,
}

impl PostRecord {
    /// Same row without its body, as summary queries return it
    pub fn summary(&self) -> Self {
        Self {
            content: String::new(),
            word_count: self.words(),
            ..self.clone()
        }
    }

    /// Words in the body, or the count carried over from a summary
    pub fn words(&self) -> usize {
        if self.content.is_empty() {
            self.word_count
        } else {
            self.content.split_whitespace().count()
        }
    }
}

/// Read-only access to the post collection
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Published rows, newest `published_at` first, rows without one last
    async fn list_published(&self) -> Result<Vec<PostRecord>, StoreError>;

    /// The row with exactly this slug. A published row wins over a draft
    /// sharing the slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError>;

    /// Up to `limit` published rows in store order, skipping `id`
    async fn list_excluding(&self, id: &PostId, limit: usize)
        -> Result<Vec<PostRecord>, StoreError>;
}

/// Store-side listing order: `published_at` descending with absent values
/// last, then `created_at` descending.
pub(crate) fn listing_order(a: &PostRecord, b: &PostRecord) -> Ordering {
    match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Apply the three store queries to rows held in store order
pub(crate) fn published_rows(rows: &[PostRecord]) -> Vec<PostRecord> {
    let mut published: Vec<PostRecord> = rows
        .iter()
        .filter(|row| row.published)
        .map(PostRecord::summary)
        .collect();
    published.sort_by(listing_order);
    published
}

pub(crate) fn row_by_slug(rows: &[PostRecord], slug: &str) -> Option<PostRecord> {
    rows.iter()
        .find(|row| row.slug == slug && row.published)
        .or_else(|| rows.iter().find(|row| row.slug == slug))
        .cloned()
}

pub(crate) fn rows_excluding(rows: &[PostRecord], id: &PostId, limit: usize) -> Vec<PostRecord> {
    rows.iter()
        .filter(|row| row.published && &row.id != id)
        .take(limit)
        .map(PostRecord::summary)
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::TimeZone;

    pub fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
    }

    pub fn record(id: &str, slug: &str, published_day: Option<u32>, created_day: u32) -> PostRecord {
        PostRecord {
            id: PostId::new(id),
            title: format!("Post {}", id),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: format!("# Post {}\n\nBody of {}.", id, id),
            tags: Vec::new(),
            published: true,
            published_at: published_day.map(day),
            created_at: day(created_day),
            word_count: 0,
        }
    }
}

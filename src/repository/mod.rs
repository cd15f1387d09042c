//! Post repository - the only place the blog talks to the content store
//!
//! Every query is a fresh read; nothing is cached between calls. Rows come
//! back normalized into [`Post`] values, and only published rows ever leave
//! this module.

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::content::{Post, PostId};
use crate::store::{ContentStore, PostRecord, StoreError};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no published post with slug `{slug}`")]
    NotFound { slug: String },
    #[error(transparent)]
    Fetch(#[from] StoreError),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }
}

/// Read access to published posts
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn ContentStore>,
}

impl PostRepository {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// All published posts, newest first by publication date, falling back
    /// to creation date. Ties keep the store's order.
    pub async fn fetch_published_posts(&self) -> Result<Vec<Post>, RepoError> {
        let rows = self.store.list_published().await?;
        let fetched = rows.len();

        let mut posts = normalize_all(rows);
        posts.sort_by(|a, b| b.display_date().cmp(&a.display_date()));

        tracing::debug!("Fetched {} published posts ({} rows)", posts.len(), fetched);
        Ok(posts)
    }

    /// The published post with exactly this slug
    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<Post, RepoError> {
        let not_found = || RepoError::NotFound {
            slug: slug.to_string(),
        };

        let row = self.store.get_by_slug(slug).await?.ok_or_else(not_found)?;
        if !row.published || row.slug.trim() != slug {
            return Err(not_found());
        }

        normalize(row).ok_or_else(not_found)
    }

    /// Up to `limit` other published posts, in store order
    pub async fn fetch_related_candidates(
        &self,
        exclude: &PostId,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        // Normalization may drop rows, so ask for more until enough survive
        // or the store runs out
        let mut want = limit.saturating_mul(2);
        loop {
            let rows = self.store.list_excluding(exclude, want).await?;
            let exhausted = rows.len() < want;

            let mut posts = normalize_all(rows);
            posts.retain(|post| &post.id != exclude);
            if posts.len() >= limit || exhausted || want == usize::MAX {
                posts.truncate(limit);
                tracing::debug!("Fetched {} related candidates for {}", posts.len(), exclude);
                return Ok(posts);
            }
            want = want.saturating_mul(2);
        }
    }
}

/// Normalize rows, keeping the first row for each slug
fn normalize_all(rows: Vec<PostRecord>) -> Vec<Post> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| row.published)
        .filter_map(normalize)
        .filter(|post| {
            let fresh = seen.insert(post.slug.clone());
            if !fresh {
                tracing::warn!("Dropping post {} with duplicate slug `{}`", post.id, post.slug);
            }
            fresh
        })
        .collect()
}

/// Turn a store row into a post. Rows without a title or slug are dropped.
fn normalize(row: PostRecord) -> Option<Post> {
    let title = row.title.trim();
    let slug = row.slug.trim();
    if title.is_empty() || slug.is_empty() {
        tracing::warn!("Dropping post {}: missing title or slug", row.id);
        return None;
    }

    let mut tags: Vec<String> = Vec::with_capacity(row.tags.len());
    for tag in row.tags.iter().map(|t| t.trim()) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    let word_count = row.words();
    Some(Post {
        word_count,
        title: title.to_string(),
        slug: slug.to_string(),
        id: row.id,
        excerpt: row.excerpt,
        content: row.content,
        tags,
        published_at: row.published_at,
        created_at: row.created_at,
        published: row.published,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use super::*;

    /// A store whose every query fails
    pub struct BrokenStore;

    #[async_trait]
    impl ContentStore for BrokenStore {
        async fn list_published(&self) -> Result<Vec<PostRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn get_by_slug(&self, _slug: &str) -> Result<Option<PostRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn list_excluding(
            &self,
            _id: &PostId,
            _limit: usize,
        ) -> Result<Vec<PostRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }
}

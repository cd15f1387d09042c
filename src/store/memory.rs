//! In-memory content store, optionally loaded from a JSON dump

use async_trait::async_trait;
use std::path::Path;

use super::{published_rows, row_by_slug, rows_excluding, ContentStore, PostRecord, StoreError};
use crate::content::PostId;

/// Rows kept in insertion order, which is the store order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<PostRecord>,
}

impl MemoryStore {
    pub fn new(rows: Vec<PostRecord>) -> Self {
        Self { rows }
    }

    /// Parse a JSON array of rows
    pub fn from_json(json: &str, origin: &str) -> Result<Self, StoreError> {
        let rows: Vec<PostRecord> =
            serde_json::from_str(json).map_err(|e| StoreError::Malformed {
                origin: origin.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(rows))
    }

    /// Load a JSON dump of the post table
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        let store = Self::from_json(&json, &path.display().to_string())?;
        tracing::debug!("Loaded {} rows from {:?}", store.rows.len(), path);
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_published(&self) -> Result<Vec<PostRecord>, StoreError> {
        Ok(published_rows(&self.rows))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(row_by_slug(&self.rows, slug))
    }

    async fn list_excluding(
        &self,
        id: &PostId,
        limit: usize,
    ) -> Result<Vec<PostRecord>, StoreError> {
        Ok(rows_excluding(&self.rows, id, limit))
    }
}

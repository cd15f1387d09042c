//! Content store backed by a directory of markdown files

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{published_rows, row_by_slug, rows_excluding, ContentStore, PostRecord, StoreError};
use crate::content::{FrontMatter, PostId};

/// Reads `*.md` files with front-matter. Every query rescans the directory,
/// so edits show up on the next page view.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn rows(&self) -> Result<Vec<PostRecord>, StoreError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan(&root))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

#[async_trait]
impl ContentStore for FileStore {
    async fn list_published(&self) -> Result<Vec<PostRecord>, StoreError> {
        Ok(published_rows(&self.rows().await?))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(row_by_slug(&self.rows().await?, slug))
    }

    async fn list_excluding(
        &self,
        id: &PostId,
        limit: usize,
    ) -> Result<Vec<PostRecord>, StoreError> {
        Ok(rows_excluding(&self.rows().await?, id, limit))
    }
}

/// Load every post file under `root`, in file name order
fn scan(root: &Path) -> Result<Vec<PostRecord>, StoreError> {
    if !root.is_dir() {
        return Err(StoreError::Unavailable(format!(
            "content directory {:?} does not exist",
            root
        )));
    }

    let mut rows = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_markdown_file(path) {
            match load_record(root, path) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::warn!("Skipping post file {:?}: {}", path, e);
                }
            }
        }
    }

    tracing::debug!("Scanned {} post files in {:?}", rows.len(), root);
    Ok(rows)
}

fn load_record(root: &Path, path: &Path) -> Result<PostRecord, StoreError> {
    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let (fm, body) = FrontMatter::parse(&raw).map_err(|e| StoreError::Malformed {
        origin: path.display().to_string(),
        message: e.to_string(),
    })?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    // Relative path without extension, e.g. `2024/hello-world`
    let default_id = path
        .strip_prefix(root)
        .unwrap_or(path)
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/");

    let created_at = fm.parse_created_at().unwrap_or_else(|| {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now())
    });

    Ok(PostRecord {
        id: PostId::new(fm.id.clone().unwrap_or(default_id)),
        title: fm.title.clone().unwrap_or_else(|| stem.to_string()),
        slug: fm.slug.clone().unwrap_or_else(|| slug::slugify(stem)),
        excerpt: fm.excerpt.clone().unwrap_or_default(),
        content: body.to_string(),
        tags: fm.tags.clone(),
        published: fm.published,
        published_at: fm.parse_published_at(),
        created_at,
        word_count: 0,
    })
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

//! folio-blog: the blog of a personal portfolio site
//!
//! Published posts are read from a content store through a repository,
//! searched in memory, and their bodies are formatted line by line into
//! typed blocks. Single posts come with a short list of related posts.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod related;
pub mod repository;
pub mod search;
pub mod server;
pub mod store;
pub mod view;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{BlogConfig, StoreKind};
use repository::PostRepository;
use store::{ContentStore, FileStore, MemoryStore};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content store location (directory or JSON file)
    pub store_path: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            BlogConfig::load(&config_path)?
        } else {
            BlogConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: BlogConfig) -> Self {
        let store_path = base_dir.join(&config.store.path);
        Self {
            config,
            base_dir,
            store_path,
        }
    }

    /// Open the configured content store
    pub async fn open_store(&self) -> Result<Arc<dyn ContentStore>> {
        let store: Arc<dyn ContentStore> = match self.config.store.kind {
            StoreKind::Files => Arc::new(FileStore::new(&self.store_path)),
            StoreKind::Json => Arc::new(MemoryStore::load(&self.store_path).await?),
        };
        tracing::debug!(
            "Opened {:?} store at {:?}",
            self.config.store.kind,
            self.store_path
        );
        Ok(store)
    }

    /// Repository over the configured store
    pub async fn repository(&self) -> Result<PostRepository> {
        Ok(PostRepository::new(self.open_store().await?))
    }
}

//! Blog configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub root: String,
    pub blog_dir: String,

    // Content
    #[serde(default)]
    pub store: StoreConfig,

    // Views
    pub related_limit: usize,
    pub card_tag_limit: usize,
    pub date_format: String,
    pub words_per_minute: usize,
    pub default_read_minutes: usize,

    // Server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "Blog & Insights".to_string(),
            description: "Thoughts, tutorials, and insights on software development".to_string(),
            author: "John Doe".to_string(),

            root: "/".to_string(),
            blog_dir: "blog".to_string(),

            store: StoreConfig::default(),

            related_limit: 3,
            card_tag_limit: 3,
            date_format: "MMMM D, YYYY".to_string(),
            words_per_minute: 200,
            default_read_minutes: 5,

            server: ServerConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Where posts are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Directory of markdown files with front-matter
    Files,
    /// JSON array of post rows
    Json,
}

/// Content store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Relative to the site directory
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Files,
            path: "posts".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.related_limit, 3);
        assert_eq!(config.store.kind, StoreKind::Files);
        assert_eq!(config.store.path, "posts");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
related_limit: 5
store:
  kind: json
  path: data/posts.json
server:
  port: 8080
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.related_limit, 5);
        assert_eq!(config.store.kind, StoreKind::Json);
        assert_eq!(config.store.path, "data/posts.json");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.card_tag_limit, 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "blog_dir: writing\n").unwrap();

        let config = BlogConfig::load(&path).unwrap();
        assert_eq!(config.blog_dir, "writing");
        assert_eq!(config.date_format, "MMMM D, YYYY");
    }
}

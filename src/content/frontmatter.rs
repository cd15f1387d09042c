//! Front-matter parsing for markdown post files

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts either `tags: rust` or `tags: [rust, async]`
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut tags = Vec::new();
            while let Some(tag) = seq.next_element::<String>()? {
                tags.push(tag);
            }
            Ok(tags)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter of a post file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    /// Posts are published unless they say otherwise
    pub published: bool,
    #[serde(alias = "date")]
    pub published_at: Option<String>,
    #[serde(alias = "created")]
    pub created_at: Option<String>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            id: None,
            title: None,
            slug: None,
            excerpt: None,
            tags: Vec::new(),
            published: true,
            published_at: None,
            created_at: None,
        }
    }
}

impl FrontMatter {
    /// Split a file into front-matter and body.
    /// Files without front-matter get the defaults and their whole text as body.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let trimmed = content.trim_start();

        if let Some(rest) = trimmed.strip_prefix("---") {
            return Ok(Self::parse_yaml(rest).unwrap_or((FrontMatter::default(), content)));
        }

        if let Some(rest) = trimmed.strip_prefix(";;;") {
            return Self::parse_json(rest);
        }

        Ok((FrontMatter::default(), content))
    }

    /// Returns `None` when the block after `---` is not YAML front-matter,
    /// e.g. a horizontal rule followed by prose.
    fn parse_yaml(rest: &str) -> Option<(Self, &str)> {
        let rest = rest.trim_start_matches(['\n', '\r']);
        let end = rest.find("\n---")?;
        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Some((FrontMatter::default(), body));
        }

        if !yaml.lines().any(looks_like_yaml_key) {
            return None;
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(fm) => Some((fm, body)),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, treating as content: {}", e);
                None
            }
        }
    }

    fn parse_json(rest: &str) -> Result<(Self, &str)> {
        let end = rest
            .find(";;;")
            .ok_or_else(|| anyhow!("Unterminated JSON front-matter"))?;
        let fm: FrontMatter = serde_json::from_str(&rest[..end])
            .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;
        let body = rest[end + 3..].trim_start_matches(['\n', '\r']);
        Ok((fm, body))
    }

    pub fn parse_published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_date_string)
    }

    pub fn parse_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_date_string)
    }
}

/// `key: value` with a plain identifier key, not a URL scheme
fn looks_like_yaml_key(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return false;
    }
    let Some((key, value)) = line.split_once(':') else {
        return false;
    };
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp")
        && (value.is_empty() || value.starts_with(' '))
}

/// Parse a date string in various formats, read as UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
slug: hello
date: 2024-01-15 10:30:00
tags:
  - rust
  - tokio
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.slug, Some("hello".to_string()));
        assert_eq!(fm.tags, vec!["rust", "tokio"]);
        assert!(fm.published);
        assert_eq!(
            fm.parse_published_at().unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-01-15 10:30"
        );
        assert!(body.starts_with("This is the content."));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#";;;
{"title": "Draft", "tags": "notes", "published": false}
;;;
Body.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Draft".to_string()));
        assert_eq!(fm.tags, vec!["notes"]);
        assert!(!fm.published);
        assert_eq!(body.trim(), "Body.");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("# Just a heading\n").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(body, "# Just a heading\n");
    }

    #[test]
    fn test_horizontal_rule_is_not_frontmatter() {
        let content = "---\nCheck out https://example.com today\n---\nMore.";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(body.contains("https://example.com"));
    }

    #[test]
    fn test_parse_date_formats() {
        let day = parse_date_string("2024-03-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let rfc = parse_date_string("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        assert!(parse_date_string("not a date").is_none());
    }
}

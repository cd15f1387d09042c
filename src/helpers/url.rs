//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

use crate::config::BlogConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/") // -> "/site/blog/"
/// ```
pub fn url_for(config: &BlogConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// URL of the post listing, optionally with a search query
pub fn listing_url(config: &BlogConfig, query: Option<&str>) -> String {
    let base = url_for(config, config.blog_dir.trim_matches('/'));
    match query.filter(|q| !q.trim().is_empty()) {
        Some(q) => format!("{}?q={}", base, encode_query(q)),
        None => base,
    }
}

/// URL of a single post
///
/// # Examples
/// ```ignore
/// post_url(&config, "hello-world") // -> "/blog/hello-world"
/// ```
pub fn post_url(config: &BlogConfig, slug: &str) -> String {
    url_for(
        config,
        &format!("{}/{}", config.blog_dir.trim_matches('/'), encode_segment(slug)),
    )
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Encode a query string value
pub fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlogConfig {
        BlogConfig {
            root: "/site/".to_string(),
            ..BlogConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/blog/"), "/site/blog/");
        assert_eq!(url_for(&config, ""), "/site/");
    }

    #[test]
    fn test_post_url_encodes_slug() {
        let config = BlogConfig::default();
        assert_eq!(post_url(&config, "hello-world"), "/blog/hello-world");
        assert_eq!(post_url(&config, "a b/c"), "/blog/a%20b%2Fc");
    }

    #[test]
    fn test_listing_url() {
        let config = BlogConfig::default();
        assert_eq!(listing_url(&config, None), "/blog");
        assert_eq!(listing_url(&config, Some("  ")), "/blog");
        assert_eq!(listing_url(&config, Some("rust web")), "/blog?q=rust%20web");
        assert_eq!(listing_url(&config, Some("rust ")), "/blog?q=rust%20");
    }
}

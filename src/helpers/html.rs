//! HTML rendering of content blocks and blog pages

use super::date::date_xml;
use super::url::{listing_url, url_for};
use crate::config::BlogConfig;
use crate::content::{ContentBlock, InlineText, ListKind, Span};
use crate::search::ListingState;
use crate::view::{ListingView, PostCard, PostView};

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render paragraph spans, bold spans as `<strong>`
pub fn render_inline(text: &InlineText) -> String {
    text.spans
        .iter()
        .map(|span| match span {
            Span::Text(t) => html_escape(t),
            Span::Bold(t) => format!("<strong>{}</strong>", html_escape(t)),
        })
        .collect()
}

/// Render blocks, grouping consecutive list items of one kind into a list
///
/// # Examples
/// ```ignore
/// render_blocks(&format("- a\n- b")) // -> "<ul><li>a</li><li>b</li></ul>"
/// ```
pub fn render_blocks(blocks: &[ContentBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        let item_kind = match block {
            ContentBlock::ListItem { kind, .. } => Some(*kind),
            _ => None,
        };
        if open_list.is_some() && open_list != item_kind {
            html.push_str(list_close(open_list));
            open_list = None;
        }

        match block {
            ContentBlock::Heading { level, text } => {
                html.push_str(&format!("<h{0}>{1}</h{0}>", level, html_escape(text)));
            }
            ContentBlock::ListItem { kind, text } => {
                if open_list.is_none() {
                    html.push_str(list_open(*kind));
                    open_list = Some(*kind);
                }
                html.push_str(&format!("<li>{}</li>", html_escape(text)));
            }
            ContentBlock::Paragraph(text) => {
                html.push_str(&format!("<p>{}</p>", render_inline(text)));
            }
            ContentBlock::Spacer => html.push_str("<br>"),
        }
    }

    html.push_str(list_close(open_list));
    html
}

fn list_open(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "<ul>",
        ListKind::Ordered => "<ol>",
    }
}

fn list_close(kind: Option<ListKind>) -> &'static str {
    match kind {
        Some(ListKind::Bullet) => "</ul>",
        Some(ListKind::Ordered) => "</ol>",
        None => "",
    }
}

/// Tag badges
pub fn render_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let badges: String = tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, html_escape(tag)))
        .collect();
    format!(r#"<div class="tags">{}</div>"#, badges)
}

/// A post card in the listing or the related section
pub fn render_card(card: &PostCard) -> String {
    format!(
        r#"<article class="post-card"><div class="meta"><time datetime="{}">{}</time> · {} min read</div><h3><a href="{}">{}</a></h3><p class="excerpt">{}</p>{}<a class="read-more" href="{}">Read More</a></article>"#,
        date_xml(&card.datetime),
        html_escape(&card.date),
        card.read_minutes,
        card.url,
        html_escape(&card.title),
        html_escape(&card.excerpt),
        render_tags(&card.tags),
        card.url,
    )
}

/// Wrap a page body in a document
pub fn layout(config: &BlogConfig, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{} | {}</title><meta name="description" content="{}"><meta name="author" content="{}"></head><body><main>{}</main></body></html>"#,
        html_escape(title),
        html_escape(&config.title),
        html_escape(&config.description),
        html_escape(&config.author),
        body
    )
}

/// The listing page, with its search form and one of three states
pub fn render_listing(config: &BlogConfig, view: &ListingView) -> String {
    let mut body = format!(
        r#"<section class="hero"><h1>{}</h1><p>{}</p><form method="get" action="{}"><input type="search" name="q" placeholder="Search posts..." value="{}"></form></section>"#,
        html_escape(&config.title),
        html_escape(&config.description),
        listing_url(config, None),
        html_escape(&view.query),
    );

    match &view.state {
        ListingState::Posts => {
            if let Some(summary) = &view.summary {
                body.push_str(&format!(r#"<p class="summary">{}</p>"#, html_escape(summary)));
            }
            body.push_str(r#"<section class="posts">"#);
            for card in &view.cards {
                body.push_str(&render_card(card));
            }
            body.push_str("</section>");
        }
        ListingState::NoResults { query } => {
            body.push_str(&format!(
                r#"<div class="empty"><p>No posts found for "{}"</p><a href="{}">Clear Search</a></div>"#,
                html_escape(query),
                listing_url(config, None),
            ));
        }
        ListingState::NoPosts => {
            body.push_str(
                r#"<div class="empty"><p>No blog posts yet. Check back soon!</p></div>"#,
            );
        }
    }

    layout(config, "Blog", &body)
}

/// A single post with its related posts
pub fn render_post(config: &BlogConfig, view: &PostView) -> String {
    let post = &view.post;
    let mut body = format!(
        r#"<article><a class="back" href="{}">Back to Blog</a><header><div class="meta"><time datetime="{}">{}</time> · {} min read</div><h1>{}</h1>"#,
        listing_url(config, None),
        date_xml(&post.display_date()),
        html_escape(&view.date),
        view.read_minutes,
        html_escape(&post.title),
    );
    if !post.excerpt.is_empty() {
        body.push_str(&format!(r#"<p class="lead">{}</p>"#, html_escape(&post.excerpt)));
    }
    body.push_str(&render_tags(&post.tags));
    body.push_str("</header>");

    body.push_str(r#"<div class="prose">"#);
    body.push_str(&render_blocks(&view.blocks));
    body.push_str("</div>");

    let related = view.related.cards();
    if !related.is_empty() {
        body.push_str(r#"<section class="related"><h2>Related Posts</h2>"#);
        for card in related {
            body.push_str(&render_card(card));
        }
        body.push_str("</section>");
    }
    body.push_str("</article>");

    layout(config, &post.title, &body)
}

/// The page shown for an unknown slug
pub fn render_not_found(config: &BlogConfig) -> String {
    let body = format!(
        r#"<div class="not-found"><h1>Post Not Found</h1><p>The blog post you're looking for doesn't exist or has been removed.</p><a href="{}">Back to Blog</a></div>"#,
        listing_url(config, None)
    );
    layout(config, "Post Not Found", &body)
}

/// The page shown when the content store could not be read
pub fn render_error(config: &BlogConfig) -> String {
    let body = format!(
        r#"<div class="error"><h1>Something went wrong</h1><p>Posts could not be loaded right now.</p><a href="{}">Home</a></div>"#,
        url_for(config, "")
    );
    layout(config, "Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{format, Post};
    use crate::view::RelatedPosts;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_blocks_groups_lists() {
        let html = render_blocks(&format("- a\n- b\n1. one\n2. two\ntext"));
        assert_eq!(
            html,
            "<ul><li>a</li><li>b</li></ul><ol><li>one</li><li>two</li></ol><p>text</p>"
        );
    }

    #[test]
    fn test_render_blocks_spacer_splits_lists() {
        let html = render_blocks(&format("- a\n\n- b"));
        assert_eq!(html, "<ul><li>a</li></ul><br><ul><li>b</li></ul>");
    }

    #[test]
    fn test_render_blocks_headings_and_bold() {
        let html = render_blocks(&format("## Title\n**bold** <text>"));
        assert_eq!(
            html,
            "<h2>Title</h2><p><strong>bold</strong> &lt;text&gt;</p>"
        );
    }

    #[test]
    fn test_render_blocks_closes_trailing_list() {
        assert_eq!(render_blocks(&format("1. only")), "<ol><li>only</li></ol>");
        assert_eq!(render_blocks(&[]), "");
    }

    fn listing(state: ListingState) -> ListingView {
        ListingView {
            query: "rust".to_string(),
            state,
            summary: None,
            cards: Vec::new(),
        }
    }

    #[test]
    fn test_render_listing_states() {
        let config = BlogConfig::default();

        let html = render_listing(
            &config,
            &listing(ListingState::NoResults {
                query: "rust".to_string(),
            }),
        );
        assert!(html.contains(r#"No posts found for "rust""#));
        assert!(html.contains("Clear Search"));

        let html = render_listing(&config, &listing(ListingState::NoPosts));
        assert!(html.contains("No blog posts yet"));
    }

    #[test]
    fn test_render_post() {
        let config = BlogConfig::default();
        let mut post = Post::new("1", "Hello <World>", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        post.content = "# Intro\n- point".to_string();
        post.tags = vec!["rust".to_string()];
        let view = PostView::build(&config, post, RelatedPosts::Unavailable);

        let html = render_post(&config, &view);
        assert!(html.contains("<h1>Hello &lt;World&gt;</h1>"));
        assert!(html.contains("February 1, 2024"));
        assert!(html.contains("<h1>Intro</h1><ul><li>point</li></ul>"));
        assert!(html.contains(r#"<span class="tag">rust</span>"#));
        assert!(!html.contains("Related Posts"));
    }

    #[test]
    fn test_render_not_found() {
        let html = render_not_found(&BlogConfig::default());
        assert!(html.contains("Post Not Found"));
        assert!(html.contains(r#"href="/blog""#));
    }
}

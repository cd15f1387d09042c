//! Show a single post

use anyhow::Result;

use crate::content::{ContentBlock, ListKind};
use crate::view::{PostView, RelatedPosts};
use crate::Blog;

/// Print a post as plain text, followed by its related posts
pub async fn run(blog: &Blog, slug: &str, json: bool) -> Result<()> {
    let repo = blog.repository().await?;
    let view = PostView::fetch(&repo, &blog.config, slug).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", view.post.title);
    println!("{} · {} min read", view.date, view.read_minutes);
    if !view.post.excerpt.is_empty() {
        println!("{}", view.post.excerpt);
    }
    if !view.post.tags.is_empty() {
        println!("Tags: {}", view.post.tags.join(", "));
    }
    println!();

    for line in text_lines(&view.blocks) {
        println!("{}", line);
    }

    match &view.related {
        RelatedPosts::Loaded(cards) if !cards.is_empty() => {
            println!();
            println!("Related Posts:");
            for card in cards {
                println!("  {} - {} ({})", card.date, card.title, card.slug);
            }
        }
        RelatedPosts::Loaded(_) => {}
        RelatedPosts::Unavailable => {
            println!();
            println!("Related posts are unavailable right now.");
        }
    }

    Ok(())
}

/// Plain-text rendering of blocks; ordered items are numbered per run
fn text_lines(blocks: &[ContentBlock]) -> Vec<String> {
    let mut lines = Vec::with_capacity(blocks.len());
    let mut number = 0;

    for block in blocks {
        match block {
            ContentBlock::ListItem {
                kind: ListKind::Ordered,
                text,
            } => {
                number += 1;
                lines.push(format!("  {}. {}", number, text));
                continue;
            }
            ContentBlock::ListItem {
                kind: ListKind::Bullet,
                text,
            } => lines.push(format!("  • {}", text)),
            ContentBlock::Heading { level, text } => {
                lines.push(format!("{} {}", "#".repeat(*level as usize), text))
            }
            ContentBlock::Paragraph(inline) => lines.push(inline.plain_text()),
            ContentBlock::Spacer => lines.push(String::new()),
        }
        number = 0;
    }

    lines
}

//! List published posts and tags

use anyhow::Result;

use crate::search::{tag_counts, ListingState};
use crate::view::ListingSnapshot;
use crate::Blog;

/// Print the listing, filtered by `query`
pub async fn run(blog: &Blog, query: &str, json: bool) -> Result<()> {
    let repo = blog.repository().await?;
    let snapshot = ListingSnapshot::fetch(&repo).await?;
    let view = snapshot.view(&blog.config, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    match &view.state {
        ListingState::Posts => {
            match &view.summary {
                Some(summary) => println!("{}:", summary),
                None => println!("Posts ({}):", view.cards.len()),
            }
            for card in &view.cards {
                let tags = if card.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", card.tags.join(", "))
                };
                println!("  {} - {} ({}){}", card.date, card.title, card.slug, tags);
            }
        }
        ListingState::NoResults { query } => {
            println!("No posts found for \"{}\"", query);
        }
        ListingState::NoPosts => {
            println!("No blog posts yet.");
        }
    }

    Ok(())
}

/// Print every tag with its post count
pub async fn tags(blog: &Blog) -> Result<()> {
    let repo = blog.repository().await?;
    let posts = repo.fetch_published_posts().await?;
    let counts = tag_counts(&posts);

    println!("Tags ({}):", counts.len());
    for (tag, count) in counts {
        println!("  {} ({})", tag, count);
    }

    Ok(())
}

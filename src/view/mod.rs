//! Page models for the listing and single-post views
//!
//! A view is built from one snapshot fetched through the repository. Changing
//! the search query re-filters the snapshot; navigating fetches a new one.

mod navigator;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use navigator::{Navigator, Target, Ticket};

use crate::config::BlogConfig;
use crate::content::{self, ContentBlock, Post};
use crate::helpers::{format_date, post_url, reading_minutes};
use crate::related::select_related;
use crate::repository::{PostRepository, RepoError};
use crate::search::{search, ListingState};

/// A post as shown in a grid of cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub title: String,
    pub slug: String,
    pub url: String,
    pub excerpt: String,
    pub date: String,
    pub datetime: DateTime<Utc>,
    pub read_minutes: usize,
    pub tags: Vec<String>,
}

impl PostCard {
    pub fn new(config: &BlogConfig, post: &Post, tag_limit: usize) -> Self {
        let datetime = post.display_date();
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            url: post_url(config, &post.slug),
            excerpt: post.excerpt.clone(),
            date: format_date(&datetime, &config.date_format),
            datetime,
            read_minutes: reading_minutes(
                post.words(),
                config.words_per_minute,
                config.default_read_minutes,
            ),
            tags: post.tags.iter().take(tag_limit).cloned().collect(),
        }
    }
}

/// Published posts fetched for one visit of the listing
#[derive(Debug, Clone, Default)]
pub struct ListingSnapshot {
    pub posts: Vec<Post>,
}

impl ListingSnapshot {
    pub async fn fetch(repo: &PostRepository) -> Result<Self, RepoError> {
        Ok(Self {
            posts: repo.fetch_published_posts().await?,
        })
    }

    /// The listing for `query`, filtered from the whole snapshot
    pub fn view(&self, config: &BlogConfig, query: &str) -> ListingView {
        let results = search(&self.posts, query);
        ListingView {
            query: results.query.clone(),
            state: results.state(),
            summary: results.summary(),
            cards: results
                .posts
                .iter()
                .map(|post| PostCard::new(config, post, config.card_tag_limit))
                .collect(),
        }
    }
}

/// The post listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub query: String,
    #[serde(serialize_with = "serialize_state")]
    pub state: ListingState,
    pub summary: Option<String>,
    pub cards: Vec<PostCard>,
}

fn serialize_state<S: serde::Serializer>(state: &ListingState, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(match state {
        ListingState::Posts => "posts",
        ListingState::NoResults { .. } => "no_results",
        ListingState::NoPosts => "no_posts",
    })
}

/// Related posts under a single post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "posts", rename_all = "snake_case")]
pub enum RelatedPosts {
    Loaded(Vec<PostCard>),
    /// The candidates could not be fetched; the post itself still renders
    Unavailable,
}

impl RelatedPosts {
    pub fn cards(&self) -> &[PostCard] {
        match self {
            RelatedPosts::Loaded(cards) => cards,
            RelatedPosts::Unavailable => &[],
        }
    }
}

/// A single post page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub post: Post,
    pub date: String,
    pub read_minutes: usize,
    pub blocks: Vec<ContentBlock>,
    pub related: RelatedPosts,
}

impl PostView {
    /// Fetch a post by slug together with its related posts
    pub async fn fetch(
        repo: &PostRepository,
        config: &BlogConfig,
        slug: &str,
    ) -> Result<Self, RepoError> {
        let post = repo.fetch_post_by_slug(slug).await?;

        let related = match repo
            .fetch_related_candidates(&post.id, config.related_limit)
            .await
        {
            Ok(candidates) => RelatedPosts::Loaded(
                select_related(&post, &candidates, config.related_limit)
                    .iter()
                    .map(|related| PostCard::new(config, related, 0))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!("Related posts for `{}` unavailable: {}", slug, e);
                RelatedPosts::Unavailable
            }
        };

        Ok(Self::build(config, post, related))
    }

    pub fn build(config: &BlogConfig, post: Post, related: RelatedPosts) -> Self {
        Self {
            date: format_date(&post.display_date(), &config.date_format),
            read_minutes: reading_minutes(
                post.words(),
                config.words_per_minute,
                config.default_read_minutes,
            ),
            blocks: content::format(&post.content),
            related,
            post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::BrokenStore;
    use crate::store::testing::record;
    use crate::store::{ContentStore, MemoryStore, PostRecord, StoreError};
    use async_trait::async_trait;
    use std::sync::Arc;

    fn repo(rows: Vec<PostRecord>) -> PostRepository {
        PostRepository::new(Arc::new(MemoryStore::new(rows)))
    }

    fn rows() -> Vec<PostRecord> {
        let mut a = record("a", "intro", Some(3), 1);
        a.tags = vec!["one", "two", "three", "four"]
            .into_iter()
            .map(String::from)
            .collect();
        a.excerpt = "Getting started".to_string();
        vec![
            a,
            record("b", "second", None, 2),
            record("c", "third", Some(1), 1),
            record("d", "fourth", Some(2), 1),
            record("e", "fifth", Some(4), 1),
        ]
    }

    #[tokio::test]
    async fn test_listing_view() {
        let config = BlogConfig::default();
        let snapshot = ListingSnapshot::fetch(&repo(rows())).await.unwrap();

        let all = snapshot.view(&config, "");
        assert_eq!(all.state, ListingState::Posts);
        assert_eq!(all.summary, None);
        assert_eq!(all.cards.len(), 5);
        assert_eq!(all.cards[0].slug, "fifth");

        let intro = &all.cards[1];
        assert_eq!(intro.url, "/blog/intro");
        assert_eq!(intro.date, "January 3, 2024");
        assert_eq!(intro.tags, vec!["one", "two", "three"]);
        assert_eq!(intro.read_minutes, 1);
    }

    #[tokio::test]
    async fn test_card_and_page_agree_on_read_time() {
        let mut long = record("a", "long", Some(1), 1);
        long.content = "word ".repeat(450);
        let repo = repo(vec![long, record("b", "short", Some(2), 2)]);
        let config = BlogConfig::default();

        let listing = ListingSnapshot::fetch(&repo).await.unwrap().view(&config, "");
        let card = listing.cards.iter().find(|c| c.slug == "long").unwrap();
        let page = PostView::fetch(&repo, &config, "long").await.unwrap();

        assert_eq!(card.read_minutes, 3);
        assert_eq!(page.read_minutes, card.read_minutes);

        let short = PostView::fetch(&repo, &config, "short").await.unwrap();
        assert_eq!(short.related.cards()[0].read_minutes, 3);
    }

    #[tokio::test]
    async fn test_listing_query_refilters_whole_snapshot() {
        let config = BlogConfig::default();
        let snapshot = ListingSnapshot::fetch(&repo(rows())).await.unwrap();

        let narrowed = snapshot.view(&config, "getting");
        assert_eq!(narrowed.cards.len(), 1);
        assert_eq!(narrowed.summary.as_deref(), Some("Found 1 post for \"getting\""));

        let none = snapshot.view(&config, "nothing matches");
        assert_eq!(
            none.state,
            ListingState::NoResults {
                query: "nothing matches".to_string()
            }
        );

        let widened = snapshot.view(&config, "post");
        assert_eq!(widened.cards.len(), 5);

        let padded = snapshot.view(&config, "nothing ");
        assert_eq!(padded.query, "nothing ");
        assert_eq!(
            padded.state,
            ListingState::NoResults {
                query: padded.query.clone()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_store_is_no_posts() {
        let config = BlogConfig::default();
        let snapshot = ListingSnapshot::fetch(&repo(Vec::new())).await.unwrap();
        assert_eq!(snapshot.view(&config, "").state, ListingState::NoPosts);
    }

    #[tokio::test]
    async fn test_listing_fetch_error_is_not_empty_list() {
        let repo = PostRepository::new(Arc::new(BrokenStore));
        let err = ListingSnapshot::fetch(&repo).await.unwrap_err();
        assert!(matches!(err, RepoError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_post_view() {
        let config = BlogConfig::default();
        let view = PostView::fetch(&repo(rows()), &config, "intro").await.unwrap();

        assert_eq!(view.post.id.as_str(), "a");
        assert_eq!(view.date, "January 3, 2024");
        assert_eq!(view.read_minutes, 1);
        assert!(matches!(view.blocks[0], ContentBlock::Heading { level: 1, .. }));

        let related: Vec<_> = view.related.cards().iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(related, vec!["second", "third", "fourth"]);
        assert!(view.related.cards().iter().all(|c| c.tags.is_empty()));
    }

    #[tokio::test]
    async fn test_post_view_not_found() {
        let config = BlogConfig::default();
        let err = PostView::fetch(&repo(rows()), &config, "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    /// Serves single posts but fails the related query
    struct NoRelatedStore(MemoryStore);

    #[async_trait]
    impl ContentStore for NoRelatedStore {
        async fn list_published(&self) -> Result<Vec<PostRecord>, StoreError> {
            self.0.list_published().await
        }

        async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError> {
            self.0.get_by_slug(slug).await
        }

        async fn list_excluding(
            &self,
            _id: &crate::content::PostId,
            _limit: usize,
        ) -> Result<Vec<PostRecord>, StoreError> {
            Err(StoreError::Unavailable("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_related_failure_keeps_post() {
        let config = BlogConfig::default();
        let repo = PostRepository::new(Arc::new(NoRelatedStore(MemoryStore::new(rows()))));

        let view = PostView::fetch(&repo, &config, "intro").await.unwrap();
        assert_eq!(view.related, RelatedPosts::Unavailable);
        assert!(view.related.cards().is_empty());
    }
}

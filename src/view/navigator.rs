//! Discarding responses that arrive after the user has navigated away

use std::sync::Mutex;

use super::{ListingSnapshot, PostView};
use crate::config::BlogConfig;
use crate::repository::{PostRepository, RepoError};

/// What a navigation is loading
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Listing,
    Post(String),
}

/// Token for one in-flight navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    target: Target,
}

impl Ticket {
    pub fn target(&self) -> &Target {
        &self.target
    }
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    target: Option<Target>,
}

/// Tracks the latest navigation. Only the response for the latest
/// ticket is applied; everything older is dropped on arrival.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Mutex<Current>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> std::sync::MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a navigation, superseding any in flight
    pub fn begin(&self, target: Target) -> Ticket {
        let mut current = self.current();
        current.generation += 1;
        current.target = Some(target.clone());
        Ticket {
            generation: current.generation,
            target,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let current = self.current();
        current.generation == ticket.generation && current.target.as_ref() == Some(&ticket.target)
    }

    /// Hand back `response` only if `ticket` is still the latest navigation
    pub fn settle<T>(&self, ticket: &Ticket, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            tracing::debug!(
                "Discarding stale response for {:?} (generation {})",
                ticket.target,
                ticket.generation
            );
            None
        }
    }

    /// Navigate to the listing. `None` means a newer navigation won.
    pub async fn open_listing(
        &self,
        repo: &PostRepository,
    ) -> Option<Result<ListingSnapshot, RepoError>> {
        let ticket = self.begin(Target::Listing);
        let response = ListingSnapshot::fetch(repo).await;
        self.settle(&ticket, response)
    }

    /// Navigate to a post. `None` means a newer navigation won.
    pub async fn open_post(
        &self,
        repo: &PostRepository,
        config: &BlogConfig,
        slug: &str,
    ) -> Option<Result<PostView, RepoError>> {
        let ticket = self.begin(Target::Post(slug.to_string()));
        let response = PostView::fetch(repo, config, slug).await;
        self.settle(&ticket, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostId;
    use crate::store::testing::record;
    use crate::store::{ContentStore, MemoryStore, PostRecord, StoreError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let nav = Navigator::new();
        let first = nav.begin(Target::Post("a".to_string()));
        let second = nav.begin(Target::Post("b".to_string()));

        assert!(!nav.is_current(&first));
        assert!(nav.is_current(&second));
        assert_eq!(nav.settle(&first, 1), None);
        assert_eq!(nav.settle(&second, 2), Some(2));
    }

    #[test]
    fn test_same_target_twice_only_latest_wins() {
        let nav = Navigator::new();
        let first = nav.begin(Target::Listing);
        let second = nav.begin(Target::Listing);
        assert_eq!(first.target(), second.target());
        assert!(!nav.is_current(&first));
        assert!(nav.is_current(&second));
    }

    /// Holds every slug lookup until the test releases it
    struct GatedStore {
        inner: MemoryStore,
        gates: HashMap<String, Arc<Notify>>,
    }

    #[async_trait]
    impl ContentStore for GatedStore {
        async fn list_published(&self) -> Result<Vec<PostRecord>, StoreError> {
            self.inner.list_published().await
        }

        async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError> {
            if let Some(gate) = self.gates.get(slug) {
                gate.notified().await;
            }
            self.inner.get_by_slug(slug).await
        }

        async fn list_excluding(
            &self,
            id: &PostId,
            limit: usize,
        ) -> Result<Vec<PostRecord>, StoreError> {
            self.inner.list_excluding(id, limit).await
        }
    }

    #[tokio::test]
    async fn test_stale_post_is_discarded_even_if_it_arrives_last() {
        let gate_a = Arc::new(Notify::new());
        let gate_b = Arc::new(Notify::new());
        let store = GatedStore {
            inner: MemoryStore::new(vec![
                record("1", "a", Some(1), 1),
                record("2", "b", Some(2), 2),
            ]),
            gates: HashMap::from([
                ("a".to_string(), gate_a.clone()),
                ("b".to_string(), gate_b.clone()),
            ]),
        };
        let repo = PostRepository::new(Arc::new(store));
        let config = BlogConfig::default();
        let nav = Navigator::new();

        let release = async {
            gate_b.notify_one();
            tokio::task::yield_now().await;
            gate_a.notify_one();
        };

        let (stale, fresh, _) = tokio::join!(
            nav.open_post(&repo, &config, "a"),
            nav.open_post(&repo, &config, "b"),
            release
        );

        assert!(stale.is_none());
        let fresh = fresh.expect("latest navigation applies").unwrap();
        assert_eq!(fresh.post.slug, "b");
    }

    #[tokio::test]
    async fn test_single_navigation_applies() {
        let repo = PostRepository::new(Arc::new(MemoryStore::new(vec![record(
            "1",
            "a",
            Some(1),
            1,
        )])));
        let nav = Navigator::new();

        let snapshot = nav.open_listing(&repo).await.unwrap().unwrap();
        assert_eq!(snapshot.posts.len(), 1);

        let missing = nav
            .open_post(&repo, &BlogConfig::default(), "zzz")
            .await
            .unwrap();
        assert!(missing.unwrap_err().is_not_found());
    }
}

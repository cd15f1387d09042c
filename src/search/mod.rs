//! Client-side search over an already fetched post list

use std::collections::HashMap;

use crate::content::Post;

/// Posts whose title, excerpt or any tag contains `query`, ignoring case.
///
/// A blank query keeps every post. Any other query is matched as typed,
/// surrounding whitespace included. Order is preserved, and filtering the
/// result again with the same query changes nothing.
pub fn filter<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    if query.trim().is_empty() {
        return posts.iter().collect();
    }
    let needle = query.to_lowercase();
    posts.iter().filter(|post| post.mentions(&needle)).collect()
}

/// What a listing should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingState {
    /// At least one post to show
    Posts,
    /// The query matched nothing
    NoResults { query: String },
    /// There are no published posts at all
    NoPosts,
}

/// Outcome of filtering a listing
#[derive(Debug)]
pub struct SearchResults<'a> {
    pub query: String,
    pub posts: Vec<&'a Post>,
}

impl<'a> SearchResults<'a> {
    pub fn state(&self) -> ListingState {
        if !self.posts.is_empty() {
            ListingState::Posts
        } else if self.is_filtered() {
            ListingState::NoResults {
                query: self.query.clone(),
            }
        } else {
            ListingState::NoPosts
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// "Found 3 posts", shown above filtered results
    pub fn summary(&self) -> Option<String> {
        if !self.is_filtered() || self.posts.is_empty() {
            return None;
        }
        let count = self.posts.len();
        let noun = if count == 1 { "post" } else { "posts" };
        Some(format!("Found {} {} for \"{}\"", count, noun, self.query))
    }
}

/// Filter `posts` by `query`, always starting from the full list
pub fn search<'a>(posts: &'a [Post], query: &str) -> SearchResults<'a> {
    SearchResults {
        query: query.to_string(),
        posts: filter(posts, query),
    }
}

/// Number of posts per tag, most used first, then by name
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

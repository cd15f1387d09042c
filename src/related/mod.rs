//! Related posts shown under a single post

use crate::content::Post;

/// Pick up to `limit` posts from `candidates`, never `current` itself.
///
/// Candidates keep their given order and the list is never padded.
pub fn select_related(current: &Post, candidates: &[Post], limit: usize) -> Vec<Post> {
    candidates
        .iter()
        .filter(|candidate| candidate.id != current.id)
        .take(limit)
        .cloned()
        .collect()
}

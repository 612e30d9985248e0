use tracing::debug;

use crate::post::CanonicalPost;
use crate::post_query::{query_posts, PostQuery};

fn collate_tags_from_posts<'a>(posts: impl Iterator<Item = &'a CanonicalPost>) -> Vec<String> {
    posts.flat_map(|post| post.tags.iter().cloned()).collect()
}

/// Every tag used by the posts matching `query` (or all posts), sorted and
/// de-duplicated.
#[must_use]
pub fn tags(posts: &[CanonicalPost], query: Option<&PostQuery>) -> Vec<String> {
    debug!("Received collate request: {query:?}");

    let mut values = if let Some(query) = query {
        collate_tags_from_posts(query_posts(posts, query))
    } else {
        collate_tags_from_posts(posts.iter())
    };

    values.sort();
    values.dedup();

    values
}

use serde::Serialize;
use tracing::debug;

use crate::post::CanonicalPost;

fn find_post_and_index<'a>(
    posts: &'a [CanonicalPost],
    id: &str,
) -> Option<(usize, &'a CanonicalPost)> {
    posts.iter().enumerate().find(|(_, post)| post.id == id)
}

fn get_newer_and_older_ids(posts: &[CanonicalPost], i: usize) -> (Option<&str>, Option<&str>) {
    let newer_id = i.checked_sub(1).map(|j| posts[j].id.as_str());
    let older_id = posts.get(i + 1).map(|p| p.id.as_str());
    (newer_id, older_id)
}

#[derive(Serialize, Debug)]
pub struct Response<'a> {
    pub post: &'a CanonicalPost,
    pub newer_id: Option<&'a str>,
    pub older_id: Option<&'a str>,
}

/// Outcome of a single-article request.
#[derive(Debug)]
pub enum Lookup<'a> {
    Found(Response<'a>),
    NotFound,
    MissingId,
}

/// Exact identifier match within a newest-first collection, with its
/// neighbours.
#[must_use]
pub fn get<'a>(posts: &'a [CanonicalPost], id: &str) -> Option<Response<'a>> {
    let (i, post) = find_post_and_index(posts, id)?;

    let (newer_id, older_id) = get_newer_and_older_ids(posts, i);

    Some(Response {
        post,
        newer_id,
        older_id,
    })
}

#[must_use]
pub fn lookup<'a>(posts: &'a [CanonicalPost], id: Option<&str>) -> Lookup<'a> {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return Lookup::MissingId;
    };
    debug!("Received single post request: {id}");
    get(posts, id).map_or(Lookup::NotFound, Lookup::Found)
}

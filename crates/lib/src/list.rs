use serde::Serialize;
use tracing::debug;

use crate::post::CanonicalPost;
use crate::post_query::{query_posts, PostQuery};

/// How many posts the home page shows.
pub const LATEST_COUNT: usize = 3;

#[derive(Debug, Default)]
pub struct Args {
    pub query: PostQuery,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Response<'a> {
    /// Matches before pagination.
    pub total: usize,
    pub posts: Vec<&'a CanonicalPost>,
}

fn paginate<'a>(
    posts: Vec<&'a CanonicalPost>,
    offset: Option<usize>,
    limit: Option<usize>,
) -> Vec<&'a CanonicalPost> {
    match (offset, limit) {
        (None, None) => posts,
        (None, Some(limit)) => posts.into_iter().take(limit).collect(),
        (Some(offset), None) => posts.into_iter().skip(offset).collect(),
        (Some(offset), Some(limit)) => posts.into_iter().skip(offset).take(limit).collect(),
    }
}

#[must_use]
pub fn query<'a>(posts: &'a [CanonicalPost], args: &Args) -> Response<'a> {
    debug!("Received list request: {args:?}");

    let matched = query_posts(posts, &args.query).collect::<Vec<_>>();
    let total = matched.len();
    let posts = paginate(matched, args.offset, args.limit);

    debug!("Sending {} of {total} posts", posts.len());
    Response { total, posts }
}

/// The newest posts, for the home page.
#[must_use]
pub fn latest(posts: &[CanonicalPost]) -> &[CanonicalPost] {
    &posts[..posts.len().min(LATEST_COUNT)]
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{latest, query, Args};
    use crate::{post::CanonicalPost, post_query::PostQuery};

    fn posts(n: usize) -> Vec<CanonicalPost> {
        (0..n)
            .map(|i| {
                let tag = if i % 2 == 0 { "even" } else { "odd" };
                serde_json::from_value(json!({
                    "id": format!("p{i}"),
                    "title": "t",
                    "description": "d",
                    "content": "c",
                    "tags": [tag],
                    "lang": "en"
                }))
                .unwrap()
            })
            .collect()
    }

    fn ids(posts: &[&CanonicalPost]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn paginates_after_filtering() {
        let posts = posts(7);
        let args = Args {
            query: PostQuery::new(Some("even"), None),
            offset: Some(1),
            limit: Some(2),
        };

        let response = query(&posts, &args);
        assert_eq!(4, response.total);
        assert_eq!(vec!["p2", "p4"], ids(&response.posts));
    }

    #[test]
    fn no_params_lists_everything() {
        let posts = posts(3);
        let response = query(&posts, &Args::default());
        assert_eq!(3, response.total);
        assert_eq!(vec!["p0", "p1", "p2"], ids(&response.posts));
    }

    #[test]
    fn response_outlives_args() {
        let posts = posts(4);
        let response = {
            let args = Args {
                query: PostQuery::new(Some("odd"), None),
                ..Args::default()
            };
            query(&posts, &args)
        };
        assert_eq!(2, response.total);
        assert_eq!(vec!["p1", "p3"], ids(&response.posts));
    }

    #[test]
    fn latest_three() {
        assert_eq!(3, latest(&posts(5)).len());
        assert_eq!("p0", latest(&posts(5))[0].id);
        assert_eq!(2, latest(&posts(2)).len());
        assert!(latest(&[]).is_empty());
    }
}

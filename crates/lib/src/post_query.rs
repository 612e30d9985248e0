use serde::Deserialize;

use crate::post::CanonicalPost;

/// Tag and language filters as they arrive from a query string. Both are
/// ANDed; an empty value is the same as no value.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct PostQuery {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

fn active(filter: Option<&String>) -> Option<&str> {
    filter.map(String::as_str).filter(|f| !f.is_empty())
}

impl PostQuery {
    #[must_use]
    pub fn new(tag: Option<&str>, lang: Option<&str>) -> Self {
        Self {
            tag: tag.map(str::to_owned),
            lang: lang.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        active(self.tag.as_ref())
    }

    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        active(self.lang.as_ref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag().is_none() && self.lang().is_none()
    }

    #[must_use]
    pub fn matches(&self, post: &CanonicalPost) -> bool {
        let tag_match = self.tag().map_or(true, |tag| {
            let tag = tag.to_lowercase();
            post.tags.iter().any(|t| t.to_lowercase() == tag)
        });
        let lang_match = self
            .lang()
            .map_or(true, |lang| post.lang.to_lowercase() == lang.to_lowercase());

        tag_match && lang_match
    }
}

/// Posts matching `query`, in their original order.
pub fn query_posts<'a, 'q>(
    posts: &'a [CanonicalPost],
    query: &'q PostQuery,
) -> impl Iterator<Item = &'a CanonicalPost> + 'q
where
    'a: 'q,
{
    posts.iter().filter(move |post| query.matches(post))
}

use postindex_lib::{
    format::{format_post_date, language_badge, post_locale},
    list, single, CanonicalPost, PostQuery,
};
use serde::Serialize;
use url::form_urlencoded;

const BLOG_TAGLINE: &str = "Technical notes, study methods, and personal reflections.";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

/// A self-contained message region: empty states, not-found and load
/// failures.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl Notice {
    pub const LIST_UNAVAILABLE: Notice = Notice {
        title: "Loading error",
        message: "I cannot load blog posts right now.",
        link: None,
    };
    pub const LATEST_UNAVAILABLE: Notice = Notice {
        title: "Loading error",
        message: "I cannot load articles right now.",
        link: None,
    };
    pub const ARTICLE_UNAVAILABLE: Notice = Notice {
        title: "Loading error",
        message: "I cannot load this article right now.",
        link: None,
    };
    pub const NO_MATCHES: Notice = Notice {
        title: "No matching posts",
        message: "Try removing one or more filters.",
        link: Some(Link {
            label: "Reset filters",
            href: "index.html",
        }),
    };
    pub const NO_ARTICLES: Notice = Notice {
        title: "No articles available",
        message: "New posts will be published soon.",
        link: None,
    };
    pub const MISSING_ID: Notice = Notice {
        title: "Post not found",
        message: "Missing id in URL query string.",
        link: Some(Link {
            label: "Back to blog",
            href: "index.html",
        }),
    };
    pub const UNKNOWN_ID: Notice = Notice {
        title: "Post not found",
        message: "The requested article does not exist.",
        link: Some(Link {
            label: "Back to blog",
            href: "index.html",
        }),
    };
    pub const BAD_PAGINATION: Notice = Notice {
        title: "Invalid request",
        message: "offset and limit must be non-negative integers.",
        link: None,
    };
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub label: String,
    pub href: String,
}

impl TagLink {
    /// Links back to the list, keeping the language filter if one is set.
    fn new(tag: &str, selected_lang: Option<&str>) -> Self {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let Some(lang) = selected_lang {
            params.append_pair("lang", lang);
        }
        params.append_pair("tag", tag);
        Self {
            label: tag.to_owned(),
            href: format!("index.html?{}", params.finish()),
        }
    }
}

fn article_href(prefix: &str, id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", id)
        .finish();
    format!("{prefix}post.html?{query}")
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub published: String,
    pub locale: &'static str,
    pub description: String,
    pub lang_badge: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagLink>,
    pub href: String,
}

impl PostCard {
    fn base(post: &CanonicalPost, href: String) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            published: format_post_date(post),
            locale: post_locale(post).tag(),
            description: post.description.clone(),
            lang_badge: language_badge(&post.lang),
            tags: Vec::new(),
            href,
        }
    }

    pub fn for_list(post: &CanonicalPost, selected_lang: Option<&str>) -> Self {
        Self {
            tags: post
                .tags
                .iter()
                .map(|tag| TagLink::new(tag, selected_lang))
                .collect(),
            ..Self::base(post, article_href("", &post.id))
        }
    }

    pub fn for_home(post: &CanonicalPost) -> Self {
        Self::base(post, article_href("blog/", &post.id))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterIndicator {
    pub text: String,
    pub active: Vec<String>,
}

impl FilterIndicator {
    pub fn new(query: &PostQuery) -> Self {
        let mut active = Vec::new();
        if let Some(tag) = query.tag() {
            active.push(format!("#{tag}"));
        }
        if let Some(lang) = query.lang() {
            active.push(lang.to_uppercase());
        }

        let text = if active.is_empty() {
            BLOG_TAGLINE.to_owned()
        } else {
            format!("Active filters: {}", active.join(" "))
        };

        Self { text, active }
    }
}

#[derive(Serialize, Debug)]
pub struct ListView {
    pub indicator: FilterIndicator,
    pub total: usize,
    pub posts: Vec<PostCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<Notice>,
}

impl ListView {
    pub fn new(args: &list::Args, response: &list::Response<'_>) -> Self {
        let selected_lang = args.query.lang();
        let posts = response
            .posts
            .iter()
            .map(|post| PostCard::for_list(post, selected_lang))
            .collect::<Vec<_>>();
        let empty = posts.is_empty().then_some(Notice::NO_MATCHES);

        Self {
            indicator: FilterIndicator::new(&args.query),
            total: response.total,
            posts,
            empty,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct LatestView {
    pub posts: Vec<PostCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<Notice>,
}

impl LatestView {
    pub fn new(posts: &[CanonicalPost]) -> Self {
        let posts = list::latest(posts)
            .iter()
            .map(PostCard::for_home)
            .collect::<Vec<_>>();
        let empty = posts.is_empty().then_some(Notice::NO_ARTICLES);
        Self { posts, empty }
    }
}

#[derive(Serialize, Debug)]
pub struct ArticleView {
    pub id: String,
    pub title: String,
    pub published: String,
    pub locale: &'static str,
    pub lang_badge: String,
    pub tags: Vec<TagLink>,
    pub paragraphs: Vec<String>,
    pub newer_id: Option<String>,
    pub older_id: Option<String>,
}

impl ArticleView {
    pub fn new(response: &single::Response<'_>) -> Self {
        let post = response.post;
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            published: format_post_date(post),
            locale: post_locale(post).tag(),
            lang_badge: language_badge(&post.lang),
            tags: post.tags.iter().map(|tag| TagLink::new(tag, None)).collect(),
            paragraphs: post.paragraphs().map(str::to_owned).collect(),
            newer_id: response.newer_id.map(str::to_owned),
            older_id: response.older_id.map(str::to_owned),
        }
    }
}

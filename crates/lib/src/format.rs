use chrono::{DateTime, Locale, Utc};

use crate::post::CanonicalPost;

pub const UNKNOWN_DATE: &str = "Unknown publication date";

/// The two display locales. Anything that isn't Italian reads as US English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLocale {
    EnUs,
    ItIt,
}

impl DisplayLocale {
    #[must_use]
    pub fn for_lang(lang: Option<&str>) -> Self {
        match lang {
            Some(lang) if lang.to_lowercase().starts_with("it") => Self::ItIt,
            _ => Self::EnUs,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ItIt => "it-IT",
        }
    }

    /// Medium date, short time.
    #[must_use]
    pub fn format(self, instant: &DateTime<Utc>) -> String {
        match self {
            Self::EnUs => instant
                .format_localized("%b %-d, %Y, %-I:%M %p", Locale::en_US)
                .to_string(),
            Self::ItIt => instant
                .format_localized("%-d %b %Y, %H:%M", Locale::it_IT)
                .to_string(),
        }
    }
}

#[must_use]
pub fn post_locale(post: &CanonicalPost) -> DisplayLocale {
    DisplayLocale::for_lang(Some(&post.lang))
}

#[must_use]
pub fn format_post_date(post: &CanonicalPost) -> String {
    post.timestamp().map_or_else(
        || UNKNOWN_DATE.to_owned(),
        |instant| post_locale(post).format(&instant),
    )
}

#[must_use]
pub fn language_badge(lang: &str) -> String {
    let lang = lang.trim();
    if lang.is_empty() {
        "EN".to_owned()
    } else {
        lang.to_uppercase()
    }
}

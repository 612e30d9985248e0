use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timestamp;

/// Keys the builder owns. Everything else in a raw record is passed through.
pub const CANONICAL_KEYS: [&str; 9] = [
    "id",
    "title",
    "description",
    "content",
    "tags",
    "lang",
    "publishedAt",
    "date",
    "source",
];

pub const DEFAULT_LANG: &str = "en";

/// One normalized entry of the index artifact.
///
/// The builder always fills every field. Readers deserialize leniently
/// (`lang`, `publishedAt`, `date` and `source` default to empty) so a
/// hand-edited artifact still loads and the formatter can fall back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPost {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalPost {
    /// The publication instant, looked up from `publishedAt` then `date`.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        [&self.published_at, &self.date]
            .into_iter()
            .filter(|s| !s.is_empty())
            .find_map(|s| timestamp::parse_instant(s))
    }

    /// Content split into paragraphs on blank lines.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split("\n\n")
    }
}

#[must_use]
pub fn to_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Trimmed, lower-cased language, or [`DEFAULT_LANG`] when absent or blank.
#[must_use]
pub fn normalize_lang(lang: Option<&Value>) -> String {
    match lang {
        Some(Value::String(lang)) if !lang.trim().is_empty() => lang.trim().to_lowercase(),
        _ => DEFAULT_LANG.to_owned(),
    }
}

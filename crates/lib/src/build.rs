use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    artifact::{self, ArtifactError},
    fs,
    layout::SiteLayout,
    post::{self, CanonicalPost, CANONICAL_KEYS},
    timestamp::{self, CreationTimeSource},
    validate::{self, ValidationError},
};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to list {dir}: {source}")]
    Discover {
        dir: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("{file}: cannot read file ({source})")]
    Read {
        file: String,
        source: std::io::Error,
    },
    #[error("{file}: invalid JSON ({source})")]
    Parse {
        file: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("{file}: duplicate id \"{id}\"")]
    DuplicateId { file: String, id: String },
    #[error("{file}: invalid publication date value")]
    UnresolvableTimestamp { file: String },
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub count: usize,
    pub artifact: Utf8PathBuf,
}

struct Entry {
    published: DateTime<Utc>,
    post: CanonicalPost,
}

fn file_label(path: &Utf8Path) -> String {
    path.file_name().unwrap_or(path.as_str()).to_owned()
}

fn trimmed(record: &Map<String, Value>, key: &str) -> String {
    validate::non_empty_str(record.get(key))
        .map(str::trim)
        .unwrap_or_default()
        .to_owned()
}

fn canonicalize(
    mut record: Map<String, Value>,
    published: &DateTime<Utc>,
    source: String,
) -> CanonicalPost {
    let tags = match record.get("tags") {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .map(|tag| tag.trim().to_owned())
            .collect(),
        _ => Vec::new(),
    };
    let published_at = post::to_iso(published);

    let post = CanonicalPost {
        id: trimmed(&record, "id"),
        title: trimmed(&record, "title"),
        description: trimmed(&record, "description"),
        content: trimmed(&record, "content"),
        tags,
        lang: post::normalize_lang(record.get("lang")),
        date: published_at.clone(),
        published_at,
        source,
        extra: Map::new(),
    };

    for key in CANONICAL_KEYS {
        record.remove(key);
    }

    CanonicalPost {
        extra: record,
        ..post
    }
}

/// Compiles a corpus into canonical posts, newest first. Stops at the
/// first bad record.
pub struct IndexBuilder<'a, H> {
    layout: &'a SiteLayout,
    history: H,
    seen_ids: HashSet<String>,
    entries: Vec<Entry>,
}

impl<'a, H: CreationTimeSource> IndexBuilder<'a, H> {
    pub fn new(layout: &'a SiteLayout, history: H) -> Self {
        Self {
            layout,
            history,
            seen_ids: HashSet::new(),
            entries: Vec::new(),
        }
    }

    fn add_file(&mut self, path: &Utf8Path) -> Result<(), BuildError> {
        let file = file_label(path);
        let body = std::fs::read_to_string(path).map_err(|source| BuildError::Read {
            file: file.clone(),
            source,
        })?;
        let raw: Value = serde_json::from_str(&body).map_err(|source| BuildError::Parse {
            file: file.clone(),
            source,
        })?;

        validate::validate(&raw, &file)?;
        let Value::Object(record) = raw else {
            return Err(ValidationError::NotAnObject { file }.into());
        };

        let resolved = timestamp::resolve(&record, path, &self.history)
            .ok_or_else(|| BuildError::UnresolvableTimestamp { file: file.clone() })?;

        let id = trimmed(&record, "id");
        if !self.seen_ids.insert(id.clone()) {
            return Err(BuildError::DuplicateId { file, id });
        }

        debug!(
            "{file}: id={id} published={} ({:?})",
            resolved.instant, resolved.origin
        );

        let source = self.layout.source_label(&file);
        self.entries.push(Entry {
            published: resolved.instant,
            post: canonicalize(record, &resolved.instant, source),
        });

        Ok(())
    }

    /// Processes files in the given order, then sorts by publication time,
    /// newest first. Equal instants keep their input order.
    pub fn build(
        mut self,
        files: impl IntoIterator<Item = Utf8PathBuf>,
    ) -> Result<Vec<CanonicalPost>, BuildError> {
        for path in files {
            self.add_file(&path)?;
        }

        self.entries.sort_by(|a, b| b.published.cmp(&a.published));

        Ok(self.entries.into_iter().map(|entry| entry.post).collect())
    }
}

pub fn discover(layout: &SiteLayout) -> Result<Vec<Utf8PathBuf>, BuildError> {
    let dir = layout.corpus_path();
    fs::eligible_files(&dir, &[layout.extension.as_str()], &layout.private_prefix)
        .map_err(|source| BuildError::Discover { dir, source })
}

/// Discover, compile and persist. Nothing is written unless every record
/// passes.
pub fn run(
    layout: &SiteLayout,
    history: impl CreationTimeSource,
) -> Result<BuildSummary, BuildError> {
    let files = discover(layout)?;
    debug!("Found {} eligible post files", files.len());

    let posts = IndexBuilder::new(layout, history).build(files)?;

    let artifact = layout.artifact_path();
    artifact::write(&artifact, &posts)?;
    info!("Wrote {} posts to {artifact}", posts.len());

    Ok(BuildSummary {
        count: posts.len(),
        artifact: layout.artifact.clone(),
    })
}

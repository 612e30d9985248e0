use camino::{Utf8Path, Utf8PathBuf};

/// Where a site keeps its post corpus and compiled index, relative to the
/// site root.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub root: Utf8PathBuf,
    pub corpus_dir: Utf8PathBuf,
    pub artifact: Utf8PathBuf,
    pub extension: String,
    pub private_prefix: String,
}

impl SiteLayout {
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            corpus_dir: Utf8PathBuf::from("data/posts"),
            artifact: Utf8PathBuf::from("data/posts.json"),
            extension: "json".to_owned(),
            private_prefix: "_".to_owned(),
        }
    }

    #[must_use]
    pub fn corpus_path(&self) -> Utf8PathBuf {
        self.root.join(&self.corpus_dir)
    }

    #[must_use]
    pub fn artifact_path(&self) -> Utf8PathBuf {
        self.root.join(&self.artifact)
    }

    /// Path of a corpus file as recorded in a post's `source`, always with
    /// forward slashes.
    #[must_use]
    pub fn source_label(&self, file_name: &str) -> String {
        let dir = self
            .corpus_dir
            .components()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("/");
        format!("{dir}/{file_name}")
    }
}

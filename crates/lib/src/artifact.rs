use std::io::Write;

use camino::Utf8Path;
use tracing::debug;

use crate::post::CanonicalPost;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read index {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Index {path} is malformed: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write index {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Pretty JSON array with a trailing newline.
pub fn encode(posts: &[CanonicalPost]) -> Result<String, ArtifactError> {
    let mut out = serde_json::to_string_pretty(posts)?;
    out.push('\n');
    Ok(out)
}

pub fn decode(body: &str, path: &Utf8Path) -> Result<Vec<CanonicalPost>, ArtifactError> {
    serde_json::from_str(body).map_err(|source| ArtifactError::Malformed {
        path: path.to_string(),
        source,
    })
}

pub fn load(path: &Utf8Path) -> Result<Vec<CanonicalPost>, ArtifactError> {
    let body = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_string(),
        source,
    })?;
    let posts = decode(&body, path)?;
    debug!("Loaded {} posts from {path}", posts.len());
    Ok(posts)
}

/// Replaces the artifact in one step: the body goes to a temporary file next
/// to `path`, which is then renamed over it.
pub fn write(path: &Utf8Path, posts: &[CanonicalPost]) -> Result<(), ArtifactError> {
    let body = encode(posts)?;
    let write_err = |source| ArtifactError::Write {
        path: path.to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(body.as_bytes()).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|err| write_err(err.error))?;

    debug!("Wrote {} posts to {path}", posts.len());
    Ok(())
}

#[cfg(test)]
mod test {
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{decode, encode, load, write, ArtifactError};
    use crate::post::CanonicalPost;

    fn post() -> CanonicalPost {
        serde_json::from_value(json!({
            "id": "hello",
            "title": "Hello",
            "description": "d",
            "content": "c",
            "tags": ["intro"],
            "lang": "en",
            "publishedAt": "2024-03-01T09:30:00.000Z",
            "date": "2024-03-01T09:30:00.000Z",
            "source": "data/posts/hello.json",
            "cover": "x.png"
        }))
        .unwrap()
    }

    #[test]
    fn empty_index_is_an_empty_array() {
        assert_eq!("[]\n", encode(&[]).unwrap());
    }

    #[test]
    fn field_order_is_canonical() {
        let body = encode(&[post()]).unwrap();
        let keys = body
            .lines()
            .filter_map(|line| line.trim().strip_prefix('"'))
            .filter_map(|line| line.split_once('"').map(|(key, _)| key))
            .filter(|key| *key != "intro")
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "id",
                "title",
                "description",
                "content",
                "tags",
                "lang",
                "publishedAt",
                "date",
                "source",
                "cover"
            ],
            keys
        );
    }

    #[test]
    fn write_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("data/posts.json")).unwrap();

        write(&path, &[post(), post()]).unwrap();
        write(&path, &[post()]).unwrap();

        assert_eq!(vec![post()], load(&path).unwrap());
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(1, leftovers);
    }

    #[test]
    fn malformed_and_missing() {
        let path = Utf8PathBuf::from("posts.json");
        assert!(matches!(
            decode("{\"not\": \"an array\"}", &path),
            Err(ArtifactError::Malformed { .. })
        ));
        assert!(matches!(
            load(&Utf8PathBuf::from("/nowhere/posts.json")),
            Err(ArtifactError::Read { .. })
        ));
    }
}

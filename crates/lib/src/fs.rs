use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};

pub fn path_has_extensions(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.contains(&ext))
}

fn is_public(path: &Path, private_prefix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| private_prefix.is_empty() || !name.starts_with(private_prefix))
}

/// Regular files in `dir` with one of `extensions`, skipping names that
/// start with `private_prefix`, sorted by file name.
pub fn eligible_files(
    dir: &Path,
    extensions: &[&str],
    private_prefix: &str,
) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths = dir
        .read_dir_utf8()?
        .filter_map(|entry| {
            entry
                .map(|entry| {
                    let path = entry.path().to_path_buf();
                    if !path.is_file() {
                        return None;
                    }
                    if path_has_extensions(&path, extensions) && is_public(&path, private_prefix)
                    {
                        Some(path)
                    } else {
                        None
                    }
                })
                .transpose()
        })
        .collect::<Result<Vec<_>, _>>()?;

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}

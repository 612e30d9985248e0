use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%b %d, %Y", "%b %d %Y", "%d %b %Y"];

/// `YYYY` or `YYYY-MM`, as the first of the period.
fn year_or_month(value: &str) -> Option<NaiveDate> {
    fn digits(s: &str, len: usize) -> Option<u32> {
        (s.len() == len && s.bytes().all(|b| b.is_ascii_digit()))
            .then(|| s.parse().ok())
            .flatten()
    }

    let (year, month) = match value.split_once('-') {
        Some((year, month)) => (year, digits(month, 2)?),
        None => (value, 1),
    };
    let year = i32::try_from(digits(year, 4)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Parses the date shapes authors actually write. Values without an
/// offset are taken as UTC.
#[must_use]
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    let value = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(naive.and_utc());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| year_or_month(value))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Answers when a file first entered version history. Implementations must
/// never fail loudly; "don't know" is `None`.
pub trait CreationTimeSource {
    fn created_at(&self, path: &Utf8Path) -> Option<DateTime<Utc>>;
}

/// Asks `git log` for the commit that added a path, following renames.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo_root: Utf8PathBuf,
}

impl GitHistory {
    #[must_use]
    pub fn new(repo_root: &Utf8Path) -> Self {
        Self {
            repo_root: repo_root.to_owned(),
        }
    }
}

impl CreationTimeSource for GitHistory {
    fn created_at(&self, path: &Utf8Path) -> Option<DateTime<Utc>> {
        let relative = path
            .strip_prefix(&self.repo_root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("/");

        let output = match Command::new("git")
            .arg("-C")
            .arg(self.repo_root.as_str())
            .args(["log", "--diff-filter=A", "--follow", "--format=%cI", "--"])
            .arg(&relative)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                debug!("git unavailable for {relative}: {err}");
                return None;
            }
        };

        if !output.status.success() {
            debug!("git log failed for {relative}: {}", output.status);
            return None;
        }

        // newest first; the last line is the original introduction
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .next_back()
            .and_then(parse_instant)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl CreationTimeSource for NoHistory {
    fn created_at(&self, _path: &Utf8Path) -> Option<DateTime<Utc>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampOrigin {
    PublishedAt,
    Date,
    VersionHistory,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub instant: DateTime<Utc>,
    pub origin: TimestampOrigin,
}

fn explicit(record: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let value = record.get(key)?;
    let parsed = value.as_str().and_then(parse_instant);
    if parsed.is_none() && !value.is_null() {
        warn!("ignoring unparseable \"{key}\" value {value}");
    }
    parsed
}

fn found(origin: TimestampOrigin) -> impl Fn(DateTime<Utc>) -> Resolved {
    move |instant| Resolved { instant, origin }
}

fn modified_at(path: &Utf8Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .ok()
}

/// Picks the publication instant for a record backed by `path`: explicit
/// `publishedAt`, explicit `date`, first commit, then file mtime. Values
/// that don't parse are skipped.
pub fn resolve(
    record: &Map<String, Value>,
    path: &Utf8Path,
    history: &impl CreationTimeSource,
) -> Option<Resolved> {
    explicit(record, "publishedAt")
        .map(found(TimestampOrigin::PublishedAt))
        .or_else(|| explicit(record, "date").map(found(TimestampOrigin::Date)))
        .or_else(|| {
            history
                .created_at(path)
                .map(found(TimestampOrigin::VersionHistory))
        })
        .or_else(|| modified_at(path).map(found(TimestampOrigin::Modified)))
}

#[cfg(test)]
mod test {
    use std::{
        process::{Command, Stdio},
        time::{Duration, SystemTime},
    };

    use camino::{Utf8Path, Utf8PathBuf};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};

    use super::{
        parse_instant, resolve, CreationTimeSource, GitHistory, NoHistory, Resolved,
        TimestampOrigin,
    };

    macro_rules! dt {
        ($y:literal, $m:literal, $d:literal) => {
            chrono::Utc.with_ymd_and_hms($y, $m, $d, 0, 0, 0).unwrap()
        };
        ($y:literal, $m:literal, $d:literal, $h:literal, $mm:literal) => {
            chrono::Utc
                .with_ymd_and_hms($y, $m, $d, $h, $mm, 0)
                .unwrap()
        };
    }

    struct Fixed(DateTime<Utc>);

    impl CreationTimeSource for Fixed {
        fn created_at(&self, _path: &Utf8Path) -> Option<DateTime<Utc>> {
            Some(self.0)
        }
    }

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    /// A scratch file whose mtime is pinned to 2020-01-01.
    fn pinned_file() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("post.json")).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_577_836_800))
            .unwrap();
        (dir, path)
    }

    #[test]
    fn parses_common_shapes() {
        assert_eq!(Some(dt!(2024, 3, 1, 9, 30)), parse_instant("2024-03-01T09:30:00Z"));
        assert_eq!(
            Some(dt!(2024, 3, 1, 8, 30)),
            parse_instant("2024-03-01T09:30:00+01:00")
        );
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("2024-03-01"));
        assert_eq!(Some(dt!(2024, 3, 1, 9, 30)), parse_instant("2024-03-01 09:30"));
        assert_eq!(
            Some(dt!(2024, 3, 1, 9, 30)),
            parse_instant("Fri, 01 Mar 2024 09:30:00 +0000")
        );
        assert_eq!(None, parse_instant("yesterday-ish"));
        assert_eq!(None, parse_instant(""));
    }

    #[test]
    fn parses_short_date_time_forms() {
        assert_eq!(Some(dt!(2024, 1, 1)), parse_instant("2024"));
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("2024-03"));
        assert_eq!(Some(dt!(2024, 3, 1, 9, 30)), parse_instant("2024-03-01T09:30Z"));
        assert_eq!(Some(dt!(2024, 3, 1, 9, 30)), parse_instant("2024-03-01T09:30"));
        assert_eq!(
            Some(dt!(2024, 3, 1, 8, 30)),
            parse_instant("2024-03-01T09:30:00.000+0100")
        );
        assert_eq!(
            Some(dt!(2024, 3, 1, 8, 30)),
            parse_instant("2024-03-01T09:30+0100")
        );
        assert_eq!(None, parse_instant("2024-13"));
        assert_eq!(None, parse_instant("20245"));
    }

    #[test]
    fn parses_written_dates() {
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("March 1, 2024"));
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("Mar 1, 2024"));
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("Mar 1 2024"));
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("1 March 2024"));
        assert_eq!(Some(dt!(2024, 3, 1)), parse_instant("2024/03/01"));
        assert_eq!(Some(dt!(2024, 3, 1, 9, 30)), parse_instant("2024/03/01 09:30"));
        assert_eq!(Some(dt!(2024, 3, 1, 9, 30)), parse_instant("Mar 1 2024 09:30"));
        assert_eq!(
            Some(dt!(2024, 3, 1, 9, 30)),
            parse_instant("March 1, 2024 09:30:00")
        );
    }

    #[test]
    fn explicit_published_at_wins() {
        let (_dir, path) = pinned_file();
        let raw = record(json!({ "publishedAt": "2024-03-01", "date": "2023-01-01" }));

        assert_eq!(
            Some(Resolved {
                instant: dt!(2024, 3, 1),
                origin: TimestampOrigin::PublishedAt
            }),
            resolve(&raw, &path, &Fixed(dt!(2022, 1, 1)))
        );
    }

    #[test]
    fn falls_through_invalid_values() {
        let (_dir, path) = pinned_file();
        let raw = record(json!({ "publishedAt": "soon", "date": "2023-01-01" }));
        let resolved = resolve(&raw, &path, &NoHistory).unwrap();
        assert_eq!(TimestampOrigin::Date, resolved.origin);

        let raw = record(json!({ "publishedAt": "soon", "date": 5 }));
        let resolved = resolve(&raw, &path, &Fixed(dt!(2022, 6, 1))).unwrap();
        assert_eq!(
            Resolved {
                instant: dt!(2022, 6, 1),
                origin: TimestampOrigin::VersionHistory
            },
            resolved
        );

        let resolved = resolve(&raw, &path, &NoHistory).unwrap();
        assert_eq!(
            Resolved {
                instant: dt!(2020, 1, 1),
                origin: TimestampOrigin::Modified
            },
            resolved
        );
    }

    #[test]
    fn missing_file_and_no_signal_is_unresolvable() {
        let raw = record(json!({}));
        assert_eq!(
            None,
            resolve(&raw, Utf8Path::new("/definitely/not/here.json"), &NoHistory)
        );
    }

    #[test]
    fn git_outside_a_repository_is_silent() {
        let (dir, path) = pinned_file();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        assert_eq!(None, GitHistory::new(&root).created_at(&path));
    }

    fn git(root: &Utf8Path, date: &str, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(root.as_str())
            .args(["-c", "user.name=Post Author", "-c", "user.email=author@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn git_reports_first_introduction_across_renames() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let posts = root.join("data/posts");
        std::fs::create_dir_all(&posts).unwrap();
        std::fs::write(
            posts.join("draft.json"),
            "{\"id\": \"hello\", \"title\": \"Hello\"}\n",
        )
        .unwrap();

        let first = "Wed, 01 Jan 2020 00:00:00 +0000";
        let second = "Fri, 01 Jan 2021 00:00:00 +0000";
        git(&root, first, &["init", "-q"]);
        git(&root, first, &["add", "data/posts/draft.json"]);
        git(&root, first, &["commit", "-q", "-m", "draft"]);
        git(&root, second, &["mv", "data/posts/draft.json", "data/posts/hello.json"]);
        git(&root, second, &["commit", "-q", "-m", "publish"]);

        assert_eq!(
            Some(dt!(2020, 1, 1)),
            GitHistory::new(&root).created_at(&posts.join("hello.json"))
        );
    }
}

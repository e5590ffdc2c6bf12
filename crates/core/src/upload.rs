//! Directory walker and uploader
//!
//! Walks a local directory tree and writes every regular file to the
//! object store, one request at a time. A failed file is counted and
//! reported; it never stops the walk.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::traits::{ObjectHeaders, ObjectStore};

/// One file scheduled for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    /// Path of the file on disk
    pub local_path: PathBuf,
    /// Path relative to the source directory
    pub relative_path: PathBuf,
    /// Destination object key
    pub key: String,
    pub headers: ObjectHeaders,
}

impl UploadTask {
    /// Build the task for a file found under `source_dir`
    pub fn new(source_dir: &Path, local_path: &Path, prefix: &str) -> Result<Self> {
        let relative_path = local_path.strip_prefix(source_dir).map_err(|_| {
            Error::InvalidPath(format!(
                "{} is outside of {}",
                local_path.display(),
                source_dir.display()
            ))
        })?;

        let key = object_key(prefix, relative_path)?;
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let headers = ObjectHeaders::for_file(&file_name, &key);

        Ok(Self {
            local_path: local_path.to_path_buf(),
            relative_path: relative_path.to_path_buf(),
            key,
            headers,
        })
    }
}

/// Running totals of an upload run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadSummary {
    /// Count one attempt
    pub fn record(&mut self, result: &Result<()>) {
        match result {
            Ok(()) => self.uploaded += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// True when no file failed, including runs that found no files
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.uploaded, self.failed)
    }
}

/// Compute the object key for a path relative to the source directory
///
/// Components are joined with `/` on every platform and backslashes are
/// rewritten to `/`. The prefix is joined with a single `/`; its leading and
/// trailing slashes are dropped since object names cannot start with `/`.
pub fn object_key(prefix: &str, relative_path: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative_path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    Error::InvalidPath(format!(
                        "file name is not valid UTF-8: {}",
                        relative_path.display()
                    ))
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(Error::InvalidPath(format!(
                    "path is not relative to the source directory: {}",
                    relative_path.display()
                )));
            }
        }
    }

    if parts.is_empty() {
        return Err(Error::InvalidPath("empty relative path".to_string()));
    }

    let relative = parts.join("/").replace('\\', "/");
    let prefix = prefix.replace('\\', "/");
    let prefix = prefix.trim_matches('/');

    if prefix.is_empty() {
        Ok(relative)
    } else {
        Ok(format!("{prefix}/{relative}"))
    }
}

/// Upload every file under `source_dir` to `bucket`
///
/// Files are visited depth-first in file name order. `on_result` is called
/// after each attempt with the object key (or the relative path when no key
/// could be formed) and the outcome. Entries that cannot be read count as
/// failures.
pub async fn upload_directory<S, F>(
    store: &S,
    bucket: &str,
    source_dir: &Path,
    prefix: &str,
    mut on_result: F,
) -> UploadSummary
where
    S: ObjectStore + ?Sized,
    F: FnMut(&str, &Result<()>),
{
    let mut summary = UploadSummary::default();

    for entry in WalkDir::new(source_dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let label = e
                    .path()
                    .map(|p| display_relative(source_dir, p))
                    .unwrap_or_else(|| source_dir.display().to_string());
                tracing::warn!(path = %label, error = %e, "Cannot read directory entry");
                let result = Err(Error::from(e));
                on_result(&label, &result);
                summary.record(&result);
                continue;
            }
        };

        match classify(&entry) {
            EntryKind::File => {}
            EntryKind::Skip => continue,
            EntryKind::Broken(e) => {
                let label = display_relative(source_dir, entry.path());
                tracing::warn!(path = %label, error = %e, "Cannot resolve symlink");
                let result = Err(Error::Io(e));
                on_result(&label, &result);
                summary.record(&result);
                continue;
            }
        }

        let result = match UploadTask::new(source_dir, entry.path(), prefix) {
            Ok(task) => {
                tracing::debug!(
                    key = %task.key,
                    path = %task.local_path.display(),
                    content_type = %task.headers.content_type,
                    cache_control = task.headers.cache_control.unwrap_or("-"),
                    "Uploading object"
                );
                let result = store
                    .put_object_from_file(bucket, &task.key, &task.local_path, &task.headers)
                    .await;
                on_result(&task.key, &result);
                result
            }
            Err(e) => {
                let result = Err(e);
                on_result(&display_relative(source_dir, entry.path()), &result);
                result
            }
        };

        summary.record(&result);
    }

    tracing::debug!(
        uploaded = summary.uploaded,
        failed = summary.failed,
        "Directory upload finished"
    );
    summary
}

enum EntryKind {
    /// Regular file, or a symlink resolving to one
    File,
    /// Directories, symlinks to directories and special files
    Skip,
    /// Symlink whose target cannot be read
    Broken(std::io::Error),
}

fn classify(entry: &DirEntry) -> EntryKind {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return EntryKind::File;
    }
    if !file_type.is_symlink() {
        return EntryKind::Skip;
    }
    match std::fs::metadata(entry.path()) {
        Ok(meta) if meta.is_file() => EntryKind::File,
        Ok(_) => EntryKind::Skip,
        Err(e) => EntryKind::Broken(e),
    }
}

/// Path relative to the source, or the full path for the source itself
fn display_relative(source_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source_dir).unwrap_or(path);
    let label = if relative.as_os_str().is_empty() {
        path
    } else {
        relative
    };
    label.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{IMMUTABLE, NO_CACHE};
    use crate::traits::MockObjectStore;
    use std::fs;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(String, String, PathBuf, ObjectHeaders)>>>;

    /// Mock store that records every call and fails for the given keys
    fn recording_store(fail_keys: &[&str]) -> (MockObjectStore, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();
        let fail_keys: Vec<String> = fail_keys.iter().map(|k| k.to_string()).collect();

        let mut store = MockObjectStore::new();
        store
            .expect_put_object_from_file()
            .returning(move |bucket, key, path, headers| {
                let key = key.to_string();
                recorded.lock().unwrap().push((
                    bucket.to_string(),
                    key.clone(),
                    path.to_path_buf(),
                    ObjectHeaders::clone(headers),
                ));
                if fail_keys.contains(&key) {
                    Err(Error::Network("connection reset by peer".to_string()))
                } else {
                    Ok(())
                }
            });

        (store, calls)
    }

    fn sample_tree() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub").join("b.css"), b"body{}").unwrap();
        temp
    }

    fn keys(calls: &Calls) -> Vec<String> {
        calls.lock().unwrap().iter().map(|c| c.1.clone()).collect()
    }

    #[test]
    fn test_object_key_without_prefix() {
        assert_eq!(object_key("", Path::new("a.txt")).unwrap(), "a.txt");
        assert_eq!(
            object_key("", &Path::new("sub").join("b.css")).unwrap(),
            "sub/b.css"
        );
    }

    #[test]
    fn test_object_key_with_prefix() {
        assert_eq!(object_key("v1", Path::new("a.txt")).unwrap(), "v1/a.txt");
        assert_eq!(
            object_key("v1", &Path::new("sub").join("b.css")).unwrap(),
            "v1/sub/b.css"
        );
    }

    #[test]
    fn test_object_key_normalizes_prefix() {
        assert_eq!(object_key("v1/", Path::new("a.txt")).unwrap(), "v1/a.txt");
        assert_eq!(object_key("/v1", Path::new("a.txt")).unwrap(), "v1/a.txt");
        assert_eq!(
            object_key("site\\v1\\", Path::new("a.txt")).unwrap(),
            "site/v1/a.txt"
        );
        assert_eq!(object_key("/", Path::new("a.txt")).unwrap(), "a.txt");
    }

    #[test]
    fn test_object_key_rewrites_backslashes() {
        assert_eq!(object_key("", Path::new("sub\\b.css")).unwrap(), "sub/b.css");
    }

    #[test]
    fn test_object_key_rejects_escaping_paths() {
        assert!(matches!(
            object_key("", Path::new("../secret")),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(object_key("v1", Path::new("")), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_upload_task_resolves_headers() {
        let root = Path::new("/srv/dist");
        let task = UploadTask::new(root, &root.join("assets").join("app.js"), "v2").unwrap();
        assert_eq!(task.key, "v2/assets/app.js");
        assert_eq!(task.relative_path, Path::new("assets").join("app.js"));
        assert_eq!(
            task.headers.content_type,
            "application/javascript; charset=utf-8"
        );
        assert_eq!(task.headers.cache_control, Some(IMMUTABLE));

        let task = UploadTask::new(root, &root.join("index.html"), "v2").unwrap();
        assert_eq!(task.headers.cache_control, Some(NO_CACHE));
    }

    #[test]
    fn test_upload_task_outside_source() {
        let result = UploadTask::new(Path::new("/srv/dist"), Path::new("/etc/passwd"), "");
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_summary_display_and_status() {
        let mut summary = UploadSummary::default();
        assert!(summary.is_success());
        assert_eq!(summary.to_string(), "0 succeeded, 0 failed");

        summary.record(&Ok(()));
        summary.record(&Err(Error::Network("timeout".to_string())));
        assert_eq!(summary, UploadSummary { uploaded: 1, failed: 1 });
        assert!(!summary.is_success());
        assert_eq!(summary.to_string(), "1 succeeded, 1 failed");
    }

    #[tokio::test]
    async fn test_upload_directory_keys_without_prefix() {
        let temp = sample_tree();
        let (store, calls) = recording_store(&[]);

        let summary = upload_directory(&store, "site", temp.path(), "", |_, _| {}).await;

        assert_eq!(summary, UploadSummary { uploaded: 2, failed: 0 });
        assert_eq!(keys(&calls), vec!["a.txt", "sub/b.css"]);

        let calls = calls.lock().unwrap();
        assert!(calls.iter().all(|c| c.0 == "site"));
        assert_eq!(calls[0].2, temp.path().join("a.txt"));
        assert_eq!(calls[1].2, temp.path().join("sub").join("b.css"));
        assert_eq!(calls[1].3.content_type, "text/css; charset=utf-8");
    }

    #[tokio::test]
    async fn test_upload_directory_keys_with_prefix() {
        let temp = sample_tree();
        let (store, calls) = recording_store(&[]);

        let summary = upload_directory(&store, "site", temp.path(), "v1", |_, _| {}).await;

        assert!(summary.is_success());
        assert_eq!(keys(&calls), vec!["v1/a.txt", "v1/sub/b.css"]);
    }

    #[tokio::test]
    async fn test_upload_directory_continues_after_failure() {
        let temp = sample_tree();
        fs::write(temp.path().join("sub").join("c.js"), b"1").unwrap();
        let (store, calls) = recording_store(&["sub/b.css"]);

        let mut reported = Vec::new();
        let summary = upload_directory(&store, "site", temp.path(), "", |key, result| {
            reported.push((key.to_string(), result.is_ok()));
        })
        .await;

        assert_eq!(summary, UploadSummary { uploaded: 2, failed: 1 });
        assert!(!summary.is_success());
        assert_eq!(keys(&calls), vec!["a.txt", "sub/b.css", "sub/c.js"]);
        assert_eq!(
            reported,
            vec![
                ("a.txt".to_string(), true),
                ("sub/b.css".to_string(), false),
                ("sub/c.js".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_directory_empty() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = MockObjectStore::new();
        store.expect_put_object_from_file().never();

        let summary = upload_directory(&store, "site", temp.path(), "v1", |_, _| {}).await;

        assert_eq!(summary, UploadSummary::default());
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_upload_directory_includes_hidden_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(".well-known"), b"x").unwrap();
        fs::create_dir(temp.path().join(".config")).unwrap();
        fs::write(temp.path().join(".config").join("app.json"), b"{}").unwrap();
        let (store, calls) = recording_store(&[]);

        let summary = upload_directory(&store, "site", temp.path(), "", |_, _| {}).await;

        assert_eq!(summary.uploaded, 2);
        assert_eq!(keys(&calls), vec![".config/app.json", ".well-known"]);
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].3.content_type, "application/json; charset=utf-8");
        assert_eq!(calls[1].3.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_directory_applies_cache_policy() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("assets")).unwrap();
        fs::write(temp.path().join("assets").join("index-9f8e.js"), b"1").unwrap();
        fs::write(temp.path().join("assets").join("frame.html"), b"<p>").unwrap();
        fs::write(temp.path().join("index.html"), b"<html>").unwrap();
        let (store, calls) = recording_store(&[]);

        upload_directory(&store, "site", temp.path(), "app", |_, _| {}).await;

        let calls = calls.lock().unwrap();
        let header = |key: &str| {
            calls
                .iter()
                .find(|c| c.1 == key)
                .map(|c| c.3.cache_control)
                .unwrap()
        };
        assert_eq!(header("app/assets/index-9f8e.js"), Some(IMMUTABLE));
        assert_eq!(header("app/assets/frame.html"), Some(NO_CACHE));
        assert_eq!(header("app/index.html"), Some(NO_CACHE));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_upload_directory_follows_file_symlinks_only() {
        let temp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("shared.txt"), b"x").unwrap();
        fs::create_dir(outside.path().join("nested")).unwrap();
        fs::write(outside.path().join("nested").join("deep.txt"), b"x").unwrap();

        std::os::unix::fs::symlink(outside.path().join("shared.txt"), temp.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("nested"), temp.path().join("dirlink"))
            .unwrap();
        let (store, calls) = recording_store(&[]);

        let summary = upload_directory(&store, "site", temp.path(), "", |_, _| {}).await;

        assert_eq!(summary.uploaded, 1);
        assert_eq!(keys(&calls), vec!["link.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_upload_directory_counts_dangling_symlink() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), b"hello").unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.js"), temp.path().join("dangling.js"))
            .unwrap();
        let (store, calls) = recording_store(&[]);

        let mut reported = Vec::new();
        let summary = upload_directory(&store, "site", temp.path(), "", |key, result| {
            reported.push((key.to_string(), result.is_ok()));
        })
        .await;

        assert_eq!(summary, UploadSummary { uploaded: 1, failed: 1 });
        assert_eq!(keys(&calls), vec!["a.txt"]);
        assert_eq!(
            reported,
            vec![("a.txt".to_string(), true), ("dangling.js".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_upload_directory_unreadable_root_counts_as_failure() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing");
        let mut store = MockObjectStore::new();
        store.expect_put_object_from_file().never();

        let mut reported = Vec::new();
        let summary = upload_directory(&store, "site", &missing, "", |key, result| {
            reported.push((key.to_string(), result.is_err()));
        })
        .await;

        assert_eq!(summary, UploadSummary { uploaded: 0, failed: 1 });
        assert!(!summary.is_success());
        assert_eq!(reported, vec![(missing.display().to_string(), true)]);
    }

    #[test]
    fn test_walk_error_maps_to_io() {
        let temp = tempfile::tempdir().unwrap();
        let err = WalkDir::new(temp.path().join("missing"))
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();

        match Error::from(err) {
            Error::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}

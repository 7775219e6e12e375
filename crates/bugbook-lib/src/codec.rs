//! Record-file I/O shared by every store.
//!
//! Files are written in one canonical format (a pretty-printed JSON
//! array). Reading accepts that format first and falls back to a YAML
//! sequence, so hand-edited or foreign lists still load.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{BugbookError, Result};

/// Decode an ordered sequence of records, JSON first, then YAML.
///
/// Blank input decodes to an empty sequence.
///
/// # Errors
///
/// Returns `Decode` carrying both parser messages if neither format fits.
pub fn decode_records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json_err = match serde_json::from_str::<Vec<T>>(text) {
        Ok(records) => return Ok(records),
        Err(e) => e,
    };

    match serde_yaml::from_str::<Vec<T>>(text) {
        Ok(records) => {
            tracing::debug!("Decoded {} record(s) from YAML", records.len());
            Ok(records)
        }
        Err(yaml_err) => Err(BugbookError::Decode {
            json: json_err.to_string(),
            yaml: yaml_err.to_string(),
        }),
    }
}

/// Read records from `path`.
///
/// # Errors
///
/// Returns `Io` if the file exists but cannot be read, or `Decode` if its
/// content is not a record sequence. A missing file is `Ok(None)`.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BugbookError::Io(e)),
    };
    decode_records(&text).map(Some)
}

/// Replace `path` with the given records.
///
/// Creates the parent directory if needed, writes to a uniquely named temp
/// file beside the target and renames it over the target, so an
/// interrupted write never leaves a truncated file behind and concurrent
/// writers never share a temp file.
///
/// # Errors
///
/// Returns `Write` if any step fails; the temp file is cleaned up.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    write_atomically(path, json.as_bytes()).map_err(|source| BugbookError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Dropped (and deleted) on any early return.
    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(contents)?;
    file.write_all(b"\n")?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy an unreadable record file aside before it gets replaced.
///
/// The copy sits next to the original as `<name>.corrupt-<timestamp>`.
///
/// # Errors
///
/// Returns `Write` if the copy cannot be made.
pub fn back_up_unreadable(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f")));
    let backup = path.with_file_name(name);

    fs::copy(path, &backup).map_err(|source| BugbookError::Write {
        path: backup.clone(),
        source,
    })?;
    tracing::warn!(
        "Copied unreadable {} to {} before overwriting it",
        path.display(),
        backup.display()
    );
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BugRecord, BugStatus, UserRecord};

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");

        let mut bug = BugRecord::new("bug-abc", "Test bug").with_status(BugStatus::Resolved);
        bug.steps = vec!["open app".to_string(), String::new()];

        write_records(&path, &[bug.clone()]).unwrap();

        let loaded: Vec<BugRecord> = read_records(&path).unwrap().unwrap();
        assert_eq!(loaded, vec![bug]);
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Vec<BugRecord>> =
            read_records(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "\n  \n").unwrap();

        let loaded: Vec<BugRecord> = read_records(&path).unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_decode_yaml_fallback() {
        let yaml = "- id: bug-1\n  title: From yaml\n  status: in_progress\n- name: ignored\n";
        let bugs: Vec<BugRecord> = decode_records(yaml).unwrap();
        assert_eq!(bugs.len(), 2);
        assert_eq!(bugs[0].title, "From yaml");
        assert_eq!(bugs[0].status, BugStatus::InProgress);
        assert_eq!(bugs[1].id, "");
    }

    #[test]
    fn test_decode_garbage_reports_both_formats() {
        let err = decode_records::<UserRecord>("{{{ not: [valid").unwrap_err();
        match err {
            BugbookError::Decode { json, yaml } => {
                assert!(!json.is_empty());
                assert!(!yaml.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_creates_parent_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/users.json");

        write_records(&path, &[UserRecord::new("Al", "al@x.com")]).unwrap();

        assert!(path.exists());
        assert_eq!(dir_entries(&dir.path().join("nested/deeper")), vec!["users.json"]);
    }

    #[test]
    fn test_write_failure_is_reported_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory squatting on the target cannot be replaced.
        let path = dir.path().join("bugs.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = write_records(&path, &[BugRecord::new("bug-2", "Lost")]).unwrap_err();
        assert!(err.is_write_failure());
        assert!(path.join("keep").exists());
        assert_eq!(dir_entries(dir.path()), vec!["bugs.json"]);
    }

    #[test]
    fn test_concurrent_writers_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let records: Vec<BugRecord> = (0..50)
                        .map(|i| BugRecord::new(format!("bug-{n}-{i}"), format!("writer {n}")))
                        .collect();
                    for _ in 0..5 {
                        write_records(&path, &records).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded: Vec<BugRecord> = read_records(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 50);
        assert!(loaded.iter().all(|bug| bug.title == loaded[0].title));
        assert_eq!(dir_entries(dir.path()), vec!["bugs.json"]);
    }

    #[test]
    fn test_back_up_unreadable_copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");
        fs::write(&path, "not json").unwrap();

        let backup = back_up_unreadable(&path).unwrap();

        assert_eq!(backup.parent(), Some(dir.path()));
        assert!(
            backup
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("bugs.json.corrupt-")
        );
        assert_eq!(fs::read_to_string(&backup).unwrap(), "not json");
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }
}

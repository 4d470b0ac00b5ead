//! Metadata discovery and loading.
//!
//! Loading performs no interpretation beyond "is this a JSON object"; anything
//! else is a per-source failure that the pipeline reports alongside every other
//! problem.
use crate::record::RawRecord;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A discovered metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Stable identifier used in error reports (the file name).
    pub id: String,
    pub path: PathBuf,
}

/// Why a source could not become a raw record.
#[derive(Debug)]
pub enum LoadError {
    Read(std::io::Error),
    InvalidJson(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read(err) => write!(f, "read failed ({err})"),
            LoadError::InvalidJson(err) => write!(f, "invalid JSON ({err})"),
            LoadError::NotAnObject => f.write_str("root JSON value must be an object"),
        }
    }
}

impl std::error::Error for LoadError {}

/// List metadata entries in `dir` whose name ends with `suffix`, sorted by name.
///
/// Only real directories are skipped. Dangling symlinks and non-UTF-8 names
/// still become sources; their read or parse failure is reported later.
pub fn discover_sources(dir: &Path, suffix: &str) -> Result<Vec<Source>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("inspect {}", entry.path().display()))?;
        if file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.len() > suffix.len() && name.ends_with(suffix) {
            sources.push(Source {
                id: name,
                path: entry.path(),
            });
        }
    }
    sources.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(sources)
}

/// Read one source and return its root object.
pub fn load_record(path: &Path) -> Result<RawRecord, LoadError> {
    let bytes = fs::read(path).map_err(LoadError::Read)?;
    let value: Value = serde_json::from_slice(&bytes).map_err(LoadError::InvalidJson)?;
    match value {
        Value::Object(record) => Ok(record),
        _ => Err(LoadError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn discovers_meta_files_in_name_order() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "b.meta.json", "{}");
        write(dir.path(), "a.meta.json", "{}");
        write(dir.path(), "notes.json", "{}");
        write(dir.path(), ".meta.json", "{}");
        fs::create_dir(dir.path().join("nested.meta.json")).expect("create dir");

        let sources = discover_sources(dir.path(), ".meta.json").expect("discover");
        let ids: Vec<&str> = sources.iter().map(|source| source.id.as_str()).collect();
        assert_eq!(ids, vec!["a.meta.json", "b.meta.json"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(discover_sources(&dir.path().join("liveries"), ".meta.json").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_discovered_and_fails_to_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "a.meta.json", "{}");
        std::os::unix::fs::symlink(dir.path().join("gone.json"), dir.path().join("b.meta.json"))
            .expect("create symlink");

        let sources = discover_sources(dir.path(), ".meta.json").expect("discover");
        let ids: Vec<&str> = sources.iter().map(|source| source.id.as_str()).collect();
        assert_eq!(ids, vec!["a.meta.json", "b.meta.json"]);

        let err = load_record(&sources[1].path).expect_err("dangling link");
        assert!(matches!(err, LoadError::Read(_)));
        assert!(err.to_string().starts_with("read failed ("));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_kept_with_lossy_ids() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let name = OsStr::from_bytes(b"bad\xff.meta.json");
        fs::write(dir.path().join(name), "{ broken").expect("write fixture");

        let sources = discover_sources(dir.path(), ".meta.json").expect("discover");
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "bad\u{FFFD}.meta.json");
        assert!(matches!(
            load_record(&sources[0].path),
            Err(LoadError::InvalidJson(_))
        ));
    }

    #[test]
    fn loads_objects_and_rejects_everything_else() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let ok = write(dir.path(), "ok.meta.json", r#"{"id": "a", "version": "1"}"#);
        let list = write(dir.path(), "list.meta.json", "[1, 2]");
        let scalar = write(dir.path(), "scalar.meta.json", "\"text\"");
        let broken = write(dir.path(), "broken.meta.json", "{\"id\": ");

        let record = load_record(&ok).expect("load object");
        assert_eq!(record.get("id"), Some(&Value::from("a")));
        assert!(matches!(load_record(&list), Err(LoadError::NotAnObject)));
        assert!(matches!(load_record(&scalar), Err(LoadError::NotAnObject)));

        let err = load_record(&broken).expect_err("broken JSON");
        assert!(err.to_string().starts_with("invalid JSON ("));
        let missing = load_record(&dir.path().join("gone.meta.json")).expect_err("missing");
        assert!(matches!(missing, LoadError::Read(_)));
    }
}

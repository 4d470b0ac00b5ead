//! Record types shared by the loader, normalizer, validator, and aggregator.
//!
//! Metadata files stay untyped maps end to end so unknown keys survive into the
//! manifest; typed views are only built where a rule needs to read structure.
use serde::Serialize;
use serde_json::{Map, Value};

/// One metadata file as parsed from disk. No invariants.
pub type RawRecord = Map<String, Value>;

/// Download targets a record may carry a distinct URL and folder list for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Fs20,
    Fs24,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Fs20, Platform::Fs24];

    /// Key used under `releases[].downloads`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Fs20 => "fs20",
            Platform::Fs24 => "fs24",
        }
    }

    pub fn download_key(&self) -> &'static str {
        match self {
            Platform::Fs20 => "download_fs20",
            Platform::Fs24 => "download_fs24",
        }
    }

    /// Older metadata spelled the platform with the full year.
    pub fn legacy_download_key(&self) -> &'static str {
        match self {
            Platform::Fs20 => "download_fs2020",
            Platform::Fs24 => "download_fs2024",
        }
    }

    pub fn package_folders_key(&self) -> &'static str {
        match self {
            Platform::Fs20 => "package_folders_fs20",
            Platform::Fs24 => "package_folders_fs24",
        }
    }
}

/// Per-platform download block of a release.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformDownload {
    /// Present only when the release carried a non-empty string.
    pub url: Option<String>,
    /// Present only when the release carried a sequence.
    pub package_folders: Option<Vec<Value>>,
}

/// Lenient typed view of one `releases[]` entry.
///
/// Malformed sub-fields collapse to their defaults instead of failing, matching
/// how publishers have historically written these files by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub version: Value,
    pub date: Value,
    pub changes: Vec<Value>,
    pub fs20: PlatformDownload,
    pub fs24: PlatformDownload,
}

impl Release {
    /// Build a view over a release entry. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        let downloads = entry.get("downloads").and_then(Value::as_object);
        let download_for = |platform: Platform| {
            let block = downloads
                .and_then(|downloads| downloads.get(platform.as_str()))
                .and_then(Value::as_object);
            PlatformDownload {
                url: block
                    .and_then(|block| nonempty_str(block.get("url")))
                    .map(str::to_string),
                package_folders: block
                    .and_then(|block| block.get("package_folders"))
                    .and_then(Value::as_array)
                    .cloned(),
            }
        };
        Some(Self {
            version: entry.get("version").cloned().unwrap_or(Value::Null),
            date: entry
                .get("date")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
            changes: entry
                .get("changes")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            fs20: download_for(Platform::Fs20),
            fs24: download_for(Platform::Fs24),
        })
    }

    pub fn download(&self, platform: Platform) -> &PlatformDownload {
        match platform {
            Platform::Fs20 => &self.fs20,
            Platform::Fs24 => &self.fs24,
        }
    }

    /// The release version when it is a non-empty string.
    pub fn version_str(&self) -> Option<&str> {
        nonempty_str(Some(&self.version))
    }
}

/// App-facing changelog entry derived from a release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangelogEntry {
    pub version: String,
    pub date: Value,
    pub changes: Vec<Value>,
}

/// A record in canonical shape, ready for validation and the manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: RawRecord,
}

impl NormalizedRecord {
    pub(crate) fn from_fields(fields: RawRecord) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &RawRecord {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut RawRecord {
        &mut self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    /// Canonical item identifier when present and non-empty.
    pub fn id(&self) -> Option<&str> {
        nonempty_str(self.fields.get("id"))
    }

    pub fn version(&self) -> Option<&str> {
        nonempty_str(self.fields.get("version"))
    }
}

/// Return the string when `value` is a string with non-whitespace content.
pub fn nonempty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

pub fn is_nonempty_str(value: Option<&Value>) -> bool {
    nonempty_str(value).is_some()
}

//! Schema normalization for livery metadata.
//!
//! Two historical shapes exist: the flat legacy shape (`version` plus
//! `download_fs20`/`download_fs24`) and the release-history shape
//! (`latest_version` plus `releases[]`). A record is classified exactly once;
//! release-history records then have the legacy fields derived so validation
//! and the manifest only ever see one canonical shape. Derivation fills gaps and
//! never replaces a field the publisher wrote by hand.
use crate::record::{
    is_nonempty_str, nonempty_str, ChangelogEntry, NormalizedRecord, Platform, RawRecord, Release,
};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;

const MISSING_RELEASES: &str = "missing releases[] entries (new schema requires releases[])";
const MISSING_VERSION: &str = "missing latest_version (or releases[0].version)";

/// Release-history data lifted out of a record during classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseHistory {
    /// `latest_version` when it is a non-empty string.
    pub latest_version: Option<String>,
    /// Declared newest first; never empty.
    pub releases: Vec<Value>,
}

/// A record tagged with the shape it was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedRecord {
    Legacy(RawRecord),
    ReleaseHistory {
        record: RawRecord,
        history: ReleaseHistory,
    },
}

impl ClassifiedRecord {
    pub fn shape(&self) -> &'static str {
        match self {
            ClassifiedRecord::Legacy(_) => "legacy",
            ClassifiedRecord::ReleaseHistory { .. } => "release_history",
        }
    }
}

/// Inspect a raw record once and decide which shape it follows.
///
/// A non-empty `version` always means legacy, even when `releases` is also
/// present. Release-history records must carry at least one release.
pub fn classify(raw: &RawRecord) -> Result<ClassifiedRecord> {
    let release_history = raw.contains_key("latest_version")
        && raw.contains_key("releases")
        && !is_nonempty_str(raw.get("version"));
    if !release_history {
        return Ok(ClassifiedRecord::Legacy(raw.clone()));
    }
    let releases = raw
        .get("releases")
        .and_then(Value::as_array)
        .filter(|releases| !releases.is_empty())
        .cloned()
        .ok_or_else(|| anyhow!(MISSING_RELEASES))?;
    let history = ReleaseHistory {
        latest_version: nonempty_str(raw.get("latest_version")).map(str::to_string),
        releases,
    };
    Ok(ClassifiedRecord::ReleaseHistory {
        record: raw.clone(),
        history,
    })
}

/// Pick the active release: first whose `version` equals `latest_version`,
/// otherwise `releases[0]`.
pub fn select_release(history: &ReleaseHistory) -> Result<Release> {
    if let Some(latest) = history.latest_version.as_deref() {
        let matched = history.releases.iter().find(|release| {
            release
                .as_object()
                .and_then(|release| release.get("version"))
                .and_then(Value::as_str)
                == Some(latest)
        });
        if let Some(release) = matched.and_then(Release::from_value) {
            return Ok(release);
        }
    }
    history
        .releases
        .first()
        .and_then(Release::from_value)
        .ok_or_else(|| anyhow!(MISSING_RELEASES))
}

/// Changelog entries for every release with a usable version, in declared order.
pub fn build_changelog(releases: &[Value]) -> Vec<ChangelogEntry> {
    releases
        .iter()
        .filter_map(Release::from_value)
        .filter_map(|release| {
            let version = release.version_str()?.to_string();
            Some(ChangelogEntry {
                version,
                date: release.date,
                changes: release.changes,
            })
        })
        .collect()
}

/// Normalize one raw record into canonical shape.
///
/// The input is never mutated. Errors are derivation failures for this record
/// only.
pub fn normalize(raw: &RawRecord) -> Result<NormalizedRecord> {
    let classified = classify(raw)?;
    tracing::debug!(shape = classified.shape(), "classified record");
    let mut record = match classified {
        ClassifiedRecord::Legacy(record) => record,
        ClassifiedRecord::ReleaseHistory { record, history } => {
            derive_legacy_fields(record, &history)?
        }
    };
    canonicalize_downloads(&mut record);
    Ok(NormalizedRecord::from_fields(record))
}

fn derive_legacy_fields(mut record: RawRecord, history: &ReleaseHistory) -> Result<RawRecord> {
    let release = select_release(history)?;
    let version = history
        .latest_version
        .clone()
        .or_else(|| release.version_str().map(str::to_string))
        .ok_or_else(|| anyhow!(MISSING_VERSION))?;
    record.insert("version".to_string(), Value::String(version));

    for platform in Platform::ALL {
        let download = release.download(platform);
        if let Some(url) = download.url.as_deref() {
            if !is_nonempty_str(record.get(platform.download_key())) {
                record.insert(
                    platform.download_key().to_string(),
                    Value::String(url.to_string()),
                );
            }
        }
        if let Some(folders) = download.package_folders.as_ref() {
            if !record
                .get(platform.package_folders_key())
                .is_some_and(Value::is_array)
            {
                record.insert(
                    platform.package_folders_key().to_string(),
                    Value::Array(folders.clone()),
                );
            }
        }
    }

    let changelog = build_changelog(&history.releases);
    if !changelog.is_empty() && !record.get("changelog").is_some_and(Value::is_array) {
        let changelog = serde_json::to_value(changelog).context("serialize changelog")?;
        record.insert("changelog".to_string(), changelog);
    }
    Ok(record)
}

/// Drop `downloads[]` entries without a usable `url` and coerce `label` to a
/// string. Leaves a non-sequence `downloads` untouched.
pub fn canonicalize_downloads(record: &mut RawRecord) {
    let Some(Value::Array(entries)) = record.get_mut("downloads") else {
        return;
    };
    entries.retain(|entry| is_nonempty_str(entry.get("url")));
    for entry in entries.iter_mut() {
        if let Value::Object(entry) = entry {
            let label = match entry.get("label") {
                Some(Value::String(label)) => label.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            };
            entry.insert("label".to_string(), Value::String(label));
        }
    }
}

/// Copy `download_fs2020`/`download_fs2024` to the canonical names when the
/// canonical field is missing. The alias is kept.
pub fn fill_platform_aliases(record: &mut RawRecord) {
    for platform in Platform::ALL {
        if is_nonempty_str(record.get(platform.download_key())) {
            continue;
        }
        if let Some(alias) = nonempty_str(record.get(platform.legacy_download_key())) {
            let alias = alias.to_string();
            record.insert(platform.download_key().to_string(), Value::String(alias));
        }
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;

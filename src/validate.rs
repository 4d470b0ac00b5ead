//! Required-field contract for normalized records.
//!
//! Every rule is evaluated so a publisher sees all problems with a file at
//! once.
use crate::diagnostics::ValidationError;
use crate::record::{is_nonempty_str, NormalizedRecord, Platform};
use serde_json::Value;

pub const MISSING_ID: &str = "missing required field: id";
pub const MISSING_VERSION: &str =
    "missing required field: version (or latest_version + releases[])";
pub const MISSING_DOWNLOADS: &str = "missing downloads (provide download_fs20 / download_fs24, downloads[] with url, OR latest_version + releases[].downloads.{fs20,fs24}.url)";

/// Check a normalized record, returning one error per violated rule in rule
/// order.
pub fn validate_record(source: &str, record: &NormalizedRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if record.id().is_none() {
        errors.push(ValidationError::new(source, MISSING_ID));
    }
    if record.version().is_none() {
        errors.push(ValidationError::new(source, MISSING_VERSION));
    }
    if !has_any_download(record) {
        errors.push(ValidationError::new(source, MISSING_DOWNLOADS));
    }
    errors
}

/// True when any platform URL, alias, or `downloads[].url` is usable.
pub fn has_any_download(record: &NormalizedRecord) -> bool {
    let platform_url = Platform::ALL.iter().any(|platform| {
        is_nonempty_str(record.get(platform.download_key()))
            || is_nonempty_str(record.get(platform.legacy_download_key()))
    });
    if platform_url {
        return true;
    }
    record
        .get("downloads")
        .and_then(Value::as_array)
        .is_some_and(|entries| entries.iter().any(|entry| is_nonempty_str(entry.get("url"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn normalized(value: Value) -> NormalizedRecord {
        let Value::Object(raw) = value else {
            panic!("test record must be an object");
        };
        normalize(&raw).expect("normalize test record")
    }

    fn messages(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|error| error.message.as_str()).collect()
    }

    #[test]
    fn complete_legacy_record_is_valid() {
        let record = normalized(json!({
            "id": "a321",
            "version": "1.0",
            "download_fs24": "https://x/a.zip"
        }));
        assert!(validate_record("a321.meta.json", &record).is_empty());
    }

    #[test]
    fn every_violated_rule_is_reported_in_order() {
        let record = normalized(json!({"id": "  ", "title": "Nothing here"}));
        let errors = validate_record("empty.meta.json", &record);
        assert_eq!(
            messages(&errors),
            vec![MISSING_ID, MISSING_VERSION, MISSING_DOWNLOADS]
        );
        assert!(errors.iter().all(|error| error.source == "empty.meta.json"));
    }

    #[test]
    fn missing_downloads_is_the_only_error_for_otherwise_valid_records() {
        let record = normalized(json!({
            "id": "dash8",
            "version": "3.1",
            "download_fs20": "",
            "downloads": [{"label": "broken", "url": " "}],
            "package_folders_fs20": ["dash8"]
        }));
        let errors = validate_record("dash8.meta.json", &record);
        assert_eq!(messages(&errors), vec![MISSING_DOWNLOADS]);
    }

    #[test]
    fn legacy_aliases_count_as_downloads() {
        let fs2020 = normalized(json!({
            "id": "a",
            "version": "1",
            "download_fs2020": "https://x/a.zip"
        }));
        let fs2024 = normalized(json!({
            "id": "b",
            "version": "1",
            "download_fs2024": "https://x/b.zip"
        }));
        assert!(has_any_download(&fs2020));
        assert!(has_any_download(&fs2024));
    }

    #[test]
    fn generic_download_list_counts() {
        let record = normalized(json!({
            "id": "atr72",
            "version": "2.0",
            "downloads": [{"label": "Mirror", "url": "https://mirror/atr.zip"}]
        }));
        assert!(validate_record("atr72.meta.json", &record).is_empty());
    }

    #[test]
    fn derived_release_downloads_satisfy_the_contract() {
        let record = normalized(json!({
            "id": "a350",
            "latest_version": "1.2",
            "releases": [{"version": "1.2", "downloads": {"fs24": {"url": "https://x/a350.zip"}}}]
        }));
        assert!(validate_record("a350.meta.json", &record).is_empty());
    }
}

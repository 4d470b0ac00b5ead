//! Repository configuration helpers.
//!
//! `publish.json` is optional; a repository without one uses the historical
//! layout (`liveries/*.meta.json` -> `manifest.json`).
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current schema version for `publish.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const DEFAULT_LIVERIES_DIR: &str = "liveries";
const DEFAULT_MANIFEST_PATH: &str = "manifest.json";
const DEFAULT_META_SUFFIX: &str = ".meta.json";

/// Repository-owned publish settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    pub schema_version: u32,
    /// Relative to the repository root.
    pub liveries_dir: String,
    /// Relative to the repository root.
    pub manifest_path: String,
    /// File name suffix that marks a metadata file.
    pub meta_suffix: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        default_config()
    }
}

/// Build the config used when a repository has no `publish.json`.
pub fn default_config() -> PublishConfig {
    PublishConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        liveries_dir: DEFAULT_LIVERIES_DIR.to_string(),
        manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
        meta_suffix: DEFAULT_META_SUFFIX.to_string(),
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<PublishConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: PublishConfig =
        serde_json::from_slice(&bytes).context("parse publish config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path` when it exists, otherwise fall back to defaults.
pub fn load_config_or_default(path: &Path) -> Result<PublishConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no publish config, using defaults");
        return Ok(default_config());
    }
    load_config(path)
}

/// Validate schema version and repository-relative paths.
pub fn validate_config(config: &PublishConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported publish config schema_version {}",
            config.schema_version
        ));
    }
    if config.meta_suffix.trim().is_empty() {
        return Err(anyhow!("meta_suffix must be non-empty"));
    }
    validate_relative_path(&config.liveries_dir, "liveries_dir")?;
    validate_relative_path(&config.manifest_path, "manifest_path")?;
    Ok(())
}

fn validate_relative_path(rel: &str, label: &str) -> Result<()> {
    if rel.trim().is_empty() {
        return Err(anyhow!("{label} must be non-empty"));
    }
    let path = Path::new(rel);
    if path.is_absolute() || has_parent_components(path) {
        return Err(anyhow!(
            "{label} must be a relative path without '..' (got {rel:?})"
        ));
    }
    Ok(())
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, std::path::Component::ParentDir))
}

//! Typed paths into a livery repository.
//!
//! Centralizing path construction keeps the loader, config, and manifest
//! writer agreeing on one layout.
use crate::config::PublishConfig;
use std::path::{Path, PathBuf};

/// Default config file name at the repository root.
pub const CONFIG_FILE_NAME: &str = "publish.json";

/// Convenience wrapper for locating repository artifacts.
#[derive(Debug, Clone)]
pub struct RepoPaths {
    root: PathBuf,
    liveries_dir: PathBuf,
    manifest_path: PathBuf,
}

impl RepoPaths {
    /// Resolve the layout described by `config` under `root`.
    pub fn new(root: PathBuf, config: &PublishConfig) -> Self {
        let liveries_dir = root.join(&config.liveries_dir);
        let manifest_path = root.join(&config.manifest_path);
        Self {
            root,
            liveries_dir,
            manifest_path,
        }
    }

    /// Return the repository root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory scanned for metadata files.
    pub fn liveries_dir(&self) -> &Path {
        &self.liveries_dir
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Return the default `publish.json` path.
    pub fn default_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    pub fn with_liveries_dir(mut self, dir: PathBuf) -> Self {
        self.liveries_dir = dir;
        self
    }

    pub fn with_manifest_path(mut self, path: PathBuf) -> Self {
        self.manifest_path = path;
        self
    }
}

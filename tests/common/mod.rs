//! Shared test infrastructure for integration tests.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway livery repository with a `liveries/` folder.
pub struct TestRepo {
    dir: TempDir,
}

/// Captured result of one CLI invocation.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp repo");
        std::fs::create_dir(dir.path().join("liveries")).expect("create liveries dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("manifest.json")
    }

    /// Write `liveries/<name>` with the given JSON value.
    pub fn write_meta(&self, name: &str, value: &Value) {
        let text = serde_json::to_string_pretty(value).expect("serialize meta");
        self.write_meta_text(name, &text);
    }

    pub fn write_meta_text(&self, name: &str, text: &str) {
        std::fs::write(self.root().join("liveries").join(name), text).expect("write meta");
    }

    /// Run the binary with `args` followed by `--root <repo>`.
    pub fn run(&self, args: &[&str]) -> RunResult {
        let bin = env!("CARGO_BIN_EXE_livery-publish");
        Command::new(bin)
            .args(args)
            .arg("--root")
            .arg(self.root())
            .env_remove("RUST_LOG")
            .output()
            .expect("run livery-publish")
            .into()
    }

    /// Parsed manifest, if one was written.
    pub fn manifest(&self) -> Option<Value> {
        let text = std::fs::read_to_string(self.manifest_path()).ok()?;
        Some(serde_json::from_str(&text).expect("manifest is valid JSON"))
    }
}

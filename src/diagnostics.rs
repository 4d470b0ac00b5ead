//! Per-record error reporting and the run summary.
use serde::Serialize;
use std::fmt;

/// One violated rule (or load/derivation failure) attributed to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Source file name, e.g. `a320.meta.json`.
    pub source: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Machine-readable outcome of a `publish` or `check` run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub ok: bool,
    /// Records that passed validation.
    pub item_count: usize,
    /// Set only when a manifest was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
    pub errors: Vec<ValidationError>,
}

//! Two-phase publish run.
//!
//! Phase one loads, normalizes, and validates every discovered source and
//! collects all errors. Phase two (aggregate and write) only runs when that
//! error set is empty; a partial manifest is never written.
use crate::diagnostics::{PublishReport, ValidationError};
use crate::loader::{discover_sources, load_record, Source};
use crate::manifest::{aggregate, write_manifest};
use crate::normalize::normalize;
use crate::paths::RepoPaths;
use crate::record::NormalizedRecord;
use crate::util::display_path;
use crate::validate::validate_record;
use anyhow::{anyhow, Result};
use chrono::Utc;

/// Whether a run may write the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Publish,
    Check,
}

/// Result of phase one across all sources.
#[derive(Debug, Default)]
pub struct Evaluation {
    /// Records that passed, in discovery order.
    pub records: Vec<NormalizedRecord>,
    pub errors: Vec<ValidationError>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load, normalize, and validate a single source.
pub fn process_source(source: &Source) -> Result<NormalizedRecord, Vec<ValidationError>> {
    let raw = load_record(&source.path)
        .map_err(|err| vec![ValidationError::new(&source.id, err.to_string())])?;
    let record = normalize(&raw)
        .map_err(|err| vec![ValidationError::new(&source.id, format!("{err:#}"))])?;
    let errors = validate_record(&source.id, &record);
    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}

/// Phase one: evaluate every source without stopping at the first failure.
pub fn evaluate_sources(sources: &[Source]) -> Evaluation {
    let mut evaluation = Evaluation::default();
    for source in sources {
        match process_source(source) {
            Ok(record) => {
                tracing::debug!(source = %source.id, "record ok");
                evaluation.records.push(record);
            }
            Err(errors) => {
                for error in &errors {
                    tracing::debug!(
                        source = %error.source,
                        detail = %error.message,
                        "record rejected"
                    );
                }
                evaluation.errors.extend(errors);
            }
        }
    }
    evaluation
}

/// Run the whole pipeline against a repository layout.
pub fn run(paths: &RepoPaths, meta_suffix: &str, mode: RunMode) -> Result<PublishReport> {
    if !paths.liveries_dir().is_dir() {
        let dir = display_path(paths.liveries_dir(), Some(paths.root()));
        return Err(anyhow!("{}/ folder not found", dir.trim_end_matches('/')));
    }
    let sources = discover_sources(paths.liveries_dir(), meta_suffix)?;
    tracing::info!(
        sources = sources.len(),
        dir = %paths.liveries_dir().display(),
        "evaluating metadata"
    );
    let evaluation = evaluate_sources(&sources);

    if !evaluation.is_clean() || mode == RunMode::Check {
        return Ok(PublishReport {
            ok: evaluation.is_clean(),
            item_count: evaluation.records.len(),
            manifest_path: None,
            errors: evaluation.errors,
        });
    }

    let item_count = evaluation.records.len();
    let manifest = aggregate(evaluation.records, Utc::now());
    write_manifest(paths.manifest_path(), &manifest)?;
    Ok(PublishReport {
        ok: true,
        item_count,
        manifest_path: Some(display_path(paths.manifest_path(), Some(paths.root()))),
        errors: Vec::new(),
    })
}

//! Manifest aggregation.
//!
//! Only called once every discovered record has validated cleanly; the caller
//! owns that barrier.
use crate::normalize::{canonicalize_downloads, fill_platform_aliases};
use crate::record::NormalizedRecord;
use crate::staging::write_json_atomic;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;

/// The published document consumed by the livery client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    /// ISO-8601 UTC, e.g. `2026-10-17T08:30:00.123456+00:00`.
    pub generated_at: String,
    pub items: Vec<NormalizedRecord>,
}

/// Build the manifest from validated records, preserving discovery order.
pub fn aggregate(records: Vec<NormalizedRecord>, generated_at: DateTime<Utc>) -> Manifest {
    let items = records
        .into_iter()
        .map(|mut record| {
            let fields = record.fields_mut();
            fill_platform_aliases(fields);
            canonicalize_downloads(fields);
            record
        })
        .collect();
    Manifest {
        generated_at: format_timestamp(generated_at),
        items,
    }
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Replace the manifest at `path`.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    write_json_atomic(path, manifest)?;
    tracing::info!(
        path = %path.display(),
        items = manifest.items.len(),
        "manifest written"
    );
    Ok(())
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

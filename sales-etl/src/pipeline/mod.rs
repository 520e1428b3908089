//! Transform/load pipeline
//!
//! Data flow: sources → merge → normalize → deduplicate → validate → load.
//! Every stage before the load is a pure function over the batch; an error at
//! any point aborts the run before the store is touched, and a load failure
//! rolls back inside the store.

pub mod deduplicator;
pub mod normalizer;
pub mod validator;

use serde::Serialize;
use tracing::info;

use sales_common::config::NumericPolicy;
use sales_common::Result;

use crate::db::SalesStore;
use crate::source::{merge_sources, RecordSource};
use crate::types::{NormalizedRecord, RawRecord};

pub use deduplicator::{deduplicate, DedupReport};
pub use normalizer::{NormalizeReport, Normalizer};
pub use validator::{validate, ValidationReport};

/// Settings for one pipeline run
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub numeric_policy: NumericPolicy,
}

/// Per-stage counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub records_read: usize,
    pub values_defaulted: usize,
    pub duplicates_superseded: usize,
    pub invalid_dropped: usize,
    pub rows_deleted: u64,
    pub rows_inserted: u64,
}

/// Run every transform stage over an already merged batch
///
/// Returns the records ready for loading plus the per-stage counts
/// (load counts left at zero).
pub fn transform(
    records: &[RawRecord],
    config: &PipelineConfig,
) -> Result<(Vec<NormalizedRecord>, PipelineReport)> {
    let (normalized, normalize_report) = Normalizer::new(config.numeric_policy).normalize(records)?;
    let (unique, dedup_report) = deduplicate(normalized)?;
    let (valid, validation_report) = validate(unique);

    let report = PipelineReport {
        records_read: normalize_report.records,
        values_defaulted: normalize_report.total_defaulted(),
        duplicates_superseded: dedup_report.superseded,
        invalid_dropped: validation_report.dropped,
        ..Default::default()
    };

    Ok((valid, report))
}

/// Read all sources, transform the merged batch and replace the persisted set
pub async fn run_pipeline(
    sources: &mut [Box<dyn RecordSource + Send>],
    config: &PipelineConfig,
    store: &SalesStore,
) -> Result<PipelineReport> {
    let merged = merge_sources(sources)?;
    let (valid, mut report) = transform(&merged, config)?;

    info!(
        read = report.records_read,
        defaulted = report.values_defaulted,
        superseded = report.duplicates_superseded,
        dropped = report.invalid_dropped,
        loading = valid.len(),
        "Transform complete"
    );

    let load = store.replace_all(&valid).await?;
    report.rows_deleted = load.deleted;
    report.rows_inserted = load.inserted;

    Ok(report)
}

//! Deduplicator: one survivor per OrderId
//!
//! Among records sharing an OrderId the one that arrived last (in merged
//! source order) wins. Output is ordered by OrderId ascending.

use std::collections::BTreeMap;
use tracing::debug;

use sales_common::{Error, Result};

use crate::types::OrderKeyed;

/// Outcome counts for one deduplication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub input: usize,
    pub output: usize,
    /// Records replaced by a later arrival with the same OrderId
    pub superseded: usize,
}

/// Resolve duplicate OrderIds, keeping the last arrival for each key
///
/// Every record must carry a key; the first keyless record fails the whole
/// call with [`Error::MalformedKey`] before anything is reordered.
pub fn deduplicate<R: OrderKeyed>(records: Vec<R>) -> Result<(Vec<R>, DedupReport)> {
    if let Some(position) = records.iter().position(|r| r.order_key().is_none()) {
        return Err(Error::MalformedKey(format!(
            "record at position {} has no OrderId",
            position
        )));
    }

    let input = records.len();
    let mut survivors: BTreeMap<i64, R> = BTreeMap::new();

    for record in records {
        // Checked above
        let Some(key) = record.order_key() else {
            continue;
        };
        if survivors.insert(key, record).is_some() {
            debug!(order_id = key, "Superseded earlier record");
        }
    }

    let output: Vec<R> = survivors.into_values().collect();
    let report = DedupReport {
        input,
        output: output.len(),
        superseded: input - output.len(),
    };

    Ok((output, report))
}

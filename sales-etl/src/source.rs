//! Record sources
//!
//! A source yields raw order lines tagged with its region label. The CSV
//! source reads one regional export; `merge_sources` concatenates several
//! sources in order, which is the arrival order deduplication relies on.

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use sales_common::config::SourceConfig;
use sales_common::{Error, Result};

use crate::types::RawRecord;

/// Something that produces raw records for one region
pub trait RecordSource {
    /// Region label stamped on every record from this source
    fn region(&self) -> &str;

    /// Read the full batch of records, in source order
    fn read_records(&mut self) -> Result<Vec<RawRecord>>;
}

/// Row shape of a regional CSV export
///
/// Extra columns are ignored. Blank cells become `None`; a key column that is
/// not an integer is treated as absent.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "OrderId", default, deserialize_with = "csv::invalid_option")]
    order_id: Option<i64>,
    #[serde(rename = "OrderItemId", default, deserialize_with = "csv::invalid_option")]
    order_item_id: Option<i64>,
    #[serde(rename = "QuantityOrdered", default)]
    quantity_ordered: Option<String>,
    #[serde(rename = "ItemPrice", default)]
    item_price: Option<String>,
    #[serde(rename = "PromotionDiscount", default)]
    promotion_discount: Option<String>,
}

/// Parse CSV content into raw records for `region`
pub fn parse_csv<R: Read>(reader: R, region: &str) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in reader.deserialize::<CsvRow>().enumerate() {
        // +2 for 1-indexed lines plus the header row
        let row = result.map_err(|e| Error::Csv(format!("line {}: {}", line_num + 2, e)))?;
        records.push(RawRecord {
            order_id: row.order_id,
            order_item_id: row.order_item_id,
            quantity_ordered: row.quantity_ordered,
            item_price: row.item_price,
            promotion_discount: row.promotion_discount,
            region: region.to_string(),
        });
    }

    Ok(records)
}

/// A regional CSV export on disk
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    region: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, region: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            region: region.into(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.path.clone(), config.region.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvSource {
    fn region(&self) -> &str {
        &self.region
    }

    fn read_records(&mut self) -> Result<Vec<RawRecord>> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open {}: {}", self.path.display(), e),
            ))
        })?;

        let records = parse_csv(file, &self.region)
            .map_err(|e| match e {
                Error::Csv(msg) => Error::Csv(format!("{}: {}", self.path.display(), msg)),
                other => other,
            })?;

        debug!(
            path = %self.path.display(),
            region = %self.region,
            rows = records.len(),
            "Read CSV source"
        );
        Ok(records)
    }
}

/// A fixed batch of records held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    region: String,
    records: Vec<RawRecord>,
}

impl MemorySource {
    pub fn new(region: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            region: region.into(),
            records,
        }
    }
}

impl RecordSource for MemorySource {
    fn region(&self) -> &str {
        &self.region
    }

    fn read_records(&mut self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}

/// Concatenate all sources in order, stamping each record with its source's region
pub fn merge_sources(sources: &mut [Box<dyn RecordSource + Send>]) -> Result<Vec<RawRecord>> {
    let mut merged = Vec::new();

    for source in sources.iter_mut() {
        let region = source.region().to_string();
        let records = source.read_records()?;
        info!("Source {}: {} records", region, records.len());

        merged.extend(records.into_iter().map(|mut record| {
            record.region = region.clone();
            record
        }));
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let csv = "OrderId,OrderItemId,QuantityOrdered,ItemPrice,PromotionDiscount\n\
                   1,10,2,5.50,1\n\
                   2,11,1,3,0\n";

        let records = parse_csv(csv.as_bytes(), "A").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RawRecord::new(1, 10, "2", "5.50", "1", "A"));
        assert_eq!(records[1].order_id, Some(2));
        assert_eq!(records[1].region, "A");
    }

    #[test]
    fn test_parse_csv_keeps_malformed_numerics_as_text() {
        let csv = "OrderId,OrderItemId,QuantityOrdered,ItemPrice,PromotionDiscount\n\
                   5,1,1,abc,\n";

        let records = parse_csv(csv.as_bytes(), "B").unwrap();

        assert_eq!(records[0].item_price.as_deref(), Some("abc"));
        assert_eq!(records[0].promotion_discount, None);
    }

    #[test]
    fn test_parse_csv_invalid_key_becomes_absent() {
        let csv = "OrderId,OrderItemId,QuantityOrdered,ItemPrice,PromotionDiscount\n\
                   x12,,1,1,0\n";

        let records = parse_csv(csv.as_bytes(), "A").unwrap();

        assert_eq!(records[0].order_id, None);
        assert_eq!(records[0].order_item_id, None);
    }

    #[test]
    fn test_parse_csv_ignores_extra_columns_and_order() {
        let csv = "ItemPrice,Sku,OrderId,PromotionDiscount,OrderItemId,QuantityOrdered\n\
                   4.0,SKU-9,3,0.5,30,2\n";

        let records = parse_csv(csv.as_bytes(), "A").unwrap();

        assert_eq!(records[0], RawRecord::new(3, 30, "2", "4.0", "0.5", "A"));
    }

    #[test]
    fn test_merge_preserves_source_order_and_regions() {
        let mut sources: Vec<Box<dyn RecordSource + Send>> = vec![
            Box::new(MemorySource::new(
                "A",
                vec![
                    RawRecord::new(2, 1, "1", "1", "0", ""),
                    RawRecord::new(1, 1, "1", "1", "0", ""),
                ],
            )),
            Box::new(MemorySource::new("B", vec![RawRecord::new(3, 1, "1", "1", "0", "")])),
        ];

        let merged = merge_sources(&mut sources).unwrap();

        let keys: Vec<_> = merged.iter().map(|r| r.order_id.unwrap()).collect();
        let regions: Vec<_> = merged.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(keys, vec![2, 1, 3]);
        assert_eq!(regions, vec!["A", "A", "B"]);
    }

    #[test]
    fn test_csv_source_missing_file_is_io_error() {
        let mut source = CsvSource::new("/nonexistent/region_a.csv", "A");
        assert!(matches!(source.read_records(), Err(Error::Io(_))));
    }
}

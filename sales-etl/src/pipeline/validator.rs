//! Validator: business-rule filter
//!
//! Keeps records whose `net_sale` is strictly positive. Dropping is a
//! designed filter, not a fault, so this stage never errors.

use tracing::debug;

use crate::types::NormalizedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub kept: usize,
    pub dropped: usize,
}

/// True when a record may be persisted
pub fn is_valid(record: &NormalizedRecord) -> bool {
    record.net_sale > 0.0
}

/// Keep only records with positive net sale, preserving order
pub fn validate(records: Vec<NormalizedRecord>) -> (Vec<NormalizedRecord>, ValidationReport) {
    let mut report = ValidationReport::default();

    let kept: Vec<NormalizedRecord> = records
        .into_iter()
        .filter(|record| {
            let valid = is_valid(record);
            if !valid {
                debug!(
                    order_id = record.order_id,
                    net_sale = record.net_sale,
                    "Dropping record with non-positive net sale"
                );
                report.dropped += 1;
            }
            valid
        })
        .collect();

    report.kept = kept.len();
    (kept, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_net_sale(order_id: i64, net_sale: f64) -> NormalizedRecord {
        NormalizedRecord {
            order_id,
            order_item_id: 1,
            quantity_ordered: 1.0,
            item_price: net_sale.max(0.0),
            promotion_discount: 0.0,
            total_sales: net_sale.max(0.0),
            net_sale,
            region: "A".to_string(),
        }
    }

    #[test]
    fn test_zero_dropped_small_positive_kept() {
        let (kept, report) = validate(vec![with_net_sale(1, 0.0), with_net_sale(2, 0.01)]);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].order_id, 2);
        assert_eq!(report, ValidationReport { kept: 1, dropped: 1 });
    }

    #[test]
    fn test_negative_dropped_order_preserved() {
        let input = vec![
            with_net_sale(1, 5.0),
            with_net_sale(2, -3.0),
            with_net_sale(3, 1.0),
        ];

        let (kept, report) = validate(input);

        let keys: Vec<_> = kept.iter().map(|r| r.order_id).collect();
        assert_eq!(keys, vec![1, 3]);
        assert_eq!(report.dropped, 1);
    }
}

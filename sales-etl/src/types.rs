//! Record types flowing through the pipeline
//!
//! `RawRecord` is what a source produced, `NormalizedRecord` is what the
//! normalizer hands to deduplication, validation and the load sink.

use serde::{Deserialize, Serialize};

/// Region label of the first regional export
pub const REGION_A: &str = "A";
/// Region label of the second regional export
pub const REGION_B: &str = "B";

/// An order line as read from a source, weakly typed
///
/// Numeric fields keep their raw text; parsing is the normalizer's job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub order_id: Option<i64>,
    pub order_item_id: Option<i64>,
    pub quantity_ordered: Option<String>,
    pub item_price: Option<String>,
    pub promotion_discount: Option<String>,
    /// Provenance label of the originating source
    pub region: String,
}

impl RawRecord {
    /// Convenience constructor for a fully keyed record
    pub fn new(
        order_id: i64,
        order_item_id: i64,
        quantity_ordered: &str,
        item_price: &str,
        promotion_discount: &str,
        region: &str,
    ) -> Self {
        Self {
            order_id: Some(order_id),
            order_item_id: Some(order_item_id),
            quantity_ordered: Some(quantity_ordered.to_string()),
            item_price: Some(item_price.to_string()),
            promotion_discount: Some(promotion_discount.to_string()),
            region: region.to_string(),
        }
    }
}

/// An order line with coerced numerics and derived metrics
///
/// All numeric fields are finite after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub order_id: i64,
    pub order_item_id: i64,
    pub quantity_ordered: f64,
    pub item_price: f64,
    pub promotion_discount: f64,
    /// quantity_ordered × item_price
    pub total_sales: f64,
    /// total_sales − promotion_discount
    pub net_sale: f64,
    pub region: String,
}

/// Records that carry an OrderId used as the deduplication key
pub trait OrderKeyed {
    /// The OrderId, or `None` if the record has none
    fn order_key(&self) -> Option<i64>;
}

impl OrderKeyed for RawRecord {
    fn order_key(&self) -> Option<i64> {
        self.order_id
    }
}

impl OrderKeyed for NormalizedRecord {
    fn order_key(&self) -> Option<i64> {
        Some(self.order_id)
    }
}

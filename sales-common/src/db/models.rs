//! Database models

use serde::{Deserialize, Serialize};

/// A sales record as stored in the `sales` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersistedRecord {
    /// Synthetic identity assigned by the store on insert
    pub id: i64,
    pub order_id: i64,
    pub order_item_id: i64,
    pub quantity_ordered: f64,
    pub item_price: f64,
    pub promotion_discount: f64,
    pub total_sales: f64,
    pub net_sale: f64,
    pub region: String,
}

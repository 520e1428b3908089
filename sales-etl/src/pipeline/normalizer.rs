//! Normalizer: type coercion and derived metrics
//!
//! Parses the three numeric fields of every raw record, applies the configured
//! policy to malformed values and computes `total_sales` and `net_sale`.
//! Output has the same length and order as the input.
//!
//! Derived metrics must be finite too. Finite inputs can still overflow
//! (`1e200 * 1e200`); such a record is malformed. Under
//! [`NumericPolicy::ZeroFill`] both derived fields become 0 and the record is
//! counted in `derived_defaulted`, so validation drops it. Under
//! [`NumericPolicy::Reject`] the batch fails with `MalformedInput`.

use tracing::{debug, warn};

use sales_common::config::NumericPolicy;
use sales_common::{Error, Result};

use crate::types::{NormalizedRecord, RawRecord};

/// Numeric fields subject to coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    QuantityOrdered,
    ItemPrice,
    PromotionDiscount,
}

impl NumericField {
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericField::QuantityOrdered => "QuantityOrdered",
            NumericField::ItemPrice => "ItemPrice",
            NumericField::PromotionDiscount => "PromotionDiscount",
        }
    }
}

/// Counts of values replaced with zero, per field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub records: usize,
    pub quantity_defaulted: usize,
    pub price_defaulted: usize,
    pub discount_defaulted: usize,
    /// Records whose derived metrics overflowed
    pub derived_defaulted: usize,
}

impl NormalizeReport {
    pub fn total_defaulted(&self) -> usize {
        self.quantity_defaulted
            + self.price_defaulted
            + self.discount_defaulted
            + self.derived_defaulted
    }

    fn record_default(&mut self, field: NumericField) {
        match field {
            NumericField::QuantityOrdered => self.quantity_defaulted += 1,
            NumericField::ItemPrice => self.price_defaulted += 1,
            NumericField::PromotionDiscount => self.discount_defaulted += 1,
        }
    }
}

/// Parse a raw numeric cell; `None` when absent, blank, unparseable or non-finite
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces raw records into normalized records
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    policy: NumericPolicy,
}

impl Normalizer {
    pub fn new(policy: NumericPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }

    /// Normalize a merged batch
    ///
    /// Fails only on structural problems (absent OrderId/OrderItemId) or on a
    /// malformed numeric under [`NumericPolicy::Reject`].
    pub fn normalize(&self, records: &[RawRecord]) -> Result<(Vec<NormalizedRecord>, NormalizeReport)> {
        let mut report = NormalizeReport {
            records: records.len(),
            ..Default::default()
        };

        let normalized = records
            .iter()
            .enumerate()
            .map(|(position, raw)| self.normalize_record(position, raw, &mut report))
            .collect::<Result<Vec<_>>>()?;

        if report.total_defaulted() > 0 {
            warn!(
                quantity = report.quantity_defaulted,
                price = report.price_defaulted,
                discount = report.discount_defaulted,
                derived = report.derived_defaulted,
                "Malformed numeric values replaced with 0"
            );
        }

        Ok((normalized, report))
    }

    fn normalize_record(
        &self,
        position: usize,
        raw: &RawRecord,
        report: &mut NormalizeReport,
    ) -> Result<NormalizedRecord> {
        let order_id = raw.order_id.ok_or_else(|| {
            Error::MalformedInput(format!(
                "record {} (region {}) has no OrderId",
                position, raw.region
            ))
        })?;
        let order_item_id = raw.order_item_id.ok_or_else(|| {
            Error::MalformedInput(format!("OrderId {} has no OrderItemId", order_id))
        })?;

        let quantity_ordered = self.coerce(
            order_id,
            NumericField::QuantityOrdered,
            raw.quantity_ordered.as_deref(),
            report,
        )?;
        let item_price = self.coerce(order_id, NumericField::ItemPrice, raw.item_price.as_deref(), report)?;
        let promotion_discount = self.coerce(
            order_id,
            NumericField::PromotionDiscount,
            raw.promotion_discount.as_deref(),
            report,
        )?;

        let (total_sales, net_sale) =
            self.derive(order_id, quantity_ordered, item_price, promotion_discount, report)?;

        Ok(NormalizedRecord {
            order_id,
            order_item_id,
            quantity_ordered,
            item_price,
            promotion_discount,
            total_sales,
            net_sale,
            region: raw.region.clone(),
        })
    }

    fn derive(
        &self,
        order_id: i64,
        quantity_ordered: f64,
        item_price: f64,
        promotion_discount: f64,
        report: &mut NormalizeReport,
    ) -> Result<(f64, f64)> {
        let total_sales = quantity_ordered * item_price;
        let net_sale = total_sales - promotion_discount;
        if total_sales.is_finite() && net_sale.is_finite() {
            return Ok((total_sales, net_sale));
        }

        match self.policy {
            NumericPolicy::ZeroFill => {
                debug!(
                    order_id,
                    quantity_ordered,
                    item_price,
                    promotion_discount,
                    "Derived metrics overflowed, using 0"
                );
                report.derived_defaulted += 1;
                Ok((0.0, 0.0))
            }
            NumericPolicy::Reject => Err(Error::MalformedInput(format!(
                "OrderId {}: derived sale is not finite ({} x {} - {})",
                order_id, quantity_ordered, item_price, promotion_discount
            ))),
        }
    }

    fn coerce(
        &self,
        order_id: i64,
        field: NumericField,
        raw: Option<&str>,
        report: &mut NormalizeReport,
    ) -> Result<f64> {
        if let Some(value) = parse_numeric(raw) {
            return Ok(value);
        }

        match self.policy {
            NumericPolicy::ZeroFill => {
                debug!(
                    order_id,
                    field = field.column_name(),
                    raw = raw.unwrap_or(""),
                    "Defaulting malformed numeric to 0"
                );
                report.record_default(field);
                Ok(0.0)
            }
            NumericPolicy::Reject => Err(Error::MalformedInput(format!(
                "OrderId {}: {} is not a number ({:?})",
                order_id,
                field.column_name(),
                raw.unwrap_or("")
            ))),
        }
    }
}

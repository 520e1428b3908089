//! Load sink: replace-entire-set semantics
//!
//! Each load deletes every existing row and inserts the new batch inside one
//! transaction. The transaction guard rolls back when dropped, so any error
//! between `begin` and `commit` leaves the previous set untouched.

use tracing::{error, info};

use sales_common::{Error, Result};

use super::SalesStore;
use crate::types::NormalizedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows removed from the previous set
    pub deleted: u64,
    /// Rows inserted from the new batch
    pub inserted: u64,
}

impl SalesStore {
    /// Atomically replace the persisted set with `records`
    ///
    /// Fails with [`Error::Storage`] if the transaction cannot commit; readers
    /// never observe a partially loaded set.
    pub async fn replace_all(&self, records: &[NormalizedRecord]) -> Result<LoadReport> {
        let _guard = self.load_lock.lock().await;

        match self.replace_in_transaction(records).await {
            Ok(report) => {
                info!(
                    deleted = report.deleted,
                    inserted = report.inserted,
                    "Replaced sales set"
                );
                Ok(report)
            }
            Err(e) => {
                error!("Sales load rolled back: {}", e);
                Err(Error::Storage(e.to_string()))
            }
        }
    }

    async fn replace_in_transaction(
        &self,
        records: &[NormalizedRecord],
    ) -> std::result::Result<LoadReport, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM sales")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut inserted = 0;
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO sales (
                    order_id, order_item_id, quantity_ordered, item_price,
                    promotion_discount, total_sales, net_sale, region
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.order_id)
            .bind(record.order_item_id)
            .bind(record.quantity_ordered)
            .bind(record.item_price)
            .bind(record.promotion_discount)
            .bind(record.total_sales)
            .bind(record.net_sale)
            .bind(&record.region)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }

        tx.commit().await?;

        Ok(LoadReport { deleted, inserted })
    }
}

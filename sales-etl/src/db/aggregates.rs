//! Aggregator: read-only queries over the persisted set

use std::collections::BTreeMap;

use sales_common::db::PersistedRecord;
use sales_common::Result;

use super::SalesStore;

impl SalesStore {
    /// Number of persisted records
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sum of `total_sales` per region; regions without rows are absent
    pub async fn total_by_region(&self) -> Result<BTreeMap<String, f64>> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT region, CAST(SUM(total_sales) AS REAL)
            FROM sales
            GROUP BY region
            ORDER BY region ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Mean of `total_sales` across all records, `None` for an empty set
    pub async fn average_sale(&self) -> Result<Option<f64>> {
        let average: Option<f64> = sqlx::query_scalar("SELECT AVG(total_sales) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(average)
    }

    /// OrderIds occurring more than once, with their occurrence counts
    ///
    /// Does not rely on the UNIQUE constraint, so it also checks tables
    /// populated outside the pipeline.
    pub async fn duplicate_order_ids(&self) -> Result<Vec<(i64, i64)>> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT order_id, COUNT(*) AS occurrences
            FROM sales
            GROUP BY order_id
            HAVING COUNT(*) > 1
            ORDER BY order_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All persisted records in insertion order
    pub async fn fetch_all(&self) -> Result<Vec<PersistedRecord>> {
        let records = sqlx::query_as::<_, PersistedRecord>(
            r#"
            SELECT id, order_id, order_item_id, quantity_ordered, item_price,
                   promotion_discount, total_sales, net_sale, region
            FROM sales
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

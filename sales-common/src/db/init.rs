//! Database initialization
//!
//! Opens (or creates) the SQLite database and makes sure the `sales` table
//! exists. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets aggregate readers see the last committed set while a reload
    // transaction is in flight
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_sales_table(&pool).await?;

    Ok(pool)
}

/// Create the sales table
///
/// `id` is a synthetic identity; AUTOINCREMENT keeps identities from being
/// reused after a full reload. `order_id` carries the uniqueness constraint.
pub async fn create_sales_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL UNIQUE,
            order_item_id INTEGER NOT NULL,
            quantity_ordered REAL NOT NULL,
            item_price REAL NOT NULL,
            promotion_discount REAL NOT NULL,
            total_sales REAL NOT NULL,
            net_sale REAL NOT NULL,
            region TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sales_region ON sales(region)")
        .execute(pool)
        .await?;

    Ok(())
}

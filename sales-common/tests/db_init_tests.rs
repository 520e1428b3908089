//! Tests for database initialization
//!
//! Covers automatic creation, reopening an existing database and the
//! constraints on the `sales` table.

use sales_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("sales.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sales.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    // Second open runs CREATE TABLE IF NOT EXISTS again
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_sales_table_created_empty() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("sales.db")).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_order_id_unique_constraint() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("sales.db")).await.unwrap();

    let insert = r#"
        INSERT INTO sales (order_id, order_item_id, quantity_ordered, item_price,
                           promotion_discount, total_sales, net_sale, region)
        VALUES (?, 1, 1.0, 10.0, 0.0, 10.0, 10.0, 'A')
    "#;

    sqlx::query(insert).bind(7_i64).execute(&pool).await.unwrap();
    let second = sqlx::query(insert).bind(7_i64).execute(&pool).await;

    assert!(second.is_err(), "Duplicate order_id should violate UNIQUE");
}

#[tokio::test]
async fn test_persisted_record_from_row() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("sales.db")).await.unwrap();

    sqlx::query(
        r#"
        INSERT INTO sales (order_id, order_item_id, quantity_ordered, item_price,
                           promotion_discount, total_sales, net_sale, region)
        VALUES (42, 3, 2.0, 5.5, 1.0, 11.0, 10.0, 'B')
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let record: sales_common::db::PersistedRecord = sqlx::query_as("SELECT * FROM sales")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(record.order_id, 42);
    assert_eq!(record.order_item_id, 3);
    assert_eq!(record.total_sales, 11.0);
    assert_eq!(record.net_sale, 10.0);
    assert_eq!(record.region, "B");
    assert!(record.id > 0);
}

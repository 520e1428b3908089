//! HTTP API handlers for sales-etl

pub mod health;
pub mod sales;

pub use health::health_routes;
pub use sales::{average_sales, check_duplicates, count_records, fetch_sales, total_sales_by_region};

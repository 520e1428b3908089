//! sales-etl library - regional sales transform/load pipeline
//!
//! Merges regional CSV exports, normalizes, deduplicates and validates the
//! order lines, replaces the persisted set atomically and serves aggregate
//! queries over it.

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod types;

pub use db::SalesStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Store handle for aggregate queries
    pub store: SalesStore,
}

impl AppState {
    /// Create new application state
    pub fn new(store: SalesStore) -> Self {
        Self { store }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/count_records", get(api::count_records))
        .route("/total_sales_by_region", get(api::total_sales_by_region))
        .route("/average_sales", get(api::average_sales))
        .route("/check_duplicates", get(api::check_duplicates))
        .route("/fetch_sales", get(api::fetch_sales))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

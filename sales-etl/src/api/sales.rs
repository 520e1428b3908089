//! Aggregate query endpoints
//!
//! Thin JSON wrappers over the store's aggregate queries. Response shapes
//! are fixed by the consumers of these endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;

use sales_common::db::PersistedRecord;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total_records: i64,
}

#[derive(Debug, Serialize)]
pub struct RegionTotalsResponse {
    pub total_sales_by_region: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct AverageResponse {
    /// `null` when no records are persisted
    pub average_sales_per_transaction: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DuplicatesResponse {
    /// `[OrderId, count]` pairs
    pub duplicate_orders: Vec<(i64, i64)>,
}

#[derive(Debug, Serialize)]
pub struct SalesListResponse {
    pub sales: Vec<PersistedRecord>,
}

/// GET /count_records
pub async fn count_records(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let total_records = state.store.count().await?;
    Ok(Json(CountResponse { total_records }))
}

/// GET /total_sales_by_region
pub async fn total_sales_by_region(
    State(state): State<AppState>,
) -> ApiResult<Json<RegionTotalsResponse>> {
    let total_sales_by_region = state.store.total_by_region().await?;
    Ok(Json(RegionTotalsResponse {
        total_sales_by_region,
    }))
}

/// GET /average_sales
pub async fn average_sales(State(state): State<AppState>) -> ApiResult<Json<AverageResponse>> {
    let average_sales_per_transaction = state.store.average_sale().await?;
    Ok(Json(AverageResponse {
        average_sales_per_transaction,
    }))
}

/// GET /check_duplicates
pub async fn check_duplicates(State(state): State<AppState>) -> ApiResult<Json<DuplicatesResponse>> {
    let duplicate_orders = state.store.duplicate_order_ids().await?;
    Ok(Json(DuplicatesResponse { duplicate_orders }))
}

/// GET /fetch_sales
pub async fn fetch_sales(State(state): State<AppState>) -> ApiResult<Json<SalesListResponse>> {
    let sales = state.store.fetch_all().await?;
    Ok(Json(SalesListResponse { sales }))
}

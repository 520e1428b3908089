//! Store handle for the persisted sales set
//!
//! `SalesStore` is passed explicitly to every pipeline run and to the HTTP
//! layer. It owns the load sink (`replace_all`) and the aggregate queries.

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use sales_common::Result;

mod aggregates;
mod load;

pub use load::LoadReport;

/// Handle to the `sales` table
#[derive(Clone)]
pub struct SalesStore {
    pool: SqlitePool,
    /// Serializes replace loads issued through this handle
    load_lock: Arc<Mutex<()>>,
}

impl SalesStore {
    /// Wrap an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            load_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open (or create) the database at `db_path` and ensure the schema exists
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = sales_common::db::init_database(db_path).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

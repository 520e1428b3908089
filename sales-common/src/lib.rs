//! # Sales Common Library
//!
//! Shared code for the sales ETL workspace including:
//! - Error taxonomy shared by the pipeline stages and the store
//! - Configuration loading and root folder resolution
//! - Database initialization and the persisted row model

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

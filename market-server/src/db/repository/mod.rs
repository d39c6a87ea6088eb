//! Repository Module
//!
//! Provides CRUD operations for the marketplace tables.

pub mod coupon;
pub mod food;
pub mod order;
pub mod store;

pub use coupon::CouponRepository;
pub use food::FoodRepository;
pub use order::OrderRepository;
pub use store::StoreRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

// =============================================================================
// ID Convention: "table:id" format end to end
// =============================================================================
//
// API callers may pass either the full "table:id" string or the bare key.
// A full id naming a different table is rejected.

/// Parse an id string into a RecordId for the given table
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    match id.split_once(':') {
        Some((t, key)) if t == table => Ok(RecordId::from_table_key(table, key)),
        Some(_) => Err(RepoError::Validation(format!(
            "Invalid {} id: {}",
            table, id
        ))),
        None => Ok(RecordId::from_table_key(table, id)),
    }
}

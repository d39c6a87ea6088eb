//! Food Model
//!
//! Catalog entries are read-only to the order workflow: orders snapshot the
//! price at creation time, so later edits never touch existing orders.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Food catalog entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in currency units (non-negative)
    pub price: f64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Created timestamp (milliseconds since epoch)
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create food payload (store is derived from the authenticated seller)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub price: f64,
    pub is_available: Option<bool>,
}

/// Update food payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

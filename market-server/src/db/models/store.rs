//! Store Model
//!
//! Stores are owned by seller accounts. The order workflow only needs the
//! owner linkage for scoping; the rest is descriptive data.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Owning seller's user id
    pub owner: String,
    pub name: String,
    pub address: String,
    pub open_hours: Option<String>,
    /// Created timestamp (milliseconds since epoch)
    #[serde(default)]
    pub created_at: i64,
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub owner: String,
    pub name: String,
    pub address: String,
    pub open_hours: Option<String>,
}

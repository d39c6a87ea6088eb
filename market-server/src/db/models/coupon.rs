//! Coupon Model
//!
//! A coupon is a usage-limited percentage discount. The `used_count` field
//! is mutated exclusively through the repository's atomic reserve/release
//! operations; nothing else may write it.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Coupon entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Unique code, stored uppercase
    pub code: String,
    /// Percentage discount (0-100)
    pub discount_percentage: f64,
    /// Optional cap on the absolute discount amount
    pub max_discount_amount: Option<f64>,
    /// Expiry timestamp (milliseconds since epoch)
    pub expires_at: i64,
    /// Maximum number of redemptions
    pub usage_limit: i64,
    /// Redemptions claimed so far (0 <= used_count <= usage_limit)
    #[serde(default)]
    pub used_count: i64,
    /// Minimum order total required to redeem
    #[serde(default)]
    pub minimum_order: f64,
    /// Created timestamp (milliseconds since epoch)
    #[serde(default)]
    pub created_at: i64,
}

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponCreate {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percentage: f64,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub max_discount_amount: Option<f64>,
    /// Expiry timestamp (milliseconds since epoch)
    pub expires_at: i64,
    #[validate(range(min = 1))]
    pub usage_limit: i64,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub minimum_order: Option<f64>,
}

/// Update coupon payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub max_discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub usage_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub minimum_order: Option<f64>,
}

/// Result of validating a coupon against an order total (no reservation)
#[derive(Debug, Clone, Serialize)]
pub struct CouponQuote {
    pub valid: bool,
    pub coupon: Coupon,
    pub discount: f64,
    pub final_price: f64,
}

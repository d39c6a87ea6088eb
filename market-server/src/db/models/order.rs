//! Order Model
//!
//! Orders store normalized references (customer id, store id, food ids) plus
//! a per-line price snapshot. Line items are immutable once the order is
//! created; only `status` changes afterwards.

use super::serde_helpers;
use crate::orders::OrderStatus;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One line of an order: food + quantity + price snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub food: RecordId,
    pub quantity: i32,
    /// Unit price at order time (immutable snapshot)
    pub price_each: f64,
    /// quantity * price_each
    pub subtotal: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Customer's user id
    pub customer: String,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub items: Vec<OrderItem>,
    /// Sum of line subtotals
    pub total_price: f64,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub coupon: Option<RecordId>,
    /// total_price minus applied discount (0 <= final_price <= total_price)
    pub final_price: f64,
    pub status: OrderStatus,
    /// Created timestamp (milliseconds since epoch)
    #[serde(default)]
    pub created_at: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested line item in a create-order call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub food_id: String,
    pub quantity: i32,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub store_id: String,
    pub items: Vec<OrderItemRequest>,
    pub coupon_code: Option<String>,
}

/// Status update payload (seller operation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// =============================================================================
// API Response Types (resolved view)
// =============================================================================

/// Store reference expanded for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: String,
    pub name: String,
}

/// Coupon reference expanded for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRef {
    pub id: String,
    pub code: String,
    pub discount_percentage: f64,
}

/// Line item with the food name joined in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub food_id: String,
    pub food_name: String,
    pub quantity: i32,
    pub price_each: f64,
    pub subtotal: f64,
}

/// Fully resolved order view returned by the API
///
/// Storage stays normalized; this view is produced by an explicit read-join
/// after the order record is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: String,
    pub customer: String,
    pub store: StoreRef,
    pub items: Vec<OrderItemDetail>,
    pub total_price: f64,
    pub coupon: Option<CouponRef>,
    pub final_price: f64,
    pub status: OrderStatus,
    pub created_at: i64,
}

//! Database Models
//!
//! Entity structs and request/response payloads for the marketplace tables.

pub mod serde_helpers;

pub mod coupon;
pub mod food;
pub mod order;
pub mod store;

pub use coupon::{Coupon, CouponCreate, CouponQuote, CouponUpdate};
pub use food::{Food, FoodCreate, FoodUpdate};
pub use order::{
    CouponRef, CreateOrderRequest, Order, OrderDetail, OrderItem, OrderItemDetail,
    OrderItemRequest, StoreRef, UpdateStatusRequest,
};
pub use store::{Store, StoreCreate};

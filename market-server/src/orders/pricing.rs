//! Pricing Engine
//!
//! Resolves requested line items against the food catalog and computes the
//! order total. Prices are snapshotted per line so later catalog edits never
//! change an existing order. Read-only; no side effects.

use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use crate::db::models::{OrderItem, OrderItemRequest};
use crate::db::repository::FoodRepository;
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// Result of pricing a cart: resolved line items plus the order total
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub items: Vec<OrderItem>,
    pub total_price: f64,
}

/// Pricing engine over the read-only food catalog
#[derive(Clone)]
pub struct PricingEngine {
    foods: FoodRepository,
}

impl PricingEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            foods: FoodRepository::new(db),
        }
    }

    /// Resolve and price the requested items for a single store.
    ///
    /// Enforces, per item:
    /// - quantity must be positive
    /// - the food must exist
    /// - the food must belong to `store` (single-store-per-order invariant)
    /// - the food must be available
    pub async fn price_items(
        &self,
        store: &RecordId,
        requested: &[OrderItemRequest],
    ) -> AppResult<PricedCart> {
        let mut items = Vec::with_capacity(requested.len());
        let mut total = Decimal::ZERO;

        for request in requested {
            if request.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "Quantity must be a positive integer for food {}",
                    request.food_id
                )));
            }

            let food = self
                .foods
                .find_by_id(&request.food_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Food {} not found", request.food_id))
                })?;

            if food.store != *store {
                return Err(AppError::Validation(
                    "All items must be from the same store".to_string(),
                ));
            }

            if !food.is_available {
                return Err(AppError::Validation(format!(
                    "{} is not available",
                    food.name
                )));
            }

            let food_id = food
                .id
                .ok_or_else(|| AppError::Internal("Food record has no id".to_string()))?;

            let subtotal = money::line_subtotal(food.price, request.quantity);
            total += money::to_decimal(subtotal);

            items.push(OrderItem {
                food: food_id,
                quantity: request.quantity,
                price_each: food.price,
                subtotal,
            });
        }

        Ok(PricedCart {
            items,
            total_price: money::to_f64(total),
        })
    }
}

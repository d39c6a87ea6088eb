//! Order Orchestrator
//!
//! Coordinates catalog lookup, pricing, coupon validation/reservation, state
//! transitions and persistence into one workflow. Authorization (who may see
//! or mutate which order) is part of this component's contract, not the HTTP
//! layer's.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{CurrentUser, Role};
use crate::db::models::{
    CouponRef, CreateOrderRequest, Order, OrderDetail, OrderItemDetail, StoreRef,
};
use crate::db::repository::{
    CouponRepository, FoodRepository, OrderRepository, StoreRepository, parse_record_id,
};
use crate::orders::{CouponLedger, OrderStatus, PricingEngine};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    stores: StoreRepository,
    foods: FoodRepository,
    coupons: CouponRepository,
    pricing: PricingEngine,
    ledger: CouponLedger,
}

impl OrderService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            stores: StoreRepository::new(db.clone()),
            foods: FoodRepository::new(db.clone()),
            coupons: CouponRepository::new(db.clone()),
            pricing: PricingEngine::new(db.clone()),
            ledger: CouponLedger::new(db),
        }
    }

    /// Create an order: price the cart, optionally redeem a coupon, persist
    /// with status `pending`.
    ///
    /// Either every step succeeds or nothing is persisted: when the insert
    /// fails after a coupon use was reserved, the reservation is released
    /// before the error propagates.
    pub async fn create_order(
        &self,
        user: &CurrentUser,
        request: CreateOrderRequest,
    ) -> AppResult<OrderDetail> {
        if user.role != Role::Customer {
            return Err(AppError::Forbidden(
                "Access denied. Customer role required.".to_string(),
            ));
        }

        if request.items.is_empty() {
            return Err(AppError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let store_id = parse_record_id("store", &request.store_id)?;
        let cart = self.pricing.price_items(&store_id, &request.items).await?;

        let (final_price, coupon_id) = match request.coupon_code.as_deref() {
            Some(code) => {
                let quote = self.ledger.quote(code, cart.total_price).await?;
                let coupon_id = quote
                    .coupon
                    .id
                    .ok_or_else(|| AppError::Internal("Coupon record has no id".to_string()))?;
                self.ledger.reserve(&coupon_id).await?;
                (quote.final_price, Some(coupon_id))
            }
            None => (cart.total_price, None),
        };

        let order = Order {
            id: None,
            customer: user.id.clone(),
            store: store_id,
            items: cart.items,
            total_price: cart.total_price,
            coupon: coupon_id.clone(),
            final_price,
            status: OrderStatus::Pending,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created = match self.orders.create(order).await {
            Ok(created) => created,
            Err(e) => {
                // Compensating release: no reservation may outlive a failed
                // order insert
                if let Some(ref coupon_id) = coupon_id
                    && let Err(release_err) = self.ledger.release(coupon_id).await
                {
                    tracing::error!(
                        coupon = %coupon_id,
                        error = %release_err,
                        "Failed to release coupon after order insert failure"
                    );
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            customer = %created.customer,
            total_price = created.total_price,
            final_price = created.final_price,
            "Order created"
        );

        self.resolve(created).await
    }

    /// Fetch a single order, enforcing view authorization
    pub async fn get_order(&self, user: &CurrentUser, id: &str) -> AppResult<OrderDetail> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        self.authorize_view(user, &order).await?;
        self.resolve(order).await
    }

    /// List orders visible to the requester, optionally filtered by status.
    ///
    /// Customers see their own orders, sellers their store's, admins all.
    pub async fn list_orders(
        &self,
        user: &CurrentUser,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<OrderDetail>> {
        let (customer, store) = match user.role {
            Role::Customer => (Some(user.id.clone()), None),
            Role::Seller => match self.stores.find_by_owner(&user.id).await? {
                Some(store) => (None, store.id),
                // A seller without a store has no orders to see
                None => return Ok(Vec::new()),
            },
            Role::Admin => (None, None),
        };

        let orders = self.orders.find_scoped(customer, store, status).await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.resolve(order).await?);
        }
        Ok(details)
    }

    /// Seller-triggered status update, constrained to legal transitions
    pub async fn update_status(
        &self,
        user: &CurrentUser,
        id: &str,
        status: &str,
    ) -> AppResult<OrderDetail> {
        if user.role != Role::Seller {
            return Err(AppError::Forbidden(
                "Access denied. Seller role required.".to_string(),
            ));
        }

        let next: OrderStatus = status.parse()?;

        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let store = self.stores.find_by_owner(&user.id).await?;
        let owns_order = store
            .as_ref()
            .and_then(|s| s.id.as_ref())
            .is_some_and(|store_id| *store_id == order.store);
        if !owns_order {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        if !order.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Cannot change status from {} to {}",
                order.status, next
            )));
        }

        self.transition(order, next).await
    }

    /// Customer-triggered cancellation, permitted only while pending
    pub async fn cancel_order(&self, user: &CurrentUser, id: &str) -> AppResult<OrderDetail> {
        if user.role != Role::Customer {
            return Err(AppError::Forbidden(
                "Access denied. Customer role required.".to_string(),
            ));
        }

        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if order.customer != user.id {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        if order.status != OrderStatus::Pending {
            return Err(AppError::Validation(
                "Can only cancel pending orders".to_string(),
            ));
        }

        self.transition(order, OrderStatus::Cancelled).await
    }

    /// Apply a status transition and its side effects.
    ///
    /// Entering `cancelled` returns the coupon reservation made at creation.
    /// Cancelled is terminal, so the release can run at most once per order.
    async fn transition(&self, order: Order, next: OrderStatus) -> AppResult<OrderDetail> {
        let order_id = order
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("Order record has no id".to_string()))?;

        let updated = self.orders.update_status(&order_id, next).await?;

        if next == OrderStatus::Cancelled
            && let Some(ref coupon_id) = updated.coupon
        {
            self.ledger.release(coupon_id).await?;
            tracing::info!(order = %order_id, coupon = %coupon_id, "Coupon use released");
        }

        self.resolve(updated).await
    }

    async fn authorize_view(&self, user: &CurrentUser, order: &Order) -> AppResult<()> {
        match user.role {
            Role::Admin => Ok(()),
            Role::Customer => {
                if order.customer == user.id {
                    Ok(())
                } else {
                    Err(AppError::Forbidden("Access denied".to_string()))
                }
            }
            Role::Seller => {
                let store = self.stores.find_by_owner(&user.id).await?;
                let owns_order = store
                    .as_ref()
                    .and_then(|s| s.id.as_ref())
                    .is_some_and(|store_id| *store_id == order.store);
                if owns_order {
                    Ok(())
                } else {
                    Err(AppError::Forbidden("Access denied".to_string()))
                }
            }
        }
    }

    /// Expand the stored order's references into the view returned to
    /// callers. Storage stays normalized; this is an explicit read-join.
    async fn resolve(&self, order: Order) -> AppResult<OrderDetail> {
        let store_id = order.store.to_string();
        let store_name = self
            .stores
            .find_by_id(&store_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_default();

        let coupon = match &order.coupon {
            Some(coupon_id) => self
                .coupons
                .find_by_id(&coupon_id.to_string())
                .await?
                .map(|c| CouponRef {
                    id: coupon_id.to_string(),
                    code: c.code,
                    discount_percentage: c.discount_percentage,
                }),
            None => None,
        };

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let food_id = item.food.to_string();
            let food_name = self
                .foods
                .find_by_id(&food_id)
                .await?
                .map(|f| f.name)
                .unwrap_or_default();
            items.push(OrderItemDetail {
                food_id,
                food_name,
                quantity: item.quantity,
                price_each: item.price_each,
                subtotal: item.subtotal,
            });
        }

        Ok(OrderDetail {
            id: order
                .id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            customer: order.customer,
            store: StoreRef {
                id: store_id,
                name: store_name,
            },
            items,
            total_price: order.total_price,
            coupon,
            final_price: order.final_price,
            status: order.status,
            created_at: order.created_at,
        })
    }
}

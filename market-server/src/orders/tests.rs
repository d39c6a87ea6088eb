//! Order workflow tests
//!
//! End-to-end exercises of the orchestrator against an in-memory database:
//! creation, coupon redemption, cancellation reconciliation, status
//! transitions and scoped listing.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{CurrentUser, Role};
use crate::db::DbService;
use crate::db::models::{
    CouponCreate, CreateOrderRequest, FoodCreate, OrderItemRequest, StoreCreate,
};
use crate::db::repository::{CouponRepository, FoodRepository, StoreRepository};
use crate::orders::{OrderService, OrderStatus};
use crate::utils::AppError;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

struct Fixture {
    db: Surreal<Db>,
    service: OrderService,
    coupons: CouponRepository,
    store1: RecordId,
    store2: RecordId,
    /// 10.00, available, store1
    pasta: String,
    /// 7.00, available, store2
    burger: String,
}

fn customer(name: &str) -> CurrentUser {
    CurrentUser {
        id: format!("user:{name}"),
        username: name.to_string(),
        role: Role::Customer,
    }
}

fn seller(name: &str) -> CurrentUser {
    CurrentUser {
        id: format!("user:{name}"),
        username: name.to_string(),
        role: Role::Seller,
    }
}

fn admin(name: &str) -> CurrentUser {
    CurrentUser {
        id: format!("user:{name}"),
        username: name.to_string(),
        role: Role::Admin,
    }
}

async fn setup() -> Fixture {
    let db = DbService::open_in_memory().await.unwrap().db;
    let stores = StoreRepository::new(db.clone());
    let foods = FoodRepository::new(db.clone());

    let store1 = stores
        .create(StoreCreate {
            owner: "user:seller1".into(),
            name: "Pasta Place".into(),
            address: "1 Main St".into(),
            open_hours: None,
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let store2 = stores
        .create(StoreCreate {
            owner: "user:seller2".into(),
            name: "Burger Barn".into(),
            address: "2 Main St".into(),
            open_hours: None,
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let pasta = foods
        .create(
            store1.clone(),
            FoodCreate {
                name: "Carbonara".into(),
                description: None,
                price: 10.0,
                is_available: Some(true),
            },
        )
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let burger = foods
        .create(
            store2.clone(),
            FoodCreate {
                name: "Cheeseburger".into(),
                description: None,
                price: 7.0,
                is_available: Some(true),
            },
        )
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    Fixture {
        service: OrderService::new(db.clone()),
        coupons: CouponRepository::new(db.clone()),
        db,
        store1,
        store2,
        pasta,
        burger,
    }
}

impl Fixture {
    async fn seed_save20(&self) -> RecordId {
        self.coupons
            .create(CouponCreate {
                code: "SAVE20".into(),
                discount_percentage: 20.0,
                max_discount_amount: Some(5.0),
                expires_at: chrono::Utc::now().timestamp_millis() + DAY_MS,
                usage_limit: 1,
                minimum_order: Some(20.0),
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    fn pasta_order(&self, quantity: i32, coupon_code: Option<&str>) -> CreateOrderRequest {
        CreateOrderRequest {
            store_id: self.store1.to_string(),
            items: vec![OrderItemRequest {
                food_id: self.pasta.clone(),
                quantity,
            }],
            coupon_code: coupon_code.map(str::to_string),
        }
    }

    async fn used_count(&self, id: &RecordId) -> i64 {
        self.coupons
            .find_by_id(&id.to_string())
            .await
            .unwrap()
            .unwrap()
            .used_count
    }
}

// ========================================================================
// Creation
// ========================================================================

#[tokio::test]
async fn test_create_order_snapshots_prices() {
    let fx = setup().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(3, None))
        .await
        .unwrap();

    assert_eq!(order.total_price, 30.0);
    assert_eq!(order.final_price, 30.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].price_each, 10.0);
    assert_eq!(order.items[0].subtotal, 30.0);
    assert_eq!(order.items[0].food_name, "Carbonara");
    assert_eq!(order.store.name, "Pasta Place");
    assert!(order.coupon.is_none());
}

#[tokio::test]
async fn test_create_order_price_snapshot_survives_catalog_edit() {
    let fx = setup().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(2, None))
        .await
        .unwrap();

    // Raise the catalog price after the fact
    FoodRepository::new(fx.db.clone())
        .update(
            &fx.pasta,
            crate::db::models::FoodUpdate {
                name: None,
                description: None,
                price: Some(99.0),
                is_available: None,
            },
        )
        .await
        .unwrap();

    let fetched = fx.service.get_order(&alice, &order.id).await.unwrap();
    assert_eq!(fetched.items[0].price_each, 10.0);
    assert_eq!(fetched.total_price, 20.0);
}

#[tokio::test]
async fn test_create_order_with_coupon_reserves_use() {
    let fx = setup().await;
    let coupon_id = fx.seed_save20().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(3, Some("SAVE20")))
        .await
        .unwrap();

    // 20% of 30.00 = 6.00, clamped to the 5.00 cap
    assert_eq!(order.total_price, 30.0);
    assert_eq!(order.final_price, 25.0);
    assert_eq!(order.coupon.as_ref().unwrap().code, "SAVE20");
    assert_eq!(fx.used_count(&coupon_id).await, 1);
}

#[tokio::test]
async fn test_create_order_second_redemption_fails() {
    let fx = setup().await;
    let coupon_id = fx.seed_save20().await;
    let alice = customer("alice");
    let bob = customer("bob");

    fx.service
        .create_order(&alice, fx.pasta_order(3, Some("SAVE20")))
        .await
        .unwrap();

    let err = fx
        .service
        .create_order(&bob, fx.pasta_order(3, Some("SAVE20")))
        .await
        .unwrap_err();

    match err {
        AppError::Validation(msg) => assert_eq!(msg, "Coupon usage limit reached"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(fx.used_count(&coupon_id).await, 1);
}

#[tokio::test]
async fn test_create_order_empty_items_rejected() {
    let fx = setup().await;
    let err = fx
        .service
        .create_order(
            &customer("alice"),
            CreateOrderRequest {
                store_id: fx.store1.to_string(),
                items: vec![],
                coupon_code: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_order_requires_customer_role() {
    let fx = setup().await;
    for user in [seller("seller1"), admin("root")] {
        let err = fx
            .service
            .create_order(&user, fx.pasta_order(1, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}

#[tokio::test]
async fn test_cross_store_order_leaves_nothing_behind() {
    let fx = setup().await;
    let coupon_id = fx.seed_save20().await;
    let alice = customer("alice");

    let err = fx
        .service
        .create_order(
            &alice,
            CreateOrderRequest {
                store_id: fx.store1.to_string(),
                items: vec![
                    OrderItemRequest {
                        food_id: fx.pasta.clone(),
                        quantity: 2,
                    },
                    OrderItemRequest {
                        food_id: fx.burger.clone(),
                        quantity: 1,
                    },
                ],
                coupon_code: Some("SAVE20".into()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    // Pricing failed before the coupon step: nothing reserved, nothing stored
    assert_eq!(fx.used_count(&coupon_id).await, 0);
    assert!(fx.service.list_orders(&alice, None).await.unwrap().is_empty());
}

// ========================================================================
// Cancellation
// ========================================================================

#[tokio::test]
async fn test_cancel_pending_order_releases_coupon() {
    let fx = setup().await;
    let coupon_id = fx.seed_save20().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(3, Some("SAVE20")))
        .await
        .unwrap();
    assert_eq!(fx.used_count(&coupon_id).await, 1);

    let cancelled = fx.service.cancel_order(&alice, &order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(fx.used_count(&coupon_id).await, 0);

    // Items and totals are untouched by the transition
    assert_eq!(cancelled.total_price, 30.0);
    assert_eq!(cancelled.final_price, 25.0);
    assert_eq!(cancelled.items.len(), 1);
}

#[tokio::test]
async fn test_cancel_non_pending_order_rejected() {
    let fx = setup().await;
    let alice = customer("alice");
    let owner = seller("seller1");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();
    fx.service
        .update_status(&owner, &order.id, "paid")
        .await
        .unwrap();

    let err = fx.service.cancel_order(&alice, &order.id).await.unwrap_err();
    match err {
        AppError::Validation(msg) => assert_eq!(msg, "Can only cancel pending orders"),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_foreign_order_rejected() {
    let fx = setup().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();

    let err = fx
        .service
        .cancel_order(&customer("mallory"), &order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

// ========================================================================
// Status transitions
// ========================================================================

#[tokio::test]
async fn test_seller_walks_order_through_lifecycle() {
    let fx = setup().await;
    let alice = customer("alice");
    let owner = seller("seller1");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();

    let paid = fx
        .service
        .update_status(&owner, &order.id, "paid")
        .await
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);

    let done = fx
        .service
        .update_status(&owner, &order.id, "completed")
        .await
        .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);

    // Terminal: no further transitions
    let err = fx
        .service
        .update_status(&owner, &order.id, "pending")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_unknown_status_value_rejected() {
    let fx = setup().await;
    let alice = customer("alice");
    let owner = seller("seller1");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();

    let err = fx
        .service
        .update_status(&owner, &order.id, "shipped")
        .await
        .unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("Invalid status")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_status_requires_owning_seller() {
    let fx = setup().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();

    // Another store's seller
    let err = fx
        .service
        .update_status(&seller("seller2"), &order.id, "paid")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // A customer cannot use the seller operation at all
    let err = fx
        .service
        .update_status(&alice, &order.id, "paid")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_seller_cancellation_also_releases_coupon() {
    let fx = setup().await;
    let coupon_id = fx.seed_save20().await;
    let alice = customer("alice");
    let owner = seller("seller1");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(3, Some("SAVE20")))
        .await
        .unwrap();

    let cancelled = fx
        .service
        .update_status(&owner, &order.id, "cancelled")
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(fx.used_count(&coupon_id).await, 0);
}

// ========================================================================
// Retrieval and listing
// ========================================================================

#[tokio::test]
async fn test_get_order_scoping() {
    let fx = setup().await;
    let alice = customer("alice");

    let order = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();

    // Owner, owning seller and admin can read it
    fx.service.get_order(&alice, &order.id).await.unwrap();
    fx.service.get_order(&seller("seller1"), &order.id).await.unwrap();
    fx.service.get_order(&admin("root"), &order.id).await.unwrap();

    // Other customers and other sellers cannot
    let err = fx
        .service
        .get_order(&customer("bob"), &order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = fx
        .service
        .get_order(&seller("seller2"), &order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_get_missing_order_is_not_found() {
    let fx = setup().await;
    let err = fx
        .service
        .get_order(&admin("root"), "orders:missing")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_list_orders_role_scoping() {
    let fx = setup().await;
    let alice = customer("alice");
    let bob = customer("bob");

    fx.service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();
    fx.service
        .create_order(&bob, fx.pasta_order(2, None))
        .await
        .unwrap();
    fx.service
        .create_order(
            &bob,
            CreateOrderRequest {
                store_id: fx.store2.to_string(),
                items: vec![OrderItemRequest {
                    food_id: fx.burger.clone(),
                    quantity: 1,
                }],
                coupon_code: None,
            },
        )
        .await
        .unwrap();

    // Customers see only their own
    assert_eq!(fx.service.list_orders(&alice, None).await.unwrap().len(), 1);
    assert_eq!(fx.service.list_orders(&bob, None).await.unwrap().len(), 2);

    // Sellers see only their store's
    assert_eq!(
        fx.service.list_orders(&seller("seller1"), None).await.unwrap().len(),
        2
    );
    assert_eq!(
        fx.service.list_orders(&seller("seller2"), None).await.unwrap().len(),
        1
    );

    // A seller without a store sees nothing
    assert!(
        fx.service
            .list_orders(&seller("no_store"), None)
            .await
            .unwrap()
            .is_empty()
    );

    // Admins see everything
    assert_eq!(
        fx.service.list_orders(&admin("root"), None).await.unwrap().len(),
        3
    );
}

#[tokio::test]
async fn test_list_orders_status_filter() {
    let fx = setup().await;
    let alice = customer("alice");

    let first = fx
        .service
        .create_order(&alice, fx.pasta_order(1, None))
        .await
        .unwrap();
    fx.service
        .create_order(&alice, fx.pasta_order(2, None))
        .await
        .unwrap();
    fx.service.cancel_order(&alice, &first.id).await.unwrap();

    let pending = fx
        .service
        .list_orders(&alice, Some(OrderStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let cancelled = fx
        .service
        .list_orders(&alice, Some(OrderStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, first.id);
}

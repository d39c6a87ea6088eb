//! HTTP-level order workflow test
//!
//! Drives the full router (auth extractor included) against an in-memory
//! database: create, list, status update, cancel, plus the public coupon
//! validate endpoint.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use market_server::api::build_app;
use market_server::auth::JwtConfig;
use market_server::db::models::{CouponCreate, FoodCreate, StoreCreate};
use market_server::db::repository::{CouponRepository, FoodRepository, StoreRepository};
use market_server::{Config, Role, ServerState};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

struct TestApp {
    app: Router,
    state: ServerState,
    store_id: String,
    food_id: String,
}

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/market-test".into(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-integration!".into(),
            expiration_minutes: 60,
            issuer: "market-server".into(),
            audience: "market-clients".into(),
        },
        environment: "development".into(),
    }
}

async fn setup() -> TestApp {
    let state = ServerState::initialize_in_memory(&test_config())
        .await
        .unwrap();

    let store = StoreRepository::new(state.get_db())
        .create(StoreCreate {
            owner: "user:seller1".into(),
            name: "Pasta Place".into(),
            address: "1 Main St".into(),
            open_hours: None,
        })
        .await
        .unwrap();
    let store_id = store.id.unwrap().to_string();

    let food = FoodRepository::new(state.get_db())
        .create(
            store_id.parse().unwrap(),
            FoodCreate {
                name: "Carbonara".into(),
                description: None,
                price: 10.0,
                is_available: Some(true),
            },
        )
        .await
        .unwrap();
    let food_id = food.id.unwrap().to_string();

    CouponRepository::new(state.get_db())
        .create(CouponCreate {
            code: "SAVE20".into(),
            discount_percentage: 20.0,
            max_discount_amount: Some(5.0),
            expires_at: chrono::Utc::now().timestamp_millis() + DAY_MS,
            usage_limit: 1,
            minimum_order: Some(20.0),
        })
        .await
        .unwrap();

    TestApp {
        app: build_app(&state),
        state,
        store_id,
        food_id,
    }
}

impl TestApp {
    fn token(&self, user_id: &str, role: Role) -> String {
        self.state
            .get_jwt_service()
            .generate_token(user_id, user_id, role)
            .unwrap()
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let t = setup().await;
    let (status, body) = t.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_orders_require_authentication() {
    let t = setup().await;
    let (status, _) = t.request("GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seller_cannot_create_order() {
    let t = setup().await;
    let token = t.token("user:seller1", Role::Seller);
    let (status, _) = t
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "store_id": t.store_id,
                "items": [{"food_id": t.food_id, "quantity": 1}],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_coupon_validate_is_public() {
    let t = setup().await;
    let (status, body) = t
        .request(
            "POST",
            "/api/coupons/validate",
            None,
            Some(json!({"code": "save20", "order_total": 30.0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["discount"], 5.0);
    assert_eq!(body["final_price"], 25.0);
}

#[tokio::test]
async fn test_full_order_workflow() {
    let t = setup().await;
    let alice = t.token("user:alice", Role::Customer);
    let seller = t.token("user:seller1", Role::Seller);

    // Create: 3 x 10.00 with SAVE20 => 30.00 total, 25.00 final
    let (status, order) = t
        .request(
            "POST",
            "/api/orders",
            Some(&alice),
            Some(json!({
                "store_id": t.store_id,
                "items": [{"food_id": t.food_id, "quantity": 3}],
                "coupon_code": "SAVE20",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_price"], 30.0);
    assert_eq!(order["final_price"], 25.0);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["store"]["name"], "Pasta Place");
    let order_id = order["id"].as_str().unwrap().to_string();

    // The coupon is exhausted now
    let (status, _) = t
        .request(
            "POST",
            "/api/coupons/validate",
            None,
            Some(json!({"code": "SAVE20", "order_total": 30.0})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Seller sees the order in their scoped listing
    let (status, list) = t.request("GET", "/api/orders", Some(&seller), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Foreign customer cannot read it
    let bob = t.token("user:bob", Role::Customer);
    let (status, _) = t
        .request("GET", &format!("/api/orders/{order_id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Customer cancels while pending; the coupon use is returned
    let (status, cancelled) = t
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/cancel"),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, quote) = t
        .request(
            "POST",
            "/api/coupons/validate",
            None,
            Some(json!({"code": "SAVE20", "order_total": 30.0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["coupon"]["used_count"], 0);

    // Cancelled is terminal: the seller cannot move it anywhere
    let (status, _) = t
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&seller),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_update_rejects_unknown_value() {
    let t = setup().await;
    let alice = t.token("user:alice", Role::Customer);
    let seller = t.token("user:seller1", Role::Seller);

    let (_, order) = t
        .request(
            "POST",
            "/api/orders",
            Some(&alice),
            Some(json!({
                "store_id": t.store_id,
                "items": [{"food_id": t.food_id, "quantity": 1}],
            })),
        )
        .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, body) = t
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&seller),
            Some(json!({"status": "shipped"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid status"));
}

#[tokio::test]
async fn test_duplicate_coupon_code_rejected() {
    let t = setup().await;
    let seller = t.token("user:seller1", Role::Seller);

    let (status, body) = t
        .request(
            "POST",
            "/api/coupons",
            Some(&seller),
            Some(json!({
                "code": "save20",
                "discount_percentage": 10.0,
                "expires_at": chrono::Utc::now().timestamp_millis() + DAY_MS,
                "usage_limit": 10,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

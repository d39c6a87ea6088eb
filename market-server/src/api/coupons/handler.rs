//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Coupon, CouponCreate, CouponQuote, CouponUpdate};
use crate::db::repository::CouponRepository;
use crate::orders::CouponLedger;
use crate::utils::{AppError, AppResult};

fn require_seller(user: &CurrentUser) -> AppResult<()> {
    if !user.is_seller() {
        return Err(AppError::Forbidden(
            "Access denied. Seller role required.".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/coupons - create coupon (seller only)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CouponCreate>,
) -> AppResult<(StatusCode, Json<Coupon>)> {
    require_seller(&user)?;
    payload.validate()?;

    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// GET /api/coupons - all coupons (seller only)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Coupon>>> {
    require_seller(&user)?;

    let repo = CouponRepository::new(state.get_db());
    let coupons = repo.find_all().await?;
    Ok(Json(coupons))
}

/// GET /api/coupons/active - public list of redeemable coupons
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<Coupon>>> {
    let repo = CouponRepository::new(state.get_db());
    let now = chrono::Utc::now().timestamp_millis();
    let coupons = repo.find_active(now).await?;
    Ok(Json(coupons))
}

/// Validate coupon payload
#[derive(Debug, Deserialize)]
pub struct ValidateCouponRequest {
    pub code: String,
    pub order_total: f64,
}

/// POST /api/coupons/validate - public quote without reservation
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateCouponRequest>,
) -> AppResult<Json<CouponQuote>> {
    let ledger = CouponLedger::new(state.get_db());
    let quote = ledger.quote(&payload.code, payload.order_total).await?;
    Ok(Json(quote))
}

/// GET /api/coupons/:id (seller only)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Coupon>> {
    require_seller(&user)?;

    let repo = CouponRepository::new(state.get_db());
    let coupon = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Coupon {} not found", id)))?;
    Ok(Json(coupon))
}

/// PUT /api/coupons/:id (seller only)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<Coupon>> {
    require_seller(&user)?;
    payload.validate()?;

    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.update(&id, payload).await?;
    Ok(Json(coupon))
}

/// DELETE /api/coupons/:id (seller only)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    require_seller(&user)?;

    let repo = CouponRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Coupon {} not found", id)));
    }
    Ok(Json(true))
}

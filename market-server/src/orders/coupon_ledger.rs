//! Coupon Ledger
//!
//! Validates coupon codes against an order total and tracks usage through
//! the repository's atomic counter operations. `quote` is read-only and also
//! backs the public validate endpoint; `reserve`/`release` claim and return
//! a single use.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use crate::db::models::{Coupon, CouponQuote};
use crate::db::repository::CouponRepository;
use crate::orders::money;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct CouponLedger {
    coupons: CouponRepository,
}

impl CouponLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            coupons: CouponRepository::new(db),
        }
    }

    /// Validate a coupon code against an order total without reserving a use.
    ///
    /// Checks run in order: existence, expiry, usage limit, minimum order.
    /// The discount is `total * percentage / 100`, clamped to
    /// `max_discount_amount` when set.
    pub async fn quote(&self, code: &str, order_total: f64) -> AppResult<CouponQuote> {
        let coupon = self
            .coupons
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid coupon code".to_string()))?;

        let now = chrono::Utc::now().timestamp_millis();
        if now > coupon.expires_at {
            return Err(AppError::Validation("Coupon has expired".to_string()));
        }

        if coupon.used_count >= coupon.usage_limit {
            return Err(AppError::Validation(
                "Coupon usage limit reached".to_string(),
            ));
        }

        if order_total < coupon.minimum_order {
            return Err(AppError::Validation(format!(
                "Minimum order amount is {}",
                coupon.minimum_order
            )));
        }

        let discount = money::percentage_discount(
            order_total,
            coupon.discount_percentage,
            coupon.max_discount_amount,
        );
        let final_price = money::apply_discount(order_total, discount);

        Ok(CouponQuote {
            valid: true,
            coupon,
            discount,
            final_price,
        })
    }

    /// Claim one use of a coupon.
    ///
    /// The quote/reserve pair is not a transaction: another request may take
    /// the last use between the two calls. The conditional update inside
    /// `reserve_use` is what actually guarantees the limit, so a lost race
    /// surfaces here as "usage limit reached" rather than as an overrun.
    pub async fn reserve(&self, id: &RecordId) -> AppResult<Coupon> {
        self.coupons
            .reserve_use(id)
            .await?
            .ok_or_else(|| AppError::Validation("Coupon usage limit reached".to_string()))
    }

    /// Return one use of a coupon (order cancellation).
    ///
    /// Never drives the counter below zero; a vanished coupon is not an
    /// error.
    pub async fn release(&self, id: &RecordId) -> AppResult<()> {
        self.coupons.release_use(id).await?;
        Ok(())
    }
}

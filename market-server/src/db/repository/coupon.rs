//! Coupon Repository
//!
//! CRUD plus the two atomic counter operations the ledger is built on.
//! `used_count` is only ever written through `reserve_use` / `release_use`,
//! each a single conditional UPDATE statement so concurrent redemptions can
//! never push the counter past `usage_limit` (or below zero).

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Coupon, CouponCreate, CouponUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all coupons, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(coupons)
    }

    /// Find coupons that are not expired and still have usage remaining
    pub async fn find_active(&self, now: i64) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE expires_at > $now AND used_count < usage_limit ORDER BY created_at DESC")
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(coupons)
    }

    /// Find coupon by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Coupon>> {
        let record_id = parse_record_id(TABLE, id)?;
        let coupon: Option<Coupon> = self.base.db().select(record_id).await?;
        Ok(coupon)
    }

    /// Find coupon by code (codes are stored uppercase)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        let code_owned = code.to_uppercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code LIMIT 1")
            .bind(("code", code_owned))
            .await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        Ok(coupons.into_iter().next())
    }

    /// Create a new coupon
    pub async fn create(&self, data: CouponCreate) -> RepoResult<Coupon> {
        let code = data.code.to_uppercase();

        // Explicit duplicate check instead of relying on storage-layer
        // uniqueness errors
        if self.find_by_code(&code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Coupon code '{}' already exists",
                code
            )));
        }

        let coupon = Coupon {
            id: None,
            code,
            discount_percentage: data.discount_percentage,
            max_discount_amount: data.max_discount_amount,
            expires_at: data.expires_at,
            usage_limit: data.usage_limit,
            used_count: 0,
            minimum_order: data.minimum_order.unwrap_or(0.0),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<Coupon> = self.base.db().create(TABLE).content(coupon).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    /// Update a coupon
    pub async fn update(&self, id: &str, mut data: CouponUpdate) -> RepoResult<Coupon> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing: Option<Coupon> = self.base.db().select(record_id.clone()).await?;
        let existing =
            existing.ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))?;

        // Check duplicate code if changing
        if let Some(ref new_code) = data.code {
            let new_code = new_code.to_uppercase();
            if new_code != existing.code && self.find_by_code(&new_code).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "Coupon code '{}' already exists",
                    new_code
                )));
            }
            data.code = Some(new_code);
        }

        self.base
            .db()
            .query("UPDATE $coupon MERGE $data")
            .bind(("coupon", record_id.clone()))
            .bind(("data", data))
            .await?;

        let coupon: Option<Coupon> = self.base.db().select(record_id).await?;
        coupon.ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))
    }

    /// Hard delete a coupon
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<Coupon> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }

    /// Atomically claim one use of a coupon.
    ///
    /// The increment is conditional on `used_count < usage_limit` within a
    /// single statement, so a read-modify-write race cannot overrun the
    /// limit. Returns the updated coupon, or `None` when the limit is
    /// already reached (or the coupon no longer exists).
    pub async fn reserve_use(&self, id: &RecordId) -> RepoResult<Option<Coupon>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $coupon SET used_count += 1 WHERE used_count < usage_limit")
            .bind(("coupon", id.clone()))
            .await?;
        let updated: Vec<Coupon> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Atomically return one use of a coupon (order cancellation).
    ///
    /// Conditional on `used_count > 0` so the counter never goes negative.
    /// A missing coupon is tolerated: orders keep a weak reference that may
    /// outlive the coupon record.
    pub async fn release_use(&self, id: &RecordId) -> RepoResult<Option<Coupon>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $coupon SET used_count -= 1 WHERE used_count > 0")
            .bind(("coupon", id.clone()))
            .await?;
        let updated: Vec<Coupon> = result.take(0)?;
        Ok(updated.into_iter().next())
    }
}

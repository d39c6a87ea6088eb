//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Store, StoreCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find store by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Store>> {
        let record_id = parse_record_id(TABLE, id)?;
        let store: Option<Store> = self.base.db().select(record_id).await?;
        Ok(store)
    }

    /// Find the store owned by a seller (one store per seller)
    pub async fn find_by_owner(&self, owner: &str) -> RepoResult<Option<Store>> {
        let owner_owned = owner.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM store WHERE owner = $owner LIMIT 1")
            .bind(("owner", owner_owned))
            .await?;
        let stores: Vec<Store> = result.take(0)?;
        Ok(stores.into_iter().next())
    }

    /// Create a new store
    pub async fn create(&self, data: StoreCreate) -> RepoResult<Store> {
        let store = Store {
            id: None,
            owner: data.owner,
            name: data.name,
            address: data.address,
            open_hours: data.open_hours,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<Store> = self.base.db().create(TABLE).content(store).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }
}

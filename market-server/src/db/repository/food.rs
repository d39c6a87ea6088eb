//! Food Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Food, FoodCreate, FoodUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "food";

#[derive(Clone)]
pub struct FoodRepository {
    base: BaseRepository,
}

impl FoodRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all foods, optionally filtered by store and availability
    pub async fn find_all(
        &self,
        store: Option<RecordId>,
        available: Option<bool>,
    ) -> RepoResult<Vec<Food>> {
        let mut sql = String::from("SELECT * FROM food");
        let mut clauses: Vec<&str> = Vec::new();
        if store.is_some() {
            clauses.push("store = $store");
        }
        if available.is_some() {
            clauses.push("is_available = $available");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(store) = store {
            // Reference fields are stored as "table:id" strings
            query = query.bind(("store", store.to_string()));
        }
        if let Some(available) = available {
            query = query.bind(("available", available));
        }

        let foods: Vec<Food> = query.await?.take(0)?;
        Ok(foods)
    }

    /// Find food by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Food>> {
        let record_id = parse_record_id(TABLE, id)?;
        let food: Option<Food> = self.base.db().select(record_id).await?;
        Ok(food)
    }

    /// Create a new food under the given store
    pub async fn create(&self, store: RecordId, data: FoodCreate) -> RepoResult<Food> {
        let food = Food {
            id: None,
            store,
            name: data.name,
            description: data.description,
            price: data.price,
            is_available: data.is_available.unwrap_or(true),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<Food> = self.base.db().create(TABLE).content(food).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create food".to_string()))
    }

    /// Update a food
    pub async fn update(&self, id: &str, data: FoodUpdate) -> RepoResult<Food> {
        let record_id = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $food MERGE $data")
            .bind(("food", record_id.clone()))
            .bind(("data", data))
            .await?;

        let food: Option<Food> = self.base.db().select(record_id).await?;
        food.ok_or_else(|| RepoError::NotFound(format!("Food {} not found", id)))
    }

    /// Hard delete a food
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<Food> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}

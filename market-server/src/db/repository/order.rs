//! Order Repository
//!
//! Orders are append-only apart from status changes: there is no update of
//! line items and no delete operation at all.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Order;
use crate::orders::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order record
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Find orders scoped to a customer and/or store, optionally filtered by
    /// status, newest first. No scope at all means every order (admin).
    pub async fn find_scoped(
        &self,
        customer: Option<String>,
        store: Option<RecordId>,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM orders");
        let mut clauses: Vec<&str> = Vec::new();
        if customer.is_some() {
            clauses.push("customer = $customer");
        }
        if store.is_some() {
            clauses.push("store = $store");
        }
        if status.is_some() {
            clauses.push("status = $status");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(customer) = customer {
            query = query.bind(("customer", customer));
        }
        if let Some(store) = store {
            // Reference fields are stored as "table:id" strings
            query = query.bind(("store", store.to_string()));
        }
        if let Some(status) = status {
            query = query.bind(("status", status));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// Set the status of an order, returning the updated record
    pub async fn update_status(&self, id: &RecordId, status: OrderStatus) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET status = $status")
            .bind(("order", id.clone()))
            .bind(("status", status))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}

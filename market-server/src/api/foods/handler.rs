//! Food API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Food, FoodCreate, FoodUpdate, Store};
use crate::db::repository::{FoodRepository, StoreRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

/// Resolve the seller's own store, or fail
async fn require_own_store(state: &ServerState, user: &CurrentUser) -> AppResult<Store> {
    if !user.is_seller() {
        return Err(AppError::Forbidden(
            "Access denied. Seller role required.".to_string(),
        ));
    }
    StoreRepository::new(state.get_db())
        .find_by_owner(&user.id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("You must have a store to manage food items".to_string())
        })
}

/// Query params for listing foods
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub store_id: Option<String>,
    pub available: Option<bool>,
}

/// GET /api/foods - public catalog listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Food>>> {
    let store = query
        .store_id
        .as_deref()
        .map(|id| parse_record_id("store", id))
        .transpose()?;

    let repo = FoodRepository::new(state.get_db());
    let foods = repo.find_all(store, query.available).await?;
    Ok(Json(foods))
}

/// GET /api/foods/:id - public
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Food>> {
    let repo = FoodRepository::new(state.get_db());
    let food = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Food {} not found", id)))?;
    Ok(Json(food))
}

/// POST /api/foods - create food under the seller's own store
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FoodCreate>,
) -> AppResult<(StatusCode, Json<Food>)> {
    let store = require_own_store(&state, &user).await?;
    payload.validate()?;

    let store_id = store
        .id
        .ok_or_else(|| AppError::Internal("Store record has no id".to_string()))?;

    let repo = FoodRepository::new(state.get_db());
    let food = repo.create(store_id, payload).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// PUT /api/foods/:id - owning seller only
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<FoodUpdate>,
) -> AppResult<Json<Food>> {
    let store = require_own_store(&state, &user).await?;
    payload.validate()?;

    let repo = FoodRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Food {} not found", id)))?;
    if store.id.as_ref() != Some(&existing.store) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let food = repo.update(&id, payload).await?;
    Ok(Json(food))
}

/// DELETE /api/foods/:id - owning seller only
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let store = require_own_store(&state, &user).await?;

    let repo = FoodRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Food {} not found", id)))?;
    if store.id.as_ref() != Some(&existing.store) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let deleted = repo.delete(&id).await?;
    Ok(Json(deleted))
}

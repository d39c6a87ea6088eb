//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CreateOrderRequest, OrderDetail, UpdateStatusRequest};
use crate::orders::{OrderService, OrderStatus};
use crate::utils::AppResult;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// POST /api/orders - create order (customer only)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderDetail>)> {
    let service = OrderService::new(state.get_db());
    let order = service.create_order(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - role-scoped listing, optional `?status=` filter
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;

    let service = OrderService::new(state.get_db());
    let orders = service.list_orders(&user, status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.get_db());
    let order = service.get_order(&user, &id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/status - update order status (seller only)
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.get_db());
    let order = service.update_status(&user, &id, &payload.status).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/cancel - cancel order (owning customer, pending only)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.get_db());
    let order = service.cancel_order(&user, &id).await?;
    Ok(Json(order))
}

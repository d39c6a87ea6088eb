//! Coupon API Module
//!
//! `/active` and `/validate` are public; everything else is seller-only
//! management.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coupons", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Public routes (must be before /{id} to avoid path conflicts)
        .route("/active", get(handler::list_active))
        .route("/validate", post(handler::validate))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}

//! Market Server - food-ordering marketplace backend
//!
//! Connects customers, sellers (stores) and administrators around the
//! order-and-coupon transaction workflow.
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/     # Configuration, state, HTTP server
//! ├── auth/     # JWT tokens, roles, request extractor
//! ├── api/      # HTTP routes and handlers
//! ├── db/       # Embedded SurrealDB, models, repositories
//! ├── orders/   # Order workflow: pricing, coupons, state machine
//! └── utils/    # Errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use orders::{CouponLedger, OrderService, OrderStatus, PricingEngine};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

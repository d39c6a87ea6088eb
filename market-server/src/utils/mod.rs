//! Common utilities and shared infrastructure
//!
//! - Error handling ([`AppError`], [`AppResponse`])
//! - Result types ([`AppResult`])
//! - Logging setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use logger::{init_logger, init_logger_with_file};
pub use result::AppResult;

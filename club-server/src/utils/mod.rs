//! Common utilities shared across the application.
//!
//! - [`AppError`] / [`AppResponse`] - unified error and response envelope
//! - [`AppResult`] - handler result alias
//! - logger setup

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;

//! HTTP API server for liftsheet.
//!
//! This crate provides the JSON API over the spreadsheet tables:
//! - Exercise CRUD with per-exercise workout sets
//! - Routines and their exercise membership
//! - The flat series log
//! - Health and Prometheus metrics endpoints

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

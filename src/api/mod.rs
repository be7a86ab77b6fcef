//! # REST API
//!
//! HTTP routing, handlers, error mapping and the OpenAPI document.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use routes::{build_router, ApiState};
pub use server::start_api_server;

//! # staffdesk
//!
//! Role-scoped HR API. Three kinds of account share one service:
//!
//! - **Lider** (leader): leads teams, awards points, writes annotations about employees
//! - **Gerenciador** (manager): onboards employees, uploads résumés, opens recruitments
//! - **Funcionario** (employee): belongs to teams and accumulates points
//!
//! ## Architecture
//!
//! ```text
//! api (axum handlers) → services → storage (sqlx repositories, blob store)
//!          ↓                ↓
//!   auth middleware   auth::DecisionTable
//! ```
//!
//! Every request to a non-public route is authenticated by
//! [`auth::middleware::authenticate`], which turns a bearer token into a
//! [`auth::Session`]. Services consult the [`auth::DecisionTable`] before doing
//! anything else.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use staffdesk::{Config, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_env()?;
//!     let router = staffdesk::startup::build_app(&config).await?;
//!     staffdesk::api::start_api_server(&config.server, router).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod startup;
pub mod storage;

pub use config::Config;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

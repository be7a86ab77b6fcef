//! Authentication and authorization module entry point.
//!
//! Password hashing, session tokens, request-credential resolution, the role
//! decision table, and the account service built on them.

pub mod account_service;
pub mod authorization;
pub mod hashing;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod session;
pub mod user;
pub mod validation;

pub use account_service::AccountService;
pub use authorization::{DecisionTable, Operation, Requirement};
pub use jwt::{Claims, TokenService};
pub use models::{AuthError, Session};
pub use session::SessionResolver;
pub use user::{LoginRequest, LoginResponse, RegisterEmployeeRequest, RegisterRequest};

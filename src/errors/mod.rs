//! # Error Handling
//!
//! Error types shared by the core, the storage layer and the HTTP handlers.

pub mod types;

pub use types::{AuthErrorType, ErrorKind, Result, StaffdeskError};
pub(crate) use types::is_unique_violation;

/// Short alias used throughout the crate
pub type Error = StaffdeskError;

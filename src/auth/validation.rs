//! Validation helpers shared by request DTOs and services.

use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::errors::{Result, StaffdeskError};

lazy_static! {
    // Email validation: basic RFC 5322 compliant pattern
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("EMAIL_REGEX should be a valid regex pattern");
}

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length to bound hashing cost
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate email format (surrounding whitespace is ignored)
pub fn validate_email(email: &str) -> std::result::Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email").with_message("Invalid email address".into()))
    }
}

/// Validate password length
pub fn validate_password(password: &str) -> std::result::Result<(), ValidationError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_short")
            .with_message("Password must be at least 6 characters".into()));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_long")
            .with_message("Password must be at most 128 characters".into()));
    }
    Ok(())
}

/// Reject empty or whitespace-only text
pub fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Value cannot be empty".into()))
    } else {
        Ok(())
    }
}

/// Trim `value`, failing with a field error when nothing is left
pub fn required_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StaffdeskError::validation_field(format!("{} is required", field), field));
    }
    Ok(trimmed.to_string())
}

/// Parse a client-supplied list of ids: non-empty, well-formed, no duplicates.
pub fn parse_id_list<T>(raw: &[String], field: &str) -> Result<Vec<T>>
where
    T: FromStr + Eq + Hash + Clone,
{
    if raw.is_empty() {
        return Err(StaffdeskError::validation_field(
            format!("{} must contain at least one id", field),
            field,
        ));
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        let id = parse_id::<T>(value, field)?;
        if !seen.insert(id.clone()) {
            return Err(StaffdeskError::validation_field(
                format!("{} contains duplicate id '{}'", field, value.trim()),
                field,
            ));
        }
        ids.push(id);
    }
    Ok(ids)
}

/// Parse a single client-supplied id
pub fn parse_id<T: FromStr>(value: &str, field: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        StaffdeskError::validation_field(format!("'{}' is not a valid id", value.trim()), field)
    })
}

//! Input validation utilities.
//!
//! Checks applied to emails before they are used as store keys or filters.

use crate::constants::MAX_EMAIL_LEN;
use crate::{PatientError, PatientResult};

/// Validates an email used as the record key and returns it trimmed.
///
/// Applied both to the path parameter of lookups and to `user.email` on create and update, so
/// every stored key can be looked up again.
///
/// Only the shape needed for a safe exact-match lookup is enforced; the address itself is not
/// checked for deliverability or RFC syntax:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Rejects control characters
///
/// # Errors
///
/// Returns `PatientError::InvalidEmail` if the parameter is unusable.
pub fn validate_email_param(email: &str) -> PatientResult<&str> {
    let trimmed = email.trim();

    if trimmed.is_empty() || trimmed.len() > MAX_EMAIL_LEN {
        return Err(PatientError::InvalidEmail);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(PatientError::InvalidEmail);
    }

    Ok(trimmed)
}

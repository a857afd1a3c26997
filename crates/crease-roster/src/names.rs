//! Display name validation for teams and players.
//!
//! Valid names:
//! - Must contain at least one non-whitespace character
//! - Must not contain control characters
//! - Must be at most [`MAX_NAME_LEN`] characters once trimmed

use crate::error::{Result, RosterError};

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// Validate a display name and return it trimmed.
///
/// # Examples
///
/// ```
/// use crease_roster::names::validate_display_name;
///
/// assert_eq!(validate_display_name("  Alpha XI ").unwrap(), "Alpha XI");
/// assert!(validate_display_name("   ").is_err());
/// ```
pub fn validate_display_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RosterError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".into(),
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(RosterError::InvalidName {
            name: name.to_string(),
            reason: "name must not contain control characters".into(),
        });
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(RosterError::InvalidName {
            name: name.to_string(),
            reason: format!("name must be at most {MAX_NAME_LEN} characters"),
        });
    }

    Ok(trimmed.to_string())
}

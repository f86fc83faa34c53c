//! # Validation Module
//!
//! Field validators shared by the registration form and the bulk import.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form (TypeScript)                                        │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (length, email, phone)                                │
//! │  └── Composed by registration.rs into whole-form checks                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use club_core::validation::{validate_email, validate_name};
//!
//! assert!(validate_email("email", "lea@example.com").is_ok());
//! assert!(validate_name("lastName", "M", 2).is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum length of a person's first or last name.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum length of a phone number as typed ("06 01 02 03 04" passes).
pub const MIN_PHONE_LEN: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field with a minimum length.
///
/// Length counts characters, not bytes ("Léa" is 3).
pub fn validate_name(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    Ok(())
}

/// Validates an email address (`something@domain.tld`, no whitespace).
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number by length only.
pub fn validate_phone(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() < MIN_PHONE_LEN {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: MIN_PHONE_LEN,
        });
    }

    Ok(())
}

/// Validates that a reference field is filled in.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a managed stock quantity.
///
/// Negative input is rejected here; [`crate::stock::set_managed_quantity`]
/// clamps instead for the inline stock editor.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("lastName", "Martin", MIN_NAME_LEN).is_ok());
        assert!(validate_name("firstName", "Léa", MIN_NAME_LEN).is_ok());
        assert!(validate_name("firstName", "Al", MIN_NAME_LEN).is_ok());

        assert!(matches!(
            validate_name("lastName", "  ", MIN_NAME_LEN),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_name("lastName", "M", MIN_NAME_LEN),
            Err(ValidationError::TooShort { min: 2, .. })
        ));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "lea.martin@example.com").is_ok());
        assert!(validate_email("email", " a@b.fr ").is_ok());

        assert!(validate_email("email", "").is_err());
        assert!(validate_email("email", "lea.martin").is_err());
        assert!(validate_email("email", "lea@example").is_err());
        assert!(validate_email("email", "lea martin@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("phone", "0601020304").is_ok());
        assert!(validate_phone("phone", "06 01 02 03").is_ok());
        assert!(validate_phone("phone", "060102").is_err());
        assert!(validate_phone("phone", "").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(25).is_ok());
        assert!(validate_quantity(-1).is_err());
    }
}

//! # Error Types
//!
//! Domain-specific error types for club-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  club-core errors (this file)                                          │
//! │  ├── CoreError         - General domain errors                         │
//! │  ├── ValidationError   - One field failed a rule                       │
//! │  └── ValidationErrors  - Every failure of a whole form                 │
//! │                                                                         │
//! │  club-cli errors (separate crate)                                      │
//! │  └── CliError          - Config, snapshot loading, domain              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups that legitimately come back empty (no matching category, a
//! reduction deleted after it was applied, negative stock) are NOT errors
//! and never show up here.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Licensee cannot be found.
    #[error("Licensee not found: {0}")]
    LicenseeNotFound(String),

    /// Pack referenced by a licensee does not exist.
    ///
    /// ## When This Occurs
    /// - Pack deleted after the licensee registered
    /// - Snapshot files out of sync
    #[error("Pack not found: {0}")]
    PackNotFound(String),

    /// Equipment item cannot be found in the catalog.
    #[error("Equipment not found: {0}")]
    EquipmentNotFound(String),

    /// A size was picked that has no available stock and the operator
    /// did not force the assignment.
    ///
    /// ## User Workflow
    /// ```text
    /// Pick "Maillot" size M
    ///      │
    ///      ▼
    /// available(Maillot, M) = 0
    ///      │
    ///      ├── force = false → OutOfStock { item: "Maillot", size: "M" }
    ///      │
    ///      └── force = true  → recorded with out_of_stock = true
    /// ```
    #[error("No stock left for {item} size {size}")]
    OutOfStock { item: String, size: String },

    /// An email template has an empty subject or body.
    #[error("Email template '{0}' is missing or incomplete")]
    TemplateMissing(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Several validation errors from one form.
    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Field names are the camelCase paths used by the registration forms
/// (`legalRepresentative.email`), so a front end can attach messages to
/// the right input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid email, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Name lookup against a catalog failed (import rows reference packs
    /// and categories by name).
    #[error("{field} '{value}' not found")]
    UnknownReference { field: String, value: String },
}

impl ValidationError {
    /// The form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::UnknownReference { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors (whole form)
// =============================================================================

/// Every validation failure found in a single form or import row.
///
/// Forms report all issues at once rather than stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Records the error of a validator result, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.0.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True if any error targets `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

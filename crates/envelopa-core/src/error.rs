//! # Error Types
//!
//! Domain-specific error types for envelopa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  envelopa-core errors (this file)                                      │
//! │  ├── CoreError        - Draft mutation failures                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  envelopa-catalog errors (separate crate)                              │
//! │  └── CatalogError     - Catalog fetch failures                         │
//! │                                                                         │
//! │  envelopa-persist errors (separate crate)                              │
//! │  └── PersistError     - Quote document encode/decode failures          │
//! │                                                                         │
//! │  NOTE: The pricing functions themselves NEVER error. Malformed input   │
//! │  is coerced at parse time so a total can always be rendered.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (piece id, limits, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Quote draft mutation errors.
///
/// These errors represent business rule violations on draft operations.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Piece cannot be found in the draft.
    ///
    /// ## When This Occurs
    /// - Piece id does not exist (stale UI reference after a delete)
    /// - Copy operation names a target that was removed mid-edit
    #[error("Piece not found: {0}")]
    PieceNotFound(String),

    /// Draft has exceeded maximum allowed pieces.
    #[error("Quote cannot have more than {max} pieces")]
    QuoteTooLarge { max: usize },

    /// Piece quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation at the persistence/API boundary before
/// a draft is accepted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1500,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1500 exceeds maximum allowed (999)"
        );

        let err = CoreError::PieceNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Piece not found: abc");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

//! # Validation Module
//!
//! Boundary validation for quote data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Kinds of Bad Input                             │
//! │                                                                         │
//! │  In-progress typing (the quote form)                                   │
//! │  └── NEVER an error. Lenient parsers coerce to 0/1 so a total can      │
//! │      always render. See units.rs / money.rs.                           │
//! │                                                                         │
//! │  Data crossing a boundary (loading a persisted quote, accepting a      │
//! │  catalog payload)                                                      │
//! │  └── THIS MODULE. A stored quote with quantity −3 or a 300-character   │
//! │      piece name is rejected with a typed ValidationError before it     │
//! │      reaches the engine.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_PIECE_QUANTITY, MAX_QUOTE_PIECES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest dimension we accept from persisted data: 100 m in millimeters.
/// Nothing being wrapped is a hundred meters long; bigger values are
/// corrupt data, not large pieces.
pub const MAX_DIMENSION_MM: i64 = 100_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a piece display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use envelopa_core::validation::validate_piece_name;
///
/// assert!(validate_piece_name("Capô").is_ok());
/// assert!(validate_piece_name("").is_err());
/// ```
pub fn validate_piece_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a service or product identifier from persisted data.
///
/// Legacy data used bare numeric ids, current data uses UUIDs; both are
/// accepted, only emptiness and runaway length are rejected.
pub fn validate_reference_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 64,
        });
    }

    Ok(())
}

/// Validates a piece id (UUID v4 format).
///
/// ## Example
/// ```rust
/// use envelopa_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a persisted quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_PIECE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_PIECE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_PIECE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (courtesy services, unset prices)
///
/// ## Example
/// ```rust
/// use envelopa_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // R$ 10,99
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a persisted dimension in millimeters.
pub fn validate_dimension_mm(mm: i64) -> ValidationResult<()> {
    if mm < 0 || mm > MAX_DIMENSION_MM {
        return Err(ValidationError::OutOfRange {
            field: "dimension".to_string(),
            min: 0,
            max: MAX_DIMENSION_MM,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of pieces in a persisted quote.
pub fn validate_quote_size(piece_count: usize) -> ValidationResult<()> {
    if piece_count > MAX_QUOTE_PIECES {
        return Err(ValidationError::OutOfRange {
            field: "pieces".to_string(),
            min: 0,
            max: MAX_QUOTE_PIECES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Persistence Error Types
//!
//! Errors for quote-document encoding and decoding.

use envelopa_core::ValidationError;
use thiserror::Error;

/// Quote-document boundary errors.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The document is not valid JSON, or doesn't match the schema.
    #[error("Quote document malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// The document carries values the engine refuses to accept
    /// (negative prices, zero quantities, runaway dimensions).
    #[error("Quote document invalid: {0}")]
    Invalid(#[from] ValidationError),

    /// The stored total does not match what the engine computes from the
    /// document's own inputs.
    ///
    /// ## When This Occurs
    /// - The document was edited outside the application
    /// - A legacy writer persisted a hand-computed total
    /// - Catalog prices changed between save and verify (expected drift;
    ///   the caller decides whether to re-save)
    #[error("Stored total {stored} centavos does not match computed {computed} centavos")]
    TotalMismatch { stored: i64, computed: i64 },
}

/// Convenience type alias for Results with PersistError.
pub type PersistResult<T> = Result<T, PersistError>;

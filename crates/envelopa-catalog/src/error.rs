//! # Catalog Error Types
//!
//! Error types for catalog operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend/transport failure (in the CatalogSource impl)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module) ← One category: the source is unavailable │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller shows a notification; the user re-triggers the refresh.        │
//! │  No automatic retry.                                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog source could not be reached or returned garbage.
    ///
    /// ## When This Occurs
    /// - Backend is down or times out
    /// - Response fails to decode
    #[error("Catalog source unavailable: {reason}")]
    Unavailable { reason: String },
}

impl CatalogError {
    /// Convenience constructor for source implementations.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        let err = CatalogError::unavailable("connection refused");
        assert_eq!(
            err.to_string(),
            "Catalog source unavailable: connection refused"
        );
    }
}

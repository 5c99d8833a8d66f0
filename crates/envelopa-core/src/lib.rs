//! # envelopa-core: Pure Pricing Logic for Envelopa
//!
//! This crate is the **heart** of the Envelopa quoting system. It contains
//! the complete wrap-quote pricing engine as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Envelopa Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Quoting UI (out of scope)                    │   │
//! │  │    Piece form ──► Service checkboxes ──► Totals panel          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ every mutation                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ envelopa-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │money/units│  │   quote   │  │  pricing  │  │   │
//! │  │   │ Services  │  │   Money   │  │   Piece   │  │  totals() │  │   │
//! │  │   │ Products  │  │ Meters/m² │  │QuoteDraft │  │ subtotals │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └───────────┬─────────────────────────────────────┬───────────────┘   │
//! │              │                                     │                    │
//! │  ┌───────────▼─────────────┐          ┌────────────▼────────────────┐  │
//! │  │   envelopa-catalog      │          │      envelopa-persist       │  │
//! │  │   source + TTL cache    │          │   backend quote document    │  │
//! │  └─────────────────────────┘          └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (services, products, selections, discount)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`units`] - Dimensions, area, and percentages as integer sub-units
//! - [`quote`] - The mutable quote draft and its operations
//! - [`pricing`] - The totals pipeline (area, subtotals, discount, freight)
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation for persisted data
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every pricing function is deterministic - same
//!    input = same output, so the persisted total always matches the display
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Everything**: centavos, millimeters, basis points - floats
//!    appear only in display helpers
//! 4. **Total Pricing, Typed Mutations**: pricing never errors (in-progress
//!    form input coerces to safe defaults); draft mutations return typed
//!    errors
//!
//! ## Example Usage
//!
//! ```rust
//! use envelopa_core::money::Money;
//! use envelopa_core::quote::{PieceDescriptor, QuoteDraft};
//! use envelopa_core::types::ServiceCatalog;
//! use envelopa_core::units::Meters;
//!
//! let mut draft = QuoteDraft::new();
//! let piece = draft
//!     .add_piece(PieceDescriptor::Custom { name: "Capô".into() })
//!     .unwrap();
//! piece.set_dimensions(Meters::parse_lenient("1,50"), Meters::parse_lenient("2,00"));
//! piece.set_quantity(3);
//!
//! let totals = draft.totals(&ServiceCatalog::empty());
//! assert!(totals.grand_total.is_zero()); // no product selected yet
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use envelopa_core::Money` instead of
// `use envelopa_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{service_display_name, QuoteTotals};
pub use quote::{Piece, PieceDescriptor, QuoteDraft};
pub use types::*;
pub use units::{Area, Meters, Percent};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum pieces allowed in a single quote.
///
/// ## Business Reason
/// Prevents runaway drafts; a full vehicle wrap is a few dozen pieces.
/// Can be made configurable per-tenant in future versions.
pub const MAX_QUOTE_PIECES: usize = 100;

/// Maximum quantity of a single piece.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_PIECE_QUANTITY: i64 = 999;

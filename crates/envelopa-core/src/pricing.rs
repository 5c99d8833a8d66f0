//! # Pricing
//!
//! The quote pricing engine: per-piece area and subtotals, and the
//! draft-level totals pipeline.
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     How a Grand Total Is Built                          │
//! │                                                                         │
//! │  per piece:                                                             │
//! │    area              = height × width × quantity   (0 if qty-only)     │
//! │    material subtotal = area × unit price           (qty × price if     │
//! │                                                     qty-only)          │
//! │    services subtotal = Σ checked services:                              │
//! │                          per-m²  → price × area   (0 if qty-only)      │
//! │                          per-un  → price × quantity                     │
//! │                          other   → priced like per-m²                   │
//! │                                                                         │
//! │  per draft:                                                             │
//! │    material_total  = Σ material subtotals                               │
//! │    services_total  = Σ services subtotals                               │
//! │    subtotal        = material_total + services_total                    │
//! │    discount_amount = percentual: subtotal × bps, clamped to subtotal   │
//! │                      valor:      min(value, subtotal)                   │
//! │    grand_total     = max(0, subtotal − discount_amount) + freight       │
//! │                                                                         │
//! │  Pure and deterministic: the backend persists exactly this number,     │
//! │  and the UI displays exactly this number.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Model
//! None. Every function here is total: malformed input was already coerced
//! at parse time, unknown service ids are skipped, missing products price
//! as zero (the UI surfaces "material not selected" separately).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quote::{Piece, QuoteDraft};
use crate::types::{Discount, ServiceCatalog, ServiceSelection};
use crate::units::Area;

// =============================================================================
// Per-Piece Pricing
// =============================================================================

impl Piece {
    /// Total area of this piece: `height × width × quantity`.
    ///
    /// Quantity-only pieces have no dimensions and report zero area; their
    /// cost comes from quantity pricing instead.
    pub fn area(&self) -> Area {
        if self.is_quantity_only() {
            return Area::zero();
        }
        Area::of(self.height, self.width, self.quantity)
    }

    /// Material cost of this piece.
    ///
    /// - No product selected → zero (caller surfaces the warning)
    /// - Quantity-only → `quantity × unit price`
    /// - Dimensioned → `area × unit price` (price is per m²)
    pub fn material_subtotal(&self) -> Money {
        let Some(product) = &self.product else {
            return Money::zero();
        };
        let unit_price = product.effective_unit_price();

        if self.is_quantity_only() {
            unit_price.multiply_quantity(self.quantity.max(0))
        } else {
            unit_price.times_area(self.area())
        }
    }

    /// Cost of the checked additional services on this piece.
    ///
    /// Selections whose id is missing from the catalog are skipped
    /// silently: a stale selection must not poison the whole total.
    pub fn services_subtotal(&self, catalog: &ServiceCatalog) -> Money {
        let mut total = Money::zero();

        for (service_id, selection) in &self.selected_services {
            if !selection.is_checked() {
                continue;
            }
            let Some(service) = catalog.find(service_id) else {
                continue;
            };

            if service.unit.prices_by_area() {
                // Area-priced services never apply to quantity-only pieces
                if !self.is_quantity_only() {
                    total += service.price().times_area(self.area());
                }
            } else {
                total += service.price().multiply_quantity(self.quantity.max(0));
            }
        }

        total
    }
}

// =============================================================================
// Quote Totals
// =============================================================================

/// The complete derived price breakdown for a draft.
///
/// Always recomputed, never stored as a source of truth: the persisted
/// `orcamento_total` must equal `grand_total` at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    /// Sum of per-piece material subtotals.
    pub material_total: Money,

    /// Sum of per-piece service subtotals.
    pub services_total: Money,

    /// `material_total + services_total`.
    pub subtotal: Money,

    /// Discount actually applied, clamped to `[0, subtotal]`.
    pub discount_amount: Money,

    /// Freight charge (never discounted).
    pub freight: Money,

    /// `max(0, subtotal − discount_amount) + freight`.
    pub grand_total: Money,
}

impl QuoteDraft {
    /// Computes the full price breakdown for this draft.
    ///
    /// Pure and deterministic: same draft + same catalog always produce
    /// the same totals, so the client display and the backend-persisted
    /// total cannot disagree.
    pub fn totals(&self, catalog: &ServiceCatalog) -> QuoteTotals {
        let mut material_total = Money::zero();
        let mut services_total = Money::zero();

        for piece in &self.pieces {
            material_total += piece.material_subtotal();
            services_total += piece.services_subtotal(catalog);
        }

        let subtotal = material_total + services_total;

        let discount_amount = match self.discount {
            Discount::Percentual(rate) => subtotal.percent_of(rate),
            Discount::Valor(value) => value,
        }
        .clamp_non_negative()
        .min(subtotal.clamp_non_negative());

        let freight = self.freight.clamp_non_negative();
        let grand_total = (subtotal - discount_amount).clamp_non_negative() + freight;

        QuoteTotals {
            material_total,
            services_total,
            subtotal,
            discount_amount,
            freight,
            grand_total,
        }
    }
}

// =============================================================================
// Display-Name Resolution
// =============================================================================

/// Resolves the display name for a selected service.
///
/// Single lookup chain: the name captured on the selection at check time,
/// else the current catalog, else a placeholder. The placeholder keeps a
/// quote renderable even when legacy data lost the name entirely.
pub fn service_display_name(
    service_id: &str,
    selection: &ServiceSelection,
    catalog: &ServiceCatalog,
) -> String {
    if let Some(name) = selection.name() {
        return name.to_string();
    }
    if let Some(service) = catalog.find(service_id) {
        return service.name.clone();
    }
    format!("Serviço {}", service_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

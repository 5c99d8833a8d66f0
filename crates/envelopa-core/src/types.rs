//! # Domain Types
//!
//! Core domain types used throughout the Envelopa pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │  CatalogProduct  │  │AdditionalService │  │ ProductSnapshot  │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  id              │  │  id              │  │  product_id      │      │
//! │  │  list_price      │  │  price_cents     │  │  prices (frozen) │      │
//! │  │  promo fields    │  │  unit            │  │  promo (frozen)  │      │
//! │  │  stock (RO)      │  │  is_eligible()   │  └──────────────────┘      │
//! │  └──────────────────┘  └──────────────────┘                            │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │   ServiceUnit    │  │ ServiceSelection │  │    Discount      │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  SquareMeter     │  │  Unchecked       │  │  Percentual(bps) │      │
//! │  │  Unit            │  │  Checked{name}   │  │  Valor(centavos) │      │
//! │  │  Other(label)    │  └──────────────────┘  └──────────────────┘      │
//! │  └──────────────────┘                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `Piece` never holds a live `CatalogProduct`; it holds a
//! `ProductSnapshot` frozen at selection time. The quote then displays and
//! prices consistently even if the catalog changes mid-edit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::units::Percent;

/// The service type eligible for wrap quoting. Services of any other type
/// in the shared catalog never reach the engine.
pub const SERVICE_TYPE_WRAP: &str = "envelopamento";

// =============================================================================
// Service Unit
// =============================================================================

/// How an additional service is priced.
///
/// The backend stores the unit as a free string. Known labels map to the
/// two pricing modes; anything else is preserved as `Other` and priced
/// per-m² (the historical default for unrecognized units).
#[derive(Debug, Clone, PartialEq, Eq, TS)]
#[ts(export)]
pub enum ServiceUnit {
    /// Priced by piece area (`m²`, `m2`).
    SquareMeter,
    /// Priced by piece quantity (`unidade`, `un`).
    Unit,
    /// Unrecognized label, kept verbatim for display. Priced per-m².
    Other(String),
}

impl ServiceUnit {
    /// Maps a backend unit label to a pricing mode.
    ///
    /// Matching is case-insensitive and whitespace-tolerant.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "m²" | "m2" => ServiceUnit::SquareMeter,
            "unidade" | "un" => ServiceUnit::Unit,
            _ => ServiceUnit::Other(label.trim().to_string()),
        }
    }

    /// Returns the display label for this unit.
    pub fn label(&self) -> &str {
        match self {
            ServiceUnit::SquareMeter => "m²",
            ServiceUnit::Unit => "unidade",
            ServiceUnit::Other(label) => label,
        }
    }

    /// Whether this unit prices by area (per-m² and unrecognized units).
    #[inline]
    pub fn prices_by_area(&self) -> bool {
        !matches!(self, ServiceUnit::Unit)
    }
}

/// Serialized as the raw backend label so round-trips preserve it.
impl Serialize for ServiceUnit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ServiceUnit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(ServiceUnit::from_label(&label))
    }
}

// =============================================================================
// Additional Service
// =============================================================================

/// A catalog service that can be applied to quote pieces.
///
/// Read-only reference data: the engine never mutates the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdditionalService {
    /// Backend identifier (stringly-typed; legacy data used numeric ids).
    pub id: String,

    /// Display name shown on the quote.
    pub name: String,

    /// Price in centavos, per unit or per m² depending on `unit`.
    pub price_cents: i64,

    /// Pricing mode.
    pub unit: ServiceUnit,

    /// Catalog category (display/grouping only).
    pub category: Option<String>,

    /// Whether the service is active (soft delete).
    pub is_active: bool,

    /// Catalog type; only `envelopamento` services are eligible here.
    pub service_type: String,
}

impl AdditionalService {
    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether this service may be applied to wrap quotes.
    pub fn is_eligible(&self) -> bool {
        self.is_active && self.service_type == SERVICE_TYPE_WRAP
    }
}

// =============================================================================
// Service Catalog
// =============================================================================

/// Lookup table of eligible additional services.
///
/// Construction filters out inactive and non-wrap services, so the pricing
/// engine only ever sees services it may apply. A selection whose id is
/// not found here is silently skipped (a data-consistency gap, not an
/// error).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceCatalog {
    services: Vec<AdditionalService>,
}

impl ServiceCatalog {
    /// Builds a catalog from raw backend records, keeping only eligible
    /// services.
    pub fn from_services(services: Vec<AdditionalService>) -> Self {
        ServiceCatalog {
            services: services.into_iter().filter(|s| s.is_eligible()).collect(),
        }
    }

    /// An empty catalog (no services resolvable).
    pub fn empty() -> Self {
        ServiceCatalog::default()
    }

    /// Looks up a service by id.
    pub fn find(&self, id: &str) -> Option<&AdditionalService> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Number of eligible services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Checks if the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Iterates over the eligible services.
    pub fn iter(&self) -> impl Iterator<Item = &AdditionalService> {
        self.services.iter()
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A material (vinyl film) from the product catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,

    /// Regular sale price in centavos (per m² for dimensioned pieces,
    /// per unit for quantity-only pieces).
    pub list_price_cents: Option<i64>,

    /// Explicit per-m² price, used when no list price is set.
    pub square_meter_price_cents: Option<i64>,

    /// Promotional price in centavos.
    pub promo_price_cents: Option<i64>,

    /// Whether the promotion is currently active.
    pub promo_active: bool,

    /// Current stock level. Read-only here; the engine never mutates it.
    pub stock: Option<i64>,
}

impl CatalogProduct {
    /// Freezes this product into a per-piece snapshot.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id.clone(),
            name: self.name.clone(),
            list_price_cents: self.list_price_cents,
            square_meter_price_cents: self.square_meter_price_cents,
            promo_price_cents: self.promo_price_cents,
            promo_active: self.promo_active,
        }
    }
}

// =============================================================================
// Product Snapshot
// =============================================================================

/// Product data frozen onto a piece at selection time.
///
/// ## Price Resolution
/// ```text
/// promo_active && promo_price > 0 ──► promotional price
///        else list_price set      ──► list price
///        else m² price set        ──► per-m² price
///        else                     ──► R$ 0,00
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSnapshot {
    /// Catalog product id (for persistence; lookups never happen at
    /// pricing time).
    pub product_id: String,

    /// Name at time of selection (frozen).
    pub name: String,

    /// Regular price at time of selection (frozen).
    pub list_price_cents: Option<i64>,

    /// Per-m² price at time of selection (frozen).
    pub square_meter_price_cents: Option<i64>,

    /// Promotional price at time of selection (frozen).
    pub promo_price_cents: Option<i64>,

    /// Promotion flag at time of selection (frozen).
    pub promo_active: bool,
}

impl ProductSnapshot {
    /// Resolves the effective unit price for this product.
    pub fn effective_unit_price(&self) -> Money {
        if self.promo_active {
            if let Some(promo) = self.promo_price_cents {
                if promo > 0 {
                    return Money::from_cents(promo);
                }
            }
        }

        if let Some(list) = self.list_price_cents {
            return Money::from_cents(list.max(0));
        }

        if let Some(m2) = self.square_meter_price_cents {
            return Money::from_cents(m2.max(0));
        }

        Money::zero()
    }
}

// =============================================================================
// Service Selection
// =============================================================================

/// Whether a service is applied to a piece, canonical form.
///
/// The backend historically stored either a raw boolean or an
/// `{id, nome, checked}` object per service. Both shapes normalize into
/// this tagged union at the persistence boundary; nothing past that point
/// branches on shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ServiceSelection {
    /// Service explicitly unchecked (kept so a copy can overwrite a
    /// previous check on the target).
    #[default]
    Unchecked,

    /// Service applied; `name` is the display name captured at check time
    /// so loads never need to probe catalogs for it.
    Checked { name: Option<String> },
}

impl ServiceSelection {
    /// Creates a checked selection carrying the service name.
    pub fn checked(name: impl Into<String>) -> Self {
        ServiceSelection::Checked {
            name: Some(name.into()),
        }
    }

    /// Whether this selection counts toward pricing.
    #[inline]
    pub fn is_checked(&self) -> bool {
        matches!(self, ServiceSelection::Checked { .. })
    }

    /// The embedded display name, if captured.
    pub fn name(&self) -> Option<&str> {
        match self {
            ServiceSelection::Checked { name } => name.as_deref(),
            ServiceSelection::Unchecked => None,
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Quote-level discount, either a percentage of the subtotal or a fixed
/// amount.
///
/// Either way the resulting discount amount is clamped to `[0, subtotal]`
/// at totals time — a discount can never push the subtotal negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Discount {
    /// Percentage of the subtotal, in basis points.
    Percentual(Percent),
    /// Fixed amount in centavos.
    Valor(Money),
}

impl Discount {
    /// No discount.
    pub const fn none() -> Self {
        Discount::Percentual(Percent::zero())
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Quote Draft
//!
//! The mutable quote aggregate the UI edits.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quote Draft Operations                               │
//! │                                                                         │
//! │  Frontend Action          Draft Operation          State Change         │
//! │  ───────────────          ───────────────          ────────────         │
//! │                                                                         │
//! │  Add piece ──────────────► add_piece() ──────────► pieces.push(piece)  │
//! │                                                                         │
//! │  Edit measurement ───────► set_dimensions() ─────► piece.height/width  │
//! │                                                                         │
//! │  Toggle service ─────────► toggle_service() ─────► selections[id]      │
//! │                                                                         │
//! │  "Copy to all" dialog ───► copy_services_and_product()                 │
//! │                                                                         │
//! │  Click remove ───────────► remove_piece() ───────► pieces.remove(i)    │
//! │                                                                         │
//! │  ANY of the above ───────► totals() recomputed, UI re-renders          │
//! │                                                                         │
//! │  NOTE: Derived totals are never stored on the draft. They are always   │
//! │        recomputed from the pieces (see pricing.rs), so the persisted   │
//! │        total can never drift from its inputs.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{AdditionalService, Discount, ProductSnapshot, ServiceSelection};
use crate::units::Meters;
use crate::{MAX_PIECE_QUANTITY, MAX_QUOTE_PIECES};

// =============================================================================
// Piece Descriptor
// =============================================================================

/// Where a piece came from, and whether it carries dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PieceDescriptor {
    /// Picked from the parts catalog (door, hood, bumper...).
    CatalogPart { part_id: String, name: String },

    /// Free-form entry typed by the user.
    Custom { name: String },

    /// Quantity-only item with no dimensions (e.g. a pre-cut kit).
    /// Priced by quantity; area-based services never apply.
    QuantityOnly { name: String },
}

impl PieceDescriptor {
    /// Display name of the piece.
    pub fn name(&self) -> &str {
        match self {
            PieceDescriptor::CatalogPart { name, .. } => name,
            PieceDescriptor::Custom { name } => name,
            PieceDescriptor::QuantityOnly { name } => name,
        }
    }

    /// Whether this piece is priced by quantity alone.
    #[inline]
    pub fn is_quantity_only(&self) -> bool {
        matches!(self, PieceDescriptor::QuantityOnly { .. })
    }
}

// =============================================================================
// Piece
// =============================================================================

/// One item being quoted.
///
/// ## Invariants
/// - `quantity >= 1` (mutators clamp; lenient parsers default to 1)
/// - At most one selection per service id (`BTreeMap` key)
/// - `height`/`width` are meaningful only when the descriptor carries
///   dimensions; quantity-only pieces keep them at zero
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    /// Piece id (UUID v4), assigned when added to the draft.
    pub id: String,

    /// Origin and display name.
    pub descriptor: PieceDescriptor,

    /// Height in meters (zero for quantity-only pieces).
    pub height: Meters,

    /// Width in meters (zero for quantity-only pieces).
    pub width: Meters,

    /// Number of identical pieces.
    pub quantity: i64,

    /// Selected material, frozen at selection time.
    pub product: Option<ProductSnapshot>,

    /// Service selections keyed by service id.
    pub selected_services: BTreeMap<String, ServiceSelection>,

    /// When this piece was added to the draft.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl Piece {
    fn new(descriptor: PieceDescriptor) -> Self {
        Piece {
            id: uuid::Uuid::new_v4().to_string(),
            descriptor,
            height: Meters::zero(),
            width: Meters::zero(),
            quantity: 1,
            product: None,
            selected_services: BTreeMap::new(),
            added_at: Utc::now(),
        }
    }

    /// Whether this piece is priced by quantity alone.
    #[inline]
    pub fn is_quantity_only(&self) -> bool {
        self.descriptor.is_quantity_only()
    }

    /// Sets the piece dimensions.
    pub fn set_dimensions(&mut self, height: Meters, width: Meters) {
        self.height = height;
        self.width = width;
    }

    /// Sets the quantity, clamping below 1 back to 1 (the blur default).
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity.max(1);
    }

    /// Checks or unchecks a catalog service on this piece.
    ///
    /// Checking captures the service name into the selection, so the
    /// display name survives persistence without any catalog probing.
    pub fn toggle_service(&mut self, service: &AdditionalService, checked: bool) {
        let selection = if checked {
            ServiceSelection::checked(service.name.clone())
        } else {
            ServiceSelection::Unchecked
        };
        self.selected_services.insert(service.id.clone(), selection);
    }

    /// Stores a raw selection value (used by the persistence boundary and
    /// by the copy operation, which must preserve the exact shape).
    pub fn set_selection(&mut self, service_id: impl Into<String>, selection: ServiceSelection) {
        self.selected_services.insert(service_id.into(), selection);
    }

    /// Selects a material for this piece (snapshot frozen by the caller).
    pub fn select_product(&mut self, snapshot: ProductSnapshot) {
        self.product = Some(snapshot);
    }

    /// Clears the material selection.
    pub fn clear_product(&mut self) {
        self.product = None;
    }
}

// =============================================================================
// Quote Draft
// =============================================================================

/// The quote being edited: ordered pieces plus discount and freight.
///
/// ## Invariants
/// - Piece order is insertion order (display only)
/// - Maximum pieces: 100
/// - Totals are derived, never stored (see `pricing.rs`)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    /// Pieces in insertion order.
    pub pieces: Vec<Piece>,

    /// Quote-level discount.
    pub discount: Discount,

    /// Freight charge, added after the discount clamp.
    pub freight: Money,

    /// When the draft was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl QuoteDraft {
    /// Creates a new empty draft.
    pub fn new() -> Self {
        QuoteDraft {
            pieces: Vec::new(),
            discount: Discount::none(),
            freight: Money::zero(),
            created_at: Utc::now(),
        }
    }

    /// Adds a piece to the draft, assigning it a fresh id.
    ///
    /// ## Returns
    /// A mutable reference to the new piece, so the caller can set
    /// dimensions/product in the same breath.
    pub fn add_piece(&mut self, descriptor: PieceDescriptor) -> CoreResult<&mut Piece> {
        if self.pieces.len() >= MAX_QUOTE_PIECES {
            return Err(CoreError::QuoteTooLarge {
                max: MAX_QUOTE_PIECES,
            });
        }

        self.pieces.push(Piece::new(descriptor));
        Ok(self.pieces.last_mut().expect("just pushed"))
    }

    /// Removes a piece by id.
    pub fn remove_piece(&mut self, piece_id: &str) -> CoreResult<()> {
        let initial_len = self.pieces.len();
        self.pieces.retain(|p| p.id != piece_id);

        if self.pieces.len() == initial_len {
            Err(CoreError::PieceNotFound(piece_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Looks up a piece by id.
    pub fn piece(&self, piece_id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == piece_id)
    }

    /// Looks up a piece by id, mutably.
    pub fn piece_mut(&mut self, piece_id: &str) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == piece_id)
    }

    /// Updates a piece's quantity, enforcing the per-piece maximum.
    pub fn update_quantity(&mut self, piece_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_PIECE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_PIECE_QUANTITY,
            });
        }

        match self.piece_mut(piece_id) {
            Some(piece) => {
                piece.set_quantity(quantity);
                Ok(())
            }
            None => Err(CoreError::PieceNotFound(piece_id.to_string())),
        }
    }

    /// Copies service selections (and optionally the product) from one
    /// piece onto others.
    ///
    /// ## Behavior
    /// - Every listed service id is copied with its exact selection value
    ///   (checked shape and embedded name preserved); ids the source never
    ///   touched are skipped
    /// - `copy_product` additionally overwrites each target's product
    ///   snapshot with the source's
    /// - All-or-nothing: source and all targets are validated before any
    ///   mutation happens
    /// - The source id is skipped if listed among the targets, so the
    ///   source is never modified
    ///
    /// ## User Workflow
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  "Copy services" dialog                                             │
    /// │                                                                     │
    /// │  Source: Capô (Aplicação ✓, Remoção ✓, product: Vinil Preto)       │
    /// │  Targets: [Porta esquerda] [Porta direita]                         │
    /// │       │                                                             │
    /// │       ▼                                                             │
    /// │  copy_services_and_product(capo, [portas], [aplicacao, remocao],   │
    /// │                            copy_product: true)                      │
    /// │       │                                                             │
    /// │       ▼                                                             │
    /// │  Both doors now carry the same checks and the same material        │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn copy_services_and_product(
        &mut self,
        source_id: &str,
        target_ids: &[String],
        service_ids: &[String],
        copy_product: bool,
    ) -> CoreResult<()> {
        // Validate everything up front so a bad target leaves the draft
        // untouched.
        let source = self
            .piece(source_id)
            .ok_or_else(|| CoreError::PieceNotFound(source_id.to_string()))?;

        let selections: Vec<(String, ServiceSelection)> = service_ids
            .iter()
            .filter_map(|id| {
                source
                    .selected_services
                    .get(id)
                    .map(|sel| (id.clone(), sel.clone()))
            })
            .collect();
        let product = if copy_product {
            source.product.clone()
        } else {
            None
        };

        for target_id in target_ids {
            if target_id != source_id && self.piece(target_id).is_none() {
                return Err(CoreError::PieceNotFound(target_id.clone()));
            }
        }

        for target_id in target_ids {
            if target_id == source_id {
                continue;
            }
            let target = self.piece_mut(target_id).expect("validated above");
            for (service_id, selection) in &selections {
                target.set_selection(service_id.clone(), selection.clone());
            }
            if copy_product {
                target.product = product.clone();
            }
        }

        Ok(())
    }

    /// Sets the quote-level discount.
    pub fn set_discount(&mut self, discount: Discount) {
        self.discount = discount;
    }

    /// Sets the freight charge (negative input clamps to zero).
    pub fn set_freight(&mut self, freight: Money) {
        self.freight = freight.clamp_non_negative();
    }

    /// Clears all pieces and resets discount/freight.
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.discount = Discount::none();
        self.freight = Money::zero();
        self.created_at = Utc::now();
    }

    /// Number of pieces in the draft.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Checks if the draft has no pieces.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceUnit;

    fn wrap_service(id: &str, name: &str) -> AdditionalService {
        AdditionalService {
            id: id.to_string(),
            name: name.to_string(),
            price_cents: 500,
            unit: ServiceUnit::SquareMeter,
            category: None,
            is_active: true,
            service_type: crate::types::SERVICE_TYPE_WRAP.to_string(),
        }
    }

    fn snapshot(id: &str, price_cents: i64) -> ProductSnapshot {
        ProductSnapshot {
            product_id: id.to_string(),
            name: format!("Product {}", id),
            list_price_cents: Some(price_cents),
            square_meter_price_cents: None,
            promo_price_cents: None,
            promo_active: false,
        }
    }

    fn draft_with_pieces(n: usize) -> (QuoteDraft, Vec<String>) {
        let mut draft = QuoteDraft::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let piece = draft
                .add_piece(PieceDescriptor::Custom {
                    name: format!("Piece {}", i),
                })
                .unwrap();
            ids.push(piece.id.clone());
        }
        (draft, ids)
    }

    #[test]
    fn test_add_piece_assigns_unique_ids() {
        let (draft, ids) = draft_with_pieces(3);
        assert_eq!(draft.piece_count(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn test_add_piece_enforces_maximum() {
        let (mut draft, _) = draft_with_pieces(MAX_QUOTE_PIECES);
        let err = draft
            .add_piece(PieceDescriptor::Custom {
                name: "overflow".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::QuoteTooLarge { .. }));
    }

    #[test]
    fn test_remove_piece() {
        let (mut draft, ids) = draft_with_pieces(2);
        draft.remove_piece(&ids[0]).unwrap();
        assert_eq!(draft.piece_count(), 1);
        assert!(draft.piece(&ids[0]).is_none());

        let err = draft.remove_piece("missing").unwrap_err();
        assert!(matches!(err, CoreError::PieceNotFound(_)));
    }

    #[test]
    fn test_update_quantity_clamps_and_limits() {
        let (mut draft, ids) = draft_with_pieces(1);

        draft.update_quantity(&ids[0], 5).unwrap();
        assert_eq!(draft.piece(&ids[0]).unwrap().quantity, 5);

        // Below 1 clamps back to the blur default
        draft.update_quantity(&ids[0], 0).unwrap();
        assert_eq!(draft.piece(&ids[0]).unwrap().quantity, 1);

        let err = draft
            .update_quantity(&ids[0], MAX_PIECE_QUANTITY + 1)
            .unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_toggle_service_captures_name() {
        let (mut draft, ids) = draft_with_pieces(1);
        let service = wrap_service("7", "Aplicação");

        let piece = draft.piece_mut(&ids[0]).unwrap();
        piece.toggle_service(&service, true);
        assert_eq!(
            piece.selected_services.get("7"),
            Some(&ServiceSelection::checked("Aplicação"))
        );

        piece.toggle_service(&service, false);
        assert_eq!(
            piece.selected_services.get("7"),
            Some(&ServiceSelection::Unchecked)
        );
        // Still exactly one entry for the id
        assert_eq!(piece.selected_services.len(), 1);
    }

    #[test]
    fn test_copy_services_and_product() {
        let (mut draft, ids) = draft_with_pieces(4);
        let service_a = wrap_service("a", "Aplicação");
        let service_b = wrap_service("b", "Remoção");

        {
            let source = draft.piece_mut(&ids[0]).unwrap();
            source.toggle_service(&service_a, true);
            source.toggle_service(&service_b, true);
            source.select_product(snapshot("p1", 2000));
        }

        let targets = vec![ids[1].clone(), ids[2].clone()];
        draft
            .copy_services_and_product(&ids[0], &targets, &["a".to_string(), "b".to_string()], true)
            .unwrap();

        for target_id in &targets {
            let target = draft.piece(target_id).unwrap();
            assert_eq!(
                target.selected_services.get("a"),
                Some(&ServiceSelection::checked("Aplicação"))
            );
            assert_eq!(
                target.selected_services.get("b"),
                Some(&ServiceSelection::checked("Remoção"))
            );
            assert_eq!(target.product, Some(snapshot("p1", 2000)));
        }

        // Source unchanged
        let source = draft.piece(&ids[0]).unwrap();
        assert_eq!(source.selected_services.len(), 2);
        assert_eq!(source.product, Some(snapshot("p1", 2000)));

        // Bystander piece untouched
        let bystander = draft.piece(&ids[3]).unwrap();
        assert!(bystander.selected_services.is_empty());
        assert!(bystander.product.is_none());
    }

    #[test]
    fn test_copy_without_product_keeps_target_product() {
        let (mut draft, ids) = draft_with_pieces(2);
        let service = wrap_service("a", "Aplicação");

        draft
            .piece_mut(&ids[0])
            .unwrap()
            .toggle_service(&service, true);
        draft
            .piece_mut(&ids[1])
            .unwrap()
            .select_product(snapshot("p2", 900));

        draft
            .copy_services_and_product(&ids[0], &[ids[1].clone()], &["a".to_string()], false)
            .unwrap();

        let target = draft.piece(&ids[1]).unwrap();
        assert!(target.selected_services.get("a").unwrap().is_checked());
        assert_eq!(target.product, Some(snapshot("p2", 900)));
    }

    #[test]
    fn test_copy_is_all_or_nothing() {
        let (mut draft, ids) = draft_with_pieces(2);
        let service = wrap_service("a", "Aplicação");
        draft
            .piece_mut(&ids[0])
            .unwrap()
            .toggle_service(&service, true);

        let targets = vec![ids[1].clone(), "missing".to_string()];
        let err = draft
            .copy_services_and_product(&ids[0], &targets, &["a".to_string()], false)
            .unwrap_err();
        assert!(matches!(err, CoreError::PieceNotFound(_)));

        // The valid target was not partially mutated
        assert!(draft.piece(&ids[1]).unwrap().selected_services.is_empty());
    }

    #[test]
    fn test_copy_skips_source_listed_as_target() {
        let (mut draft, ids) = draft_with_pieces(2);
        let service = wrap_service("a", "Aplicação");
        draft
            .piece_mut(&ids[0])
            .unwrap()
            .toggle_service(&service, true);

        let targets = vec![ids[0].clone(), ids[1].clone()];
        draft
            .copy_services_and_product(&ids[0], &targets, &["a".to_string()], false)
            .unwrap();

        assert!(draft.piece(&ids[1]).unwrap().selected_services.get("a").unwrap().is_checked());
        // Source still has exactly its original single entry
        assert_eq!(draft.piece(&ids[0]).unwrap().selected_services.len(), 1);
    }

    #[test]
    fn test_set_freight_clamps_negative() {
        let mut draft = QuoteDraft::new();
        draft.set_freight(Money::from_cents(-500));
        assert!(draft.freight.is_zero());
    }

    #[test]
    fn test_clear() {
        let (mut draft, _) = draft_with_pieces(2);
        draft.set_freight(Money::from_cents(1500));
        draft.clear();
        assert!(draft.is_empty());
        assert!(draft.freight.is_zero());
        assert_eq!(draft.discount, Discount::none());
    }
}

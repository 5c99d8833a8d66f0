//! # Quote Document Wire Format
//!
//! The JSON shapes the backend stores, with the backend's Portuguese field
//! names. All monetary values are integer centavos; all dimensions are
//! integer millimeters. No floats cross this boundary.
//!
//! ## Legacy Selection Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The backend holds quotes saved by two generations of writers:         │
//! │                                                                         │
//! │  Legacy:   "servicos_selecionados": { "7": true }                      │
//! │  Current:  "servicos_selecionados": {                                  │
//! │              "7": { "id": "7", "nome": "Aplicação", "checked": true }  │
//! │            }                                                            │
//! │                                                                         │
//! │  Both deserialize here (serde untagged) and normalize into the         │
//! │  canonical ServiceSelection immediately. Everything downstream of      │
//! │  this module sees exactly one shape. Writes always emit the current   │
//! │  object form.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use envelopa_core::types::{ProductSnapshot, ServiceSelection};

// =============================================================================
// Selection Wire Shape
// =============================================================================

/// One selection entry as stored by either generation of writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionDoc {
    /// Legacy raw boolean keyed by service id.
    Legacy(bool),

    /// Current object form.
    Entry {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nome: Option<String>,
        #[serde(default)]
        checked: Option<bool>,
    },
}

impl SelectionDoc {
    /// Normalizes either wire shape into the canonical selection.
    ///
    /// A missing `checked` field counts as checked: the object's presence
    /// was the legacy writer's way of saying "applied".
    pub fn normalize(&self) -> ServiceSelection {
        match self {
            SelectionDoc::Legacy(true) => ServiceSelection::Checked { name: None },
            SelectionDoc::Legacy(false) => ServiceSelection::Unchecked,
            SelectionDoc::Entry { nome, checked, .. } => {
                if checked == &Some(false) {
                    ServiceSelection::Unchecked
                } else {
                    ServiceSelection::Checked { name: nome.clone() }
                }
            }
        }
    }

    /// Builds the canonical (current) wire form for a selection.
    pub fn from_selection(service_id: &str, selection: &ServiceSelection) -> Self {
        SelectionDoc::Entry {
            id: Some(service_id.to_string()),
            nome: selection.name().map(str::to_string),
            checked: Some(selection.is_checked()),
        }
    }
}

// =============================================================================
// Applied Services
// =============================================================================

/// A `(service id, service name)` pair persisted atomically with the
/// selections at save time.
///
/// This is what lets a load render service names with a single lookup
/// even when the selection itself predates name capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedServiceDoc {
    pub id: String,
    pub nome: String,
}

// =============================================================================
// Product Wire Shape
// =============================================================================

/// The product snapshot as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdutoDoc {
    pub id: String,
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco_venda: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco_m2: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco_promocional: Option<i64>,
    #[serde(default)]
    pub promocao_ativa: bool,
}

impl ProdutoDoc {
    pub fn from_snapshot(snapshot: &ProductSnapshot) -> Self {
        ProdutoDoc {
            id: snapshot.product_id.clone(),
            nome: snapshot.name.clone(),
            preco_venda: snapshot.list_price_cents,
            preco_m2: snapshot.square_meter_price_cents,
            preco_promocional: snapshot.promo_price_cents,
            promocao_ativa: snapshot.promo_active,
        }
    }

    pub fn into_snapshot(self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id,
            name: self.nome,
            list_price_cents: self.preco_venda,
            square_meter_price_cents: self.preco_m2,
            promo_price_cents: self.preco_promocional,
            promo_active: self.promocao_ativa,
        }
    }
}

// =============================================================================
// Piece and Quote Wire Shapes
// =============================================================================

/// One quoted piece as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PecaDoc {
    pub id: String,
    pub nome: String,

    /// Set when the piece came from the parts catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parte_id: Option<String>,

    /// Quantity-only item: no dimensions, priced by quantity.
    #[serde(default)]
    pub sem_dimensao: bool,

    #[serde(default)]
    pub altura_mm: i64,
    #[serde(default)]
    pub largura_mm: i64,
    pub quantidade: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produto: Option<ProdutoDoc>,

    #[serde(default)]
    pub servicos_selecionados: BTreeMap<String, SelectionDoc>,

    /// Name pairs for every checked service, written at save time.
    #[serde(default)]
    pub servicos_aplicados: Vec<AppliedServiceDoc>,

    pub adicionado_em: DateTime<Utc>,
}

/// The backend quote document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrcamentoDoc {
    pub pecas: Vec<PecaDoc>,

    /// `percentual` or `valor`.
    pub tipo_desconto: String,

    /// Basis points when percentual, centavos when valor.
    #[serde(default)]
    pub desconto: i64,

    /// Freight in centavos.
    #[serde(default)]
    pub frete: i64,

    /// Totals computed by the engine at save time. `orcamento_total` is
    /// what the backend treats as authoritative; it must always verify
    /// against recomputation (see `verify_total`).
    pub material_total: i64,
    pub servicos_total: i64,
    pub orcamento_total: i64,

    pub criado_em: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_boolean_normalizes() {
        let checked: SelectionDoc = serde_json::from_str("true").unwrap();
        assert_eq!(
            checked.normalize(),
            ServiceSelection::Checked { name: None }
        );

        let unchecked: SelectionDoc = serde_json::from_str("false").unwrap();
        assert_eq!(unchecked.normalize(), ServiceSelection::Unchecked);
    }

    #[test]
    fn test_current_object_normalizes() {
        let doc: SelectionDoc =
            serde_json::from_str(r#"{"id":"7","nome":"Aplicação","checked":true}"#).unwrap();
        assert_eq!(
            doc.normalize(),
            ServiceSelection::checked("Aplicação")
        );

        let unchecked: SelectionDoc =
            serde_json::from_str(r#"{"id":"7","nome":"Aplicação","checked":false}"#).unwrap();
        assert_eq!(unchecked.normalize(), ServiceSelection::Unchecked);
    }

    #[test]
    fn test_object_without_checked_counts_as_checked() {
        let doc: SelectionDoc = serde_json::from_str(r#"{"id":"7","nome":"Aplicação"}"#).unwrap();
        assert!(doc.normalize().is_checked());
    }

    #[test]
    fn test_serialization_always_emits_object_form() {
        let doc = SelectionDoc::from_selection("7", &ServiceSelection::checked("Aplicação"));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["nome"], "Aplicação");
        assert_eq!(json["checked"], true);
    }

    #[test]
    fn test_produto_doc_round_trip() {
        let snapshot = ProductSnapshot {
            product_id: "p1".to_string(),
            name: "Vinil Preto".to_string(),
            list_price_cents: Some(2000),
            square_meter_price_cents: None,
            promo_price_cents: Some(1500),
            promo_active: true,
        };
        let doc = ProdutoDoc::from_snapshot(&snapshot);
        assert_eq!(doc.into_snapshot(), snapshot);
    }
}

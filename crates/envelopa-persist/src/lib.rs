//! # envelopa-persist: Quote Document Boundary for Envelopa
//!
//! Encodes quote drafts into the backend's JSON document and decodes them
//! back, normalizing legacy shapes on the way in.
//!
//! ## The One Guarantee That Matters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SAVE:  draft ──► envelopa-core totals() ──► orcamento_total ──► JSON  │
//! │                                                                         │
//! │  The stored total is never hand-assembled. It is the engine's output,  │
//! │  computed at encode time from the same inputs the document carries.    │
//! │  So:                                                                    │
//! │                                                                         │
//! │  LOAD:  JSON ──► draft ──► totals() == orcamento_total   (verify)      │
//! │                                                                         │
//! │  A mismatch means the document was edited outside the application or  │
//! │  catalog prices moved since the save. Either way the caller decides;  │
//! │  we just refuse to pretend the numbers agree.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod wire;

pub use error::{PersistError, PersistResult};

use envelopa_core::money::Money;
use envelopa_core::quote::{Piece, PieceDescriptor, QuoteDraft};
use envelopa_core::types::{Discount, ServiceCatalog, ServiceSelection};
use envelopa_core::units::{Meters, Percent};
use envelopa_core::validation;
use envelopa_core::{service_display_name, QuoteTotals};

use wire::{AppliedServiceDoc, OrcamentoDoc, PecaDoc, ProdutoDoc, SelectionDoc};

/// A decoded quote document: the editable draft plus the total the
/// backend had stored for it.
#[derive(Debug, Clone)]
pub struct DecodedQuote {
    pub draft: QuoteDraft,
    pub stored_total: Money,
}

// =============================================================================
// Encode
// =============================================================================

/// Serializes a draft into the backend quote document.
///
/// Totals are computed here, by the engine, and embedded; service names
/// for every checked selection are persisted alongside the selections
/// (`servicos_aplicados`) so later loads resolve names without probing.
pub fn encode_quote(draft: &QuoteDraft, catalog: &ServiceCatalog) -> PersistResult<String> {
    let totals = draft.totals(catalog);
    let doc = build_document(draft, catalog, &totals);
    Ok(serde_json::to_string(&doc)?)
}

fn build_document(
    draft: &QuoteDraft,
    catalog: &ServiceCatalog,
    totals: &QuoteTotals,
) -> OrcamentoDoc {
    let pecas = draft.pieces.iter().map(|p| encode_piece(p, catalog)).collect();

    let (tipo_desconto, desconto) = match draft.discount {
        Discount::Percentual(rate) => ("percentual".to_string(), rate.bps() as i64),
        Discount::Valor(value) => ("valor".to_string(), value.cents()),
    };

    OrcamentoDoc {
        pecas,
        tipo_desconto,
        desconto,
        frete: draft.freight.cents(),
        material_total: totals.material_total.cents(),
        servicos_total: totals.services_total.cents(),
        orcamento_total: totals.grand_total.cents(),
        criado_em: draft.created_at,
    }
}

fn encode_piece(piece: &Piece, catalog: &ServiceCatalog) -> PecaDoc {
    let parte_id = match &piece.descriptor {
        PieceDescriptor::CatalogPart { part_id, .. } => Some(part_id.clone()),
        _ => None,
    };

    let servicos_selecionados = piece
        .selected_services
        .iter()
        .map(|(id, sel)| (id.clone(), SelectionDoc::from_selection(id, sel)))
        .collect();

    // Name pairs for checked services, resolved now so loads never probe
    let servicos_aplicados = piece
        .selected_services
        .iter()
        .filter(|(_, sel)| sel.is_checked())
        .map(|(id, sel)| AppliedServiceDoc {
            id: id.clone(),
            nome: service_display_name(id, sel, catalog),
        })
        .collect();

    PecaDoc {
        id: piece.id.clone(),
        nome: piece.descriptor.name().to_string(),
        parte_id,
        sem_dimensao: piece.is_quantity_only(),
        altura_mm: piece.height.millimeters(),
        largura_mm: piece.width.millimeters(),
        quantidade: piece.quantity,
        produto: piece.product.as_ref().map(ProdutoDoc::from_snapshot),
        servicos_selecionados,
        servicos_aplicados,
        adicionado_em: piece.added_at,
    }
}

// =============================================================================
// Decode
// =============================================================================

/// Parses and validates a backend quote document.
///
/// Legacy selection shapes normalize into `ServiceSelection` here; nameless
/// legacy selections recover their display name from the document's own
/// `servicos_aplicados` pairs. Values the engine refuses (zero quantities,
/// negative prices, runaway dimensions) are rejected with a typed error.
pub fn decode_quote(json: &str) -> PersistResult<DecodedQuote> {
    let doc: OrcamentoDoc = serde_json::from_str(json)?;

    validation::validate_quote_size(doc.pecas.len())?;

    let mut pieces = Vec::with_capacity(doc.pecas.len());
    for peca in doc.pecas {
        pieces.push(decode_piece(peca)?);
    }

    let discount = match doc.tipo_desconto.as_str() {
        "valor" => Discount::Valor(Money::from_cents(doc.desconto.max(0))),
        // `percentual`, plus anything unrecognized: the only other writer
        // shape ever observed
        _ => Discount::Percentual(Percent::from_bps(
            doc.desconto.clamp(0, u32::MAX as i64) as u32
        )),
    };

    let draft = QuoteDraft {
        pieces,
        discount,
        freight: Money::from_cents(doc.frete).clamp_non_negative(),
        created_at: doc.criado_em,
    };

    Ok(DecodedQuote {
        draft,
        stored_total: Money::from_cents(doc.orcamento_total),
    })
}

fn decode_piece(peca: PecaDoc) -> PersistResult<Piece> {
    validation::validate_piece_name(&peca.nome)?;
    validation::validate_quantity(peca.quantidade)?;
    validation::validate_dimension_mm(peca.altura_mm)?;
    validation::validate_dimension_mm(peca.largura_mm)?;

    if let Some(produto) = &peca.produto {
        validation::validate_reference_id(&produto.id)?;
        for price in [produto.preco_venda, produto.preco_m2, produto.preco_promocional]
            .into_iter()
            .flatten()
        {
            validation::validate_price_cents(price)?;
        }
    }

    let descriptor = if peca.sem_dimensao {
        PieceDescriptor::QuantityOnly {
            name: peca.nome.clone(),
        }
    } else if let Some(part_id) = peca.parte_id.clone() {
        PieceDescriptor::CatalogPart {
            part_id,
            name: peca.nome.clone(),
        }
    } else {
        PieceDescriptor::Custom {
            name: peca.nome.clone(),
        }
    };

    let selected_services = peca
        .servicos_selecionados
        .iter()
        .map(|(id, doc)| {
            let mut selection = doc.normalize();
            // Legacy entries carry no name; the save-time pairs do
            if let ServiceSelection::Checked { name: None } = &selection {
                if let Some(applied) = peca.servicos_aplicados.iter().find(|a| &a.id == id) {
                    selection = ServiceSelection::checked(applied.nome.clone());
                }
            }
            (id.clone(), selection)
        })
        .collect();

    Ok(Piece {
        id: peca.id,
        descriptor,
        height: Meters::from_millimeters(peca.altura_mm),
        width: Meters::from_millimeters(peca.largura_mm),
        quantity: peca.quantidade,
        product: peca.produto.map(ProdutoDoc::into_snapshot),
        selected_services,
        added_at: peca.adicionado_em,
    })
}

// =============================================================================
// Verify
// =============================================================================

/// Checks that a stored total matches what the engine computes from the
/// draft's own inputs.
pub fn verify_total(
    draft: &QuoteDraft,
    catalog: &ServiceCatalog,
    stored_total: Money,
) -> PersistResult<()> {
    let computed = draft.totals(catalog).grand_total;
    if computed != stored_total {
        return Err(PersistError::TotalMismatch {
            stored: stored_total.cents(),
            computed: computed.cents(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use envelopa_core::types::{AdditionalService, ServiceUnit, SERVICE_TYPE_WRAP};
    use envelopa_core::types::ProductSnapshot;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::from_services(vec![AdditionalService {
            id: "7".to_string(),
            name: "Aplicação".to_string(),
            price_cents: 500,
            unit: ServiceUnit::SquareMeter,
            category: None,
            is_active: true,
            service_type: SERVICE_TYPE_WRAP.to_string(),
        }])
    }

    fn sample_draft() -> QuoteDraft {
        let mut draft = QuoteDraft::new();
        let svc = catalog().find("7").unwrap().clone();
        let piece = draft
            .add_piece(PieceDescriptor::Custom {
                name: "Capô".to_string(),
            })
            .unwrap();
        piece.set_dimensions(Meters::parse_lenient("1,0"), Meters::parse_lenient("2,0"));
        piece.select_product(ProductSnapshot {
            product_id: "p1".to_string(),
            name: "Vinil Preto".to_string(),
            list_price_cents: Some(2000),
            square_meter_price_cents: None,
            promo_price_cents: None,
            promo_active: false,
        });
        piece.toggle_service(&svc, true);
        draft.set_discount(Discount::Percentual(Percent::from_bps(1000)));
        draft.set_freight(Money::from_cents(1500));
        draft
    }

    #[test]
    fn test_round_trip_preserves_draft_and_total() {
        let catalog = catalog();
        let draft = sample_draft();
        let expected = draft.totals(&catalog);

        let json = encode_quote(&draft, &catalog).unwrap();
        let decoded = decode_quote(&json).unwrap();

        assert_eq!(decoded.stored_total, expected.grand_total);
        verify_total(&decoded.draft, &catalog, decoded.stored_total).unwrap();

        assert_eq!(decoded.draft.piece_count(), 1);
        assert_eq!(decoded.draft.totals(&catalog), expected);

        let piece = &decoded.draft.pieces[0];
        assert_eq!(piece.descriptor.name(), "Capô");
        assert_eq!(
            piece.selected_services.get("7"),
            Some(&ServiceSelection::checked("Aplicação"))
        );
        assert_eq!(
            piece.product.as_ref().unwrap().effective_unit_price().cents(),
            2000
        );
    }

    #[test]
    fn test_encoded_total_matches_engine_at_save_time() {
        let catalog = catalog();
        let draft = sample_draft();

        let json = encode_quote(&draft, &catalog).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        // 2 m² × R$20 + 2 m² × R$5 = R$50; −10% = 45; +15 frete = 60
        assert_eq!(value["orcamento_total"], 6000);
        assert_eq!(value["material_total"], 4000);
        assert_eq!(value["servicos_total"], 1000);
    }

    #[test]
    fn test_decode_legacy_document() {
        // A quote saved by the legacy writer: boolean selections, name
        // only present in servicos_aplicados.
        let json = r#"{
            "pecas": [{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "nome": "Porta",
                "altura_mm": 1000,
                "largura_mm": 1000,
                "quantidade": 2,
                "servicos_selecionados": { "7": true, "9": false },
                "servicos_aplicados": [ { "id": "7", "nome": "Aplicação" } ],
                "adicionado_em": "2024-03-01T12:00:00Z"
            }],
            "tipo_desconto": "percentual",
            "desconto": 0,
            "frete": 0,
            "material_total": 0,
            "servicos_total": 1000,
            "orcamento_total": 1000,
            "criado_em": "2024-03-01T12:00:00Z"
        }"#;

        let decoded = decode_quote(json).unwrap();
        let piece = &decoded.draft.pieces[0];

        // Legacy `true` normalized and its name recovered from the pairs
        assert_eq!(
            piece.selected_services.get("7"),
            Some(&ServiceSelection::checked("Aplicação"))
        );
        assert_eq!(
            piece.selected_services.get("9"),
            Some(&ServiceSelection::Unchecked)
        );

        // 2 m² × R$5 service = R$ 10,00; verifies against the stored total
        verify_total(&decoded.draft, &catalog(), decoded.stored_total).unwrap();
    }

    #[test]
    fn test_verify_rejects_tampered_total() {
        let catalog = catalog();
        let draft = sample_draft();

        let json = encode_quote(&draft, &catalog).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["orcamento_total"] = serde_json::json!(9999);

        let decoded = decode_quote(&value.to_string()).unwrap();
        let err = verify_total(&decoded.draft, &catalog, decoded.stored_total).unwrap_err();
        assert!(matches!(err, PersistError::TotalMismatch { stored: 9999, .. }));
    }

    #[test]
    fn test_decode_rejects_invalid_quantity() {
        let json = r#"{
            "pecas": [{
                "id": "x",
                "nome": "Porta",
                "altura_mm": 1000,
                "largura_mm": 1000,
                "quantidade": 0,
                "adicionado_em": "2024-03-01T12:00:00Z"
            }],
            "tipo_desconto": "percentual",
            "desconto": 0,
            "frete": 0,
            "material_total": 0,
            "servicos_total": 0,
            "orcamento_total": 0,
            "criado_em": "2024-03-01T12:00:00Z"
        }"#;

        let err = decode_quote(json).unwrap_err();
        assert!(matches!(err, PersistError::Invalid(_)));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(matches!(
            decode_quote("not json").unwrap_err(),
            PersistError::Json(_)
        ));
    }

    #[test]
    fn test_quantity_only_piece_round_trips() {
        let catalog = ServiceCatalog::empty();
        let mut draft = QuoteDraft::new();
        let piece = draft
            .add_piece(PieceDescriptor::QuantityOnly {
                name: "Kit soleira".to_string(),
            })
            .unwrap();
        piece.set_quantity(5);
        piece.select_product(ProductSnapshot {
            product_id: "p2".to_string(),
            name: "Kit".to_string(),
            list_price_cents: Some(1000),
            square_meter_price_cents: None,
            promo_price_cents: None,
            promo_active: false,
        });

        let json = encode_quote(&draft, &catalog).unwrap();
        let decoded = decode_quote(&json).unwrap();

        let piece = &decoded.draft.pieces[0];
        assert!(piece.is_quantity_only());
        assert_eq!(piece.material_subtotal().cents(), 5000);
        assert_eq!(decoded.stored_total.cents(), 5000);
    }

    #[test]
    fn test_fixed_discount_round_trips() {
        let catalog = catalog();
        let mut draft = sample_draft();
        draft.set_discount(Discount::Valor(Money::from_cents(700)));

        let json = encode_quote(&draft, &catalog).unwrap();
        let decoded = decode_quote(&json).unwrap();

        assert_eq!(
            decoded.draft.discount,
            Discount::Valor(Money::from_cents(700))
        );
        verify_total(&decoded.draft, &catalog, decoded.stored_total).unwrap();
    }
}

//! End-to-end behaviour of the public extraction API.

use hrdoc_core::{
    classify_document_type, extract_date, extract_name, format_name, normalize_date, recover_json,
    DocumentInput, DocumentType, RecordAssembler, RecordExtractor,
};
use pretty_assertions::assert_eq;

#[test]
fn iso_dates_round_trip() {
    for iso in ["2024-01-31", "2020-02-29", "1987-06-15", "2031-11-30"] {
        assert_eq!(normalize_date(iso), iso);
    }
}

#[test]
fn calendar_invalid_dates_are_empty() {
    assert_eq!(normalize_date("2024-02-30"), "");
    assert_eq!(normalize_date("31/04/2023"), "");
}

#[test]
fn name_formatting_is_idempotent() {
    for raw in ["ANA DOS SANTOS", "de Silva", "JOÃO JOSÉ 123", "o'brien mcdonald", "  "] {
        let once = format_name(raw);
        assert_eq!(format_name(&once), once);
    }
}

#[test]
fn canonical_label_beats_banking_text() {
    let text = "Penhora de vencimentos. IBAN PT50 0002 0123 1234 5678 9015 4, NIB indicado.";
    assert_eq!(classify_document_type("Penhoras", text), DocumentType::Garnishment);
    // Non-canonical labels are overridden by the same text.
    assert_eq!(classify_document_type("penhora", text), DocumentType::BankAccount);
}

#[test]
fn fixed_term_contract_is_admission() {
    assert_eq!(classify_document_type("Contrato a termo certo", ""), DocumentType::Admission);
}

#[test]
fn iban_in_text_is_bank_account() {
    assert_eq!(
        classify_document_type("", "IBAN: PT50 0002 0123 1234 5678 9015 4"),
        DocumentType::BankAccount
    );
}

#[test]
fn signature_context_wins_over_position() {
    let padding = "Lorem ipsum dolor sit amet. ".repeat(6);
    let text = format!("Referência 03/01/2022\n{padding}\nAssinatura do colaborador em 20/06/2023");
    assert_eq!(extract_date(None, &text), "2023-06-20");
}

#[test]
fn name_with_digits_falls_back_to_text() {
    let text = "Ficha de colaborador\nNome completo: Beatriz Sousa Marques\n";
    assert_eq!(extract_name(Some("JOÃO JOSÉ 123"), text), "Beatriz Sousa Marques");
}

#[test]
fn connector_prefixed_single_name_is_rejected() {
    assert_eq!(format_name("de Silva"), "");
}

#[test]
fn json_after_prose_is_recovered() {
    let map = recover_json("Here is the result: {\"document_date\": \"2024-02-12\"}");
    assert_eq!(map.get("document_date").and_then(|v| v.as_str()), Some("2024-02-12"));
}

#[test]
fn assembler_through_trait_object() {
    let extractor: Box<dyn RecordExtractor> = Box::new(RecordAssembler::new());
    let input = DocumentInput::new(
        "doc-1",
        "```json\n{\"nome_colaborador\": \"PAULO JORGE NUNES\", \"data_documento\": \"12.Fev.2024\", \"tipo_documento\": \"Baixa médica\"}\n```",
        "Certificado de incapacidade temporária",
    );
    let record = extractor.extract_document(&input);

    assert_eq!(record.employee_name, "Paulo Jorge Nunes");
    assert_eq!(record.document_date, "2024-02-12");
    assert_eq!(record.document_type, DocumentType::SickLeave);
}

#[test]
fn records_serialize_with_canonical_labels() {
    let record = RecordAssembler::new().assemble(r#"{"document_type": "Rescisão/Demissão"}"#, "");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["document_type"], "Rescisão/Demissão");
    assert_eq!(json["employee_name"], "");
    assert_eq!(json["document_date"], "");
}

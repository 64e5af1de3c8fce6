//! Record assembler reconciling the upstream guess with the document text.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::document::DocumentInput;
use crate::models::record::{FieldSource, FieldSources, NormalizedRecord};

use super::rules::{
    ClassificationRule, DateExtractor, DocumentTypeClassifier, NameExtractor, UpstreamGuess,
};
use super::RecordExtractor;

/// Score attached to values that came straight from the upstream candidate.
const UPSTREAM_SCORE: u32 = u32::MAX;

/// Result of assembling one record, with provenance and warnings.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// The normalized record.
    pub record: NormalizedRecord,
    /// Where each field's value came from.
    pub sources: FieldSources,
    /// Fields that had to fall back or stayed undetermined.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    /// Whether a human should look at this record before it is trusted.
    pub fn needs_review(&self) -> bool {
        self.record.needs_review()
    }
}

/// Assembles [`NormalizedRecord`]s: upstream candidate first, document text second.
pub struct RecordAssembler {
    classifier: DocumentTypeClassifier,
    names: NameExtractor,
    dates: DateExtractor,
}

impl RecordAssembler {
    /// Create an assembler with default settings.
    pub fn new() -> Self {
        Self {
            classifier: DocumentTypeClassifier::new(),
            names: NameExtractor::new(),
            dates: DateExtractor::new(),
        }
    }

    /// Create an assembler from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_banking_override(config.banking_override)
            .with_line_scan(config.name_line_scan)
            .with_date_window(config.date_context_window)
    }

    /// Set whether banking evidence overrides a non-canonical type label.
    pub fn with_banking_override(mut self, enabled: bool) -> Self {
        self.classifier = self.classifier.with_banking_override(enabled);
        self
    }

    /// Set whether any name-shaped line may be taken as the employee name.
    pub fn with_line_scan(mut self, enabled: bool) -> Self {
        self.names = self.names.with_line_scan(enabled);
        self
    }

    /// Set the date context window, in characters.
    pub fn with_date_window(mut self, window: usize) -> Self {
        self.dates = self.dates.with_context_window(window);
        self
    }

    /// Assemble the record for one document.
    pub fn assemble(&self, response: &str, text: &str) -> NormalizedRecord {
        self.assemble_report(response, text).record
    }

    /// Assemble the record for one document, with provenance and warnings.
    pub fn assemble_report(&self, response: &str, text: &str) -> ExtractionReport {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let mut sources = FieldSources::default();

        debug!(
            "Assembling record from {} chars of response and {} chars of text",
            response.chars().count(),
            text.chars().count()
        );

        let guess = UpstreamGuess::parse(response);

        // Document type
        let classification = self
            .classifier
            .classify(guess.document_type.as_deref().unwrap_or_default(), text);
        sources.document_type = match classification.rule {
            ClassificationRule::ExactLabel | ClassificationRule::LabelMarker(_) => {
                FieldSource::Upstream
            }
            ClassificationRule::BankingEvidence => FieldSource::DocumentText,
            ClassificationRule::Default => FieldSource::Undetermined,
        };
        match classification.rule {
            ClassificationRule::ExactLabel => {}
            ClassificationRule::Default => {
                warnings.push("Could not classify document type, using Diversos".to_string())
            }
            rule => warnings.push(format!(
                "Document type {:?} mapped to {} by {:?}",
                guess.document_type.as_deref().unwrap_or_default(),
                classification.document_type,
                rule
            )),
        }

        // Employee name
        let name = self.names.resolve(guess.employee_name.as_deref(), text);
        sources.employee_name = source_of(name.as_ref().map(|m| m.score));
        match sources.employee_name {
            FieldSource::Upstream => {}
            FieldSource::DocumentText => {
                warnings.push("Employee name taken from document text".to_string())
            }
            FieldSource::Undetermined => {
                warnings.push("Could not extract employee name".to_string())
            }
        }

        // Document date
        let date = self.dates.resolve(guess.document_date.as_deref(), text);
        sources.document_date = source_of(date.as_ref().map(|m| m.score));
        match sources.document_date {
            FieldSource::Upstream => {}
            FieldSource::DocumentText => {
                warnings.push("Document date taken from document text".to_string())
            }
            FieldSource::Undetermined => {
                warnings.push("Could not extract document date".to_string())
            }
        }

        let record = NormalizedRecord {
            employee_name: name.map(|m| m.value).unwrap_or_default(),
            document_date: date
                .map(|m| m.value.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            document_type: classification.document_type,
        };

        info!(
            "Assembled record: type={}, date={:?}, name={:?}",
            record.document_type, record.document_date, record.employee_name
        );

        ExtractionReport {
            record,
            sources,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Assemble the report for a loaded document.
    pub fn process(&self, input: &DocumentInput) -> ExtractionReport {
        self.assemble_report(&input.response, &input.text)
    }
}

fn source_of(score: Option<u32>) -> FieldSource {
    match score {
        Some(UPSTREAM_SCORE) => FieldSource::Upstream,
        Some(_) => FieldSource::DocumentText,
        None => FieldSource::Undetermined,
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor for RecordAssembler {
    fn extract(&self, response: &str, text: &str) -> NormalizedRecord {
        self.assemble(response, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::DocumentType;
    use pretty_assertions::assert_eq;

    const CONTRACT: &str = "CONTRATO DE TRABALHO A TERMO CERTO\n\
        Entre Loja Exemplo, S.A., NIPC 500000000, e\n\
        Trabalhador: MARIA DA SILVA SANTOS, NIF 123456789\n\
        Data de início de vigência: 01/03/2024\n\
        Lisboa, 28 de Fevereiro de 2024\n";

    #[test]
    fn test_upstream_guess_is_used() {
        let response = r#"{"employee_name": "MARIA DA SILVA SANTOS", "document_date": "2024-03-01", "document_type": "Admissão"}"#;
        let report = RecordAssembler::new().assemble_report(response, CONTRACT);

        assert_eq!(
            report.record,
            NormalizedRecord {
                employee_name: "Maria da Silva Santos".to_string(),
                document_date: "2024-03-01".to_string(),
                document_type: DocumentType::Admission,
            }
        );
        assert_eq!(report.sources.employee_name, FieldSource::Upstream);
        assert_eq!(report.sources.document_date, FieldSource::Upstream);
        assert_eq!(report.sources.document_type, FieldSource::Upstream);
        assert!(report.warnings.is_empty());
        assert!(!report.needs_review());
    }

    #[test]
    fn test_falls_back_to_document_text() {
        let report = RecordAssembler::new().assemble_report("Sorry, I cannot help.", CONTRACT);

        assert_eq!(report.record.employee_name, "Maria da Silva Santos");
        assert_eq!(report.record.document_date, "2024-03-01");
        assert_eq!(report.record.document_type, DocumentType::Other);
        assert_eq!(report.sources.employee_name, FieldSource::DocumentText);
        assert_eq!(report.sources.document_date, FieldSource::DocumentText);
        assert_eq!(report.sources.document_type, FieldSource::Undetermined);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.needs_review());
    }

    #[test]
    fn test_invalid_upstream_date_is_replaced() {
        let response = "```json\n{\"document_date\": \"2024-02-30\", \"document_type\": \"contrato\"}\n```";
        let report = RecordAssembler::new().assemble_report(response, CONTRACT);

        assert_eq!(report.record.document_date, "2024-03-01");
        assert_eq!(report.sources.document_date, FieldSource::DocumentText);
        assert_eq!(report.record.document_type, DocumentType::Admission);
    }

    #[test]
    fn test_bank_document() {
        let text = "Comprovativo de IBAN\n\
            Titular: RUI MANUEL ALVES\n\
            IBAN: PT50 0002 0123 1234 5678 9015 4\n\
            Emitido em 05/01/2024";
        let response = r#"{"tipo_documento": "Comprovativo", "nome_colaborador": "", "data_documento": null}"#;
        let record = RecordAssembler::new().assemble(response, text);

        assert_eq!(record.document_type, DocumentType::BankAccount);
        assert_eq!(record.employee_name, "Rui Manuel Alves");
        assert_eq!(record.document_date, "2024-01-05");
    }

    #[test]
    fn test_empty_inputs_give_sentinels() {
        let record = RecordAssembler::new().assemble("", "");
        assert_eq!(record, NormalizedRecord::default());
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            banking_override: false,
            name_line_scan: false,
            date_context_window: 100,
        };
        let assembler = RecordAssembler::from_config(&config);
        let record = assembler.assemble(
            r#"{"document_type": "Declaração de rendimentos"}"#,
            "CARLOS PINTO\nNIB 0035 0000 0000 0000 0000 0",
        );
        assert_eq!(record.document_type, DocumentType::Declarations);
        assert_eq!(record.employee_name, "");
    }

    #[test]
    fn test_process_document_input() {
        let input = DocumentInput::new(
            "doc-7",
            r#"{"document_type": "CV"}"#,
            "Curriculum Vitae (2024)\nANA COSTA",
        );
        let report = RecordAssembler::new().process(&input);
        assert_eq!(report.record.document_type, DocumentType::Cv);
        assert_eq!(report.record.employee_name, "Ana Costa");
    }
}

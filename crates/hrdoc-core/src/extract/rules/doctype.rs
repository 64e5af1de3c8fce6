//! Mapping of free-form type labels onto the canonical document types.

use tracing::debug;

use crate::models::record::DocumentType;

use super::banking::has_banking_evidence;
use super::fold_lower;

/// Substring markers checked against the folded label, top to bottom.
///
/// The order is part of the contract: labels such as "Aditamento ao contrato"
/// contain several markers and the first row that matches wins.
pub const LABEL_MARKERS: &[(&[&str], DocumentType)] = &[
    (&["contrato", "termo"], DocumentType::Admission),
    (&["curriculo", "cv"], DocumentType::Cv),
    (&["criminal"], DocumentType::CriminalRecord),
    (&["irs"], DocumentType::TaxDeclaration),
    (&["penhor"], DocumentType::Garnishment),
    (&["disciplina"], DocumentType::DisciplinaryProcess),
    (&["aditamento"], DocumentType::ContractAmendment),
    (&["absent", "baixa"], DocumentType::SickLeave),
    (&["pessoal"], DocumentType::PersonalData),
    (&["rescis", "demiss"], DocumentType::Termination),
    (&["declara"], DocumentType::Declarations),
];

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// The label already was a canonical label.
    ExactLabel,
    /// Banking evidence in the label or the document text.
    BankingEvidence,
    /// A marker from [`LABEL_MARKERS`] matched the label.
    LabelMarker(&'static str),
    /// Nothing matched.
    Default,
}

/// A document type together with the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub document_type: DocumentType,
    pub rule: ClassificationRule,
}

/// Classifier for document type labels.
pub struct DocumentTypeClassifier {
    banking_override: bool,
}

impl DocumentTypeClassifier {
    pub fn new() -> Self {
        Self {
            banking_override: true,
        }
    }

    /// Set whether banking evidence overrides a non-canonical label.
    pub fn with_banking_override(mut self, enabled: bool) -> Self {
        self.banking_override = enabled;
        self
    }

    /// Classify `label` using `text` as supporting evidence.
    pub fn classify(&self, label: &str, text: &str) -> Classification {
        let label = label.trim();
        if let Some(document_type) = DocumentType::from_label(label) {
            return Classification {
                document_type,
                rule: ClassificationRule::ExactLabel,
            };
        }

        if self.banking_override && (has_banking_evidence(label) || has_banking_evidence(text)) {
            debug!("Banking evidence found, classifying {:?} as NIB", label);
            return Classification {
                document_type: DocumentType::BankAccount,
                rule: ClassificationRule::BankingEvidence,
            };
        }

        let folded = fold_lower(label);
        for (markers, document_type) in LABEL_MARKERS {
            if let Some(marker) = markers.iter().find(|m| folded.contains(*m)) {
                return Classification {
                    document_type: *document_type,
                    rule: ClassificationRule::LabelMarker(*marker),
                };
            }
        }

        Classification {
            document_type: DocumentType::Other,
            rule: ClassificationRule::Default,
        }
    }
}

impl Default for DocumentTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a raw label with the default rules.
pub fn classify_document_type(label: &str, text: &str) -> DocumentType {
    DocumentTypeClassifier::new().classify(label, text).document_type
}

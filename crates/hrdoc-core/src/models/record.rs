//! Output record for a single HR document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical document types an HR document can be classified as.
///
/// The serialized form is the Portuguese label, which is also the exact string
/// the upstream model is asked to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Admission paperwork and employment contracts (admissão).
    #[serde(rename = "Admissão")]
    Admission,
    /// Personal data sheets (dados pessoais).
    #[serde(rename = "Dados Pessoais")]
    PersonalData,
    /// Bank account proof (NIB / IBAN).
    #[serde(rename = "NIB")]
    BankAccount,
    /// Income tax declaration (IRS).
    #[serde(rename = "Declaração IRS")]
    TaxDeclaration,
    /// Curriculum vitae.
    #[serde(rename = "CV")]
    Cv,
    /// Criminal record certificate (registo criminal).
    #[serde(rename = "Registo Criminal")]
    CriminalRecord,
    /// Salary garnishment (penhoras).
    #[serde(rename = "Penhoras")]
    Garnishment,
    /// Disciplinary proceedings.
    #[serde(rename = "Processos Disciplinares")]
    DisciplinaryProcess,
    /// Amendments to the employment contract (aditamentos).
    #[serde(rename = "Aditamentos ao Contrato de Trabalho")]
    ContractAmendment,
    /// Generic declarations.
    #[serde(rename = "Declarações")]
    Declarations,
    /// Termination or resignation (rescisão/demissão).
    #[serde(rename = "Rescisão/Demissão")]
    Termination,
    /// Anything else (diversos).
    #[default]
    #[serde(rename = "Diversos")]
    Other,
    /// Absences and sick leave (absentismos).
    #[serde(rename = "Absentismos")]
    SickLeave,
}

impl DocumentType {
    /// Every canonical type, in the order they are offered to the upstream model.
    pub const ALL: [DocumentType; 13] = [
        DocumentType::Admission,
        DocumentType::PersonalData,
        DocumentType::BankAccount,
        DocumentType::TaxDeclaration,
        DocumentType::Cv,
        DocumentType::CriminalRecord,
        DocumentType::Garnishment,
        DocumentType::DisciplinaryProcess,
        DocumentType::ContractAmendment,
        DocumentType::Declarations,
        DocumentType::Termination,
        DocumentType::Other,
        DocumentType::SickLeave,
    ];

    /// Canonical label for this type.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Admission => "Admissão",
            DocumentType::PersonalData => "Dados Pessoais",
            DocumentType::BankAccount => "NIB",
            DocumentType::TaxDeclaration => "Declaração IRS",
            DocumentType::Cv => "CV",
            DocumentType::CriminalRecord => "Registo Criminal",
            DocumentType::Garnishment => "Penhoras",
            DocumentType::DisciplinaryProcess => "Processos Disciplinares",
            DocumentType::ContractAmendment => "Aditamentos ao Contrato de Trabalho",
            DocumentType::Declarations => "Declarações",
            DocumentType::Termination => "Rescisão/Demissão",
            DocumentType::Other => "Diversos",
            DocumentType::SickLeave => "Absentismos",
        }
    }

    /// Look up a type by its exact (case-sensitive) canonical label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.label() == label)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The normalized triple extracted from one document.
///
/// Empty strings mean "not determined"; they are never a valid value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Formatted employee name (at least two words) or empty.
    pub employee_name: String,

    /// Document date as `YYYY-MM-DD` or empty.
    pub document_date: String,

    /// Canonical document type.
    pub document_type: DocumentType,
}

impl NormalizedRecord {
    /// Names of the fields that carry no usable value.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.employee_name.is_empty() {
            missing.push("employee_name");
        }
        if self.document_date.is_empty() {
            missing.push("document_date");
        }
        if self.document_type == DocumentType::Other {
            missing.push("document_type");
        }
        missing
    }

    /// Whether a human should look at this record before it is trusted.
    pub fn needs_review(&self) -> bool {
        !self.missing_fields().is_empty()
    }
}

/// Where the value of an output field came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// The upstream model's candidate survived normalization.
    Upstream,
    /// Recovered by scanning the document text.
    DocumentText,
    /// Nothing usable was found; the field holds its sentinel.
    #[default]
    Undetermined,
}

/// Per-field provenance of a [`NormalizedRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSources {
    pub employee_name: FieldSource,
    pub document_date: FieldSource,
    pub document_type: FieldSource,
}

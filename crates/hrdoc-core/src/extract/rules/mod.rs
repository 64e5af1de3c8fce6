//! Rule-based field extractors for Portuguese HR documents.

pub mod banking;
pub mod dates;
pub mod doctype;
pub mod json;
pub mod names;
pub mod patterns;

pub use banking::{find_iban_like, has_banking_evidence, IbanExtractor};
pub use dates::{
    extract_date, normalize_date, parse_date, select_best_date, DateCandidate, DateExtractor,
};
pub use doctype::{
    classify_document_type, Classification, ClassificationRule, DocumentTypeClassifier,
};
pub use json::{recover_json, TargetField, UpstreamGuess};
pub use names::{extract_name, format_name, NameExtractor};

/// Trait for field extractors that scan full document text.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the preferred occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in preference order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with its rank and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Rule-specific score; higher is better.
    pub score: u32,
    /// Byte span in the scanned text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, score: u32, source: impl Into<String>) -> Self {
        Self {
            value,
            score,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Start offset, or `usize::MAX` when the match has no position.
    pub fn start(&self) -> usize {
        self.position.map(|(start, _)| start).unwrap_or(usize::MAX)
    }
}

/// Lower-case `text` and strip Portuguese diacritics, for keyword matching.
pub fn fold_lower(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_lower() {
        assert_eq!(fold_lower("Início de Vigência"), "inicio de vigencia");
        assert_eq!(fold_lower("DECLARAÇÃO"), "declaracao");
        assert_eq!(fold_lower("Currículo"), "curriculo");
    }

    #[test]
    fn test_match_start() {
        let m = ExtractionMatch::new("x", 0, "x");
        assert_eq!(m.start(), usize::MAX);
        assert_eq!(m.with_position(4, 5).start(), 4);
    }
}

//! Detection of bank-account documents (IBAN / NIB evidence).

use super::patterns::{BANKING_KEYWORDS, IBAN_SHAPED};
use super::{ExtractionMatch, FieldExtractor};

/// Valid IBAN lengths once whitespace is removed.
const IBAN_LENGTH: std::ops::RangeInclusive<usize> = 15..=34;

/// Extractor for IBAN-shaped tokens.
///
/// Only the shape and length are checked, not the mod-97 checksum.
pub struct IbanExtractor;

impl IbanExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IbanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IbanExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        IBAN_SHAPED
            .find_iter(text)
            .filter_map(|m| {
                let compact: String = m.as_str().chars().filter(|c| !c.is_whitespace()).collect();
                IBAN_LENGTH.contains(&compact.len()).then(|| {
                    ExtractionMatch::new(compact, 1, m.as_str()).with_position(m.start(), m.end())
                })
            })
            .collect()
    }
}

/// First IBAN-shaped token in `text`, whitespace removed.
pub fn find_iban_like(text: &str) -> Option<String> {
    IbanExtractor::new().extract(text).map(|m| m.value)
}

/// Whether `text` carries banking keywords or an IBAN-shaped token.
pub fn has_banking_evidence(text: &str) -> bool {
    BANKING_KEYWORDS.is_match(text) || find_iban_like(text).is_some()
}

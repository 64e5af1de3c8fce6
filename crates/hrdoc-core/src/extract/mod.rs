//! HR document field extraction module.

mod assembler;
pub mod rules;

pub use assembler::{ExtractionReport, RecordAssembler};

use crate::models::document::DocumentInput;
use crate::models::record::NormalizedRecord;

/// Trait for record extractors.
///
/// Extraction never fails: undetermined fields come back as empty strings and
/// an unclassifiable document as `Diversos`.
pub trait RecordExtractor {
    /// Build the record from the upstream model response and the document text.
    fn extract(&self, response: &str, text: &str) -> NormalizedRecord;

    /// Build the record for a loaded document.
    fn extract_document(&self, input: &DocumentInput) -> NormalizedRecord {
        self.extract(&input.response, &input.text)
    }
}

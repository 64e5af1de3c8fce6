//! Core library for HR document field extraction.
//!
//! This crate provides:
//! - Recovery of the upstream model's JSON answer from noisy text
//! - Classification into the canonical HR document types
//! - Employee name extraction and formatting
//! - Document date normalization and full-text date scoring
//!
//! Every operation is pure and synchronous; documents can be processed in
//! parallel without coordination.

pub mod error;
pub mod extract;
pub mod models;

pub use error::{HrdocError, Result};
pub use extract::rules::{
    classify_document_type, extract_date, extract_name, format_name, normalize_date, recover_json,
};
pub use extract::{ExtractionReport, RecordAssembler, RecordExtractor};
pub use models::config::HrdocConfig;
pub use models::document::DocumentInput;
pub use models::record::{DocumentType, FieldSource, FieldSources, NormalizedRecord};

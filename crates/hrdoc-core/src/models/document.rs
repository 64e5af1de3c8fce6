//! A unit of extraction work: one document's text plus the upstream model response.

use std::path::Path;

use tracing::debug;

use crate::error::{HrdocError, Result};

/// Inputs for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInput {
    /// Document identifier (usually the file stem).
    pub id: String,

    /// Raw textual response of the upstream model, in any shape.
    pub response: String,

    /// Full extracted document text.
    pub text: String,
}

impl DocumentInput {
    pub fn new(
        id: impl Into<String>,
        response: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            response: response.into(),
            text: text.into(),
        }
    }

    /// Load a document from its text file and an optional response file.
    ///
    /// The identifier is the text file's stem. Without a response file the
    /// upstream guess is empty and every field falls back to the text.
    pub fn from_files(text_path: &Path, response_path: Option<&Path>) -> Result<Self> {
        let id = text_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                HrdocError::Input(format!(
                    "cannot derive a document id from {}",
                    text_path.display()
                ))
            })?
            .to_string();

        let text = std::fs::read_to_string(text_path)?;
        let response = match response_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => String::new(),
        };

        debug!(
            "Loaded document {} ({} chars of text, {} chars of response)",
            id,
            text.chars().count(),
            response.chars().count()
        );

        Ok(Self { id, response, text })
    }
}

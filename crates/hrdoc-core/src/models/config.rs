//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HrdocError, Result};

/// Main configuration for hrdoc.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HrdocConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Let banking evidence in the document override a non-canonical type label.
    pub banking_override: bool,

    /// When no anchored name is found, accept the first line that formats as a name.
    pub name_line_scan: bool,

    /// Characters inspected on each side of a date when scoring its context.
    pub date_context_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            banking_override: true,
            name_line_scan: true,
            date_context_window: 100,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV field delimiter.
    pub csv_delimiter: char,

    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_delimiter: ';',
            pretty_json: true,
        }
    }
}

impl OutputConfig {
    /// The CSV delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.csv_delimiter).map_err(|_| {
            HrdocError::Config(format!(
                "csv_delimiter must be an ASCII character, got {:?}",
                self.csv_delimiter
            ))
        })
    }
}

impl HrdocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<()> {
        self.output.delimiter_byte()?;
        if self.extraction.date_context_window == 0 {
            return Err(HrdocError::Config(
                "extraction.date_context_window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

//! Rendering of extracted records as JSON, CSV or plain text.

use serde::Serialize;

use hrdoc_core::models::config::OutputConfig;
use hrdoc_core::{ExtractionReport, FieldSources, NormalizedRecord};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// One processed document.
pub struct Processed {
    pub id: String,
    pub report: ExtractionReport,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    id_documento: &'a str,
    #[serde(flatten)]
    record: &'a NormalizedRecord,
    needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<&'a FieldSources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<&'a [String]>,
}

impl<'a> JsonRow<'a> {
    fn new(processed: &'a Processed, with_report: bool) -> Self {
        let report = &processed.report;
        Self {
            id_documento: &processed.id,
            record: &report.record,
            needs_review: report.needs_review(),
            sources: with_report.then_some(&report.sources),
            warnings: with_report.then_some(report.warnings.as_slice()),
        }
    }
}

/// Render a single document.
pub fn render_one(
    processed: &Processed,
    format: OutputFormat,
    config: &OutputConfig,
    with_report: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let row = JsonRow::new(processed, with_report);
            Ok(if config.pretty_json {
                serde_json::to_string_pretty(&row)?
            } else {
                serde_json::to_string(&row)?
            })
        }
        OutputFormat::Csv => render_csv(std::slice::from_ref(processed), config),
        OutputFormat::Text => Ok(render_text(processed)),
    }
}

/// Render many documents, in the given order.
pub fn render_many(
    processed: &[Processed],
    format: OutputFormat,
    config: &OutputConfig,
    with_report: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<JsonRow<'_>> = processed
                .iter()
                .map(|p| JsonRow::new(p, with_report))
                .collect();
            Ok(if config.pretty_json {
                serde_json::to_string_pretty(&rows)?
            } else {
                serde_json::to_string(&rows)?
            })
        }
        OutputFormat::Csv => render_csv(processed, config),
        OutputFormat::Text => Ok(processed
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn render_csv(processed: &[Processed], config: &OutputConfig) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .from_writer(vec![]);

    wtr.write_record([
        "id_documento",
        "nome_colaborador",
        "data_documento",
        "tipo_documento",
        "needs_review",
    ])?;

    for p in processed {
        let record = &p.report.record;
        wtr.write_record([
            p.id.as_str(),
            record.employee_name.as_str(),
            record.document_date.as_str(),
            record.document_type.label(),
            if p.report.needs_review() { "true" } else { "false" },
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn render_text(processed: &Processed) -> String {
    let report = &processed.report;
    let record = &report.record;
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    let mut output = String::new();
    output.push_str(&format!("Document: {}\n", processed.id));
    output.push_str(&format!("  Type:     {}\n", record.document_type));
    output.push_str(&format!("  Date:     {}\n", or_dash(&record.document_date)));
    output.push_str(&format!("  Employee: {}\n", or_dash(&record.employee_name)));
    output.push_str(&format!(
        "  Review:   {}\n",
        if report.needs_review() { "yes" } else { "no" }
    ));
    for warning in &report.warnings {
        output.push_str(&format!("  ! {}\n", warning));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdoc_core::RecordAssembler;

    fn sample() -> Processed {
        Processed {
            id: "doc-1".to_string(),
            report: RecordAssembler::new().assemble_report(
                r#"{"employee_name": "ANA COSTA", "document_date": "2024-02-12", "document_type": "CV"}"#,
                "",
            ),
        }
    }

    #[test]
    fn test_csv_uses_configured_delimiter() {
        let csv = render_one(&sample(), OutputFormat::Csv, &OutputConfig::default(), false).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id_documento;nome_colaborador;data_documento;tipo_documento;needs_review")
        );
        assert_eq!(lines.next(), Some("doc-1;Ana Costa;2024-02-12;CV;false"));
    }

    #[test]
    fn test_json_row_is_flat() {
        let config = OutputConfig {
            csv_delimiter: ';',
            pretty_json: false,
        };
        let json = render_one(&sample(), OutputFormat::Json, &config, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id_documento"], "doc-1");
        assert_eq!(value["employee_name"], "Ana Costa");
        assert_eq!(value["document_type"], "CV");
        assert!(value.get("sources").is_none());

        let json = render_one(&sample(), OutputFormat::Json, &config, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sources"]["document_date"], "upstream");
    }

    #[test]
    fn test_text_marks_missing_fields() {
        let processed = Processed {
            id: "empty".to_string(),
            report: RecordAssembler::new().assemble_report("", ""),
        };
        let text = render_many(&[processed], OutputFormat::Text, &OutputConfig::default(), false)
            .unwrap();
        assert!(text.contains("Type:     Diversos"));
        assert!(text.contains("Date:     -"));
        assert!(text.contains("Review:   yes"));
    }
}

//! Best-effort recovery of the upstream model's JSON answer.

use serde_json::{Map, Value};
use tracing::debug;

use super::patterns::JSON_OBJECT_SPAN;

/// Recover a JSON object from free-form model output.
///
/// Tries, in order: the whole trimmed text, the contents of a Markdown code
/// fence, and the span from the first `{` to the last `}`. Anything that does
/// not decode to a JSON object yields an empty map.
pub fn recover_json(raw: &str) -> Map<String, Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Map::new();
    }

    if let Some(map) = parse_object(trimmed) {
        return map;
    }

    if let Some(map) = strip_code_fence(trimmed).and_then(parse_object) {
        debug!("Recovered upstream JSON from a code fence");
        return map;
    }

    if let Some(map) = JSON_OBJECT_SPAN
        .find(trimmed)
        .and_then(|m| parse_object(m.as_str()))
    {
        debug!("Recovered upstream JSON from an embedded object");
        return map;
    }

    debug!("No JSON object in {} chars of upstream output", trimmed.chars().count());
    Map::new()
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Inner text of a ```` ``` ```` / ```` ```json ```` fence.
fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    Some(rest.trim())
}

/// The output fields the upstream model is asked to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    EmployeeName,
    DocumentDate,
    DocumentType,
}

impl TargetField {
    /// Keys the field may appear under, in lookup order. Older prompts used
    /// the Portuguese names.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            TargetField::EmployeeName => &["employee_name", "nome_colaborador"],
            TargetField::DocumentDate => &["document_date", "data_documento"],
            TargetField::DocumentType => &["document_type", "tipo_documento"],
        }
    }

    /// Pull this field's candidate out of a recovered map.
    ///
    /// Only non-blank strings count; `null`, numbers and nested values are
    /// treated as absent.
    pub fn candidate(&self, map: &Map<String, Value>) -> Option<String> {
        self.keys().iter().find_map(|key| match map.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
    }
}

/// Field candidates recovered from one upstream response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamGuess {
    pub employee_name: Option<String>,
    pub document_date: Option<String>,
    pub document_type: Option<String>,
}

impl UpstreamGuess {
    /// Recover the JSON in `raw` and pick out each field.
    pub fn parse(raw: &str) -> Self {
        let map = recover_json(raw);
        Self {
            employee_name: TargetField::EmployeeName.candidate(&map),
            document_date: TargetField::DocumentDate.candidate(&map),
            document_type: TargetField::DocumentType.candidate(&map),
        }
    }
}

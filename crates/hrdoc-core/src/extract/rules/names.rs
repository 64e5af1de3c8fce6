//! Employee name formatting and extraction.

use tracing::debug;

use super::patterns::{FIELD_DELIMITER, NAME_ANCHOR, NAME_TOKEN};
use super::{fold_lower, ExtractionMatch, FieldExtractor};

/// Function words that live inside a name and are kept lowercase.
pub const CONNECTORS: [&str; 10] = [
    "de", "da", "do", "dos", "das", "e", "del", "della", "di", "du",
];

/// Tokens that mark document boilerplate rather than a person (folded).
pub const FORBIDDEN_TOKENS: [&str; 15] = [
    "declaracao",
    "comprovativo",
    "documento",
    "contrato",
    "termo",
    "processo",
    "penhora",
    "aditamento",
    "banco",
    "entidade",
    "numero",
    "conta",
    "iban",
    "nib",
    "multibanco",
];

/// Score of a name found right after an anchor on the same line.
const SAME_LINE_SCORE: u32 = 2;
/// Score of a name found on the line after an anchor.
const NEXT_LINE_SCORE: u32 = 1;
/// Score of a bare line that happens to look like a name.
const LINE_SCAN_SCORE: u32 = 0;

fn is_connector(token: &str) -> bool {
    CONNECTORS.contains(&token)
}

/// Upper-case the first letter of every letter run ("jean-pierre" -> "Jean-Pierre").
///
/// Expects a token already accepted by `NAME_TOKEN`, so only hyphens and
/// apostrophes separate runs and combining marks stay inside their run.
fn title_case(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut at_run_start = true;
    for c in token.chars() {
        if matches!(c, '\'' | '’' | '-') {
            out.push(c);
            at_run_start = true;
        } else if at_run_start {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => out.push(u),
                _ => out.push(c),
            }
            at_run_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Format a candidate as a person name, or `None` if it does not look like one.
pub fn try_format_name(candidate: &str) -> Option<String> {
    let mut tokens = Vec::new();
    for raw in candidate.split_whitespace() {
        if raw.chars().any(char::is_numeric) {
            return None;
        }
        let lower = raw.to_lowercase();
        if !NAME_TOKEN.is_match(&lower) {
            return None;
        }
        if is_connector(&lower) {
            tokens.push(lower);
        } else {
            tokens.push(title_case(&lower));
        }
    }

    while tokens.first().is_some_and(|t| is_connector(t)) {
        tokens.remove(0);
    }
    while tokens.last().is_some_and(|t| is_connector(t)) {
        tokens.pop();
    }

    if tokens.iter().filter(|t| !is_connector(t)).count() < 2 {
        return None;
    }
    if tokens
        .iter()
        .any(|t| FORBIDDEN_TOKENS.contains(&fold_lower(t).as_str()))
    {
        return None;
    }

    Some(tokens.join(" "))
}

/// Format a candidate as a person name; empty string when it is not one.
pub fn format_name(candidate: &str) -> String {
    try_format_name(candidate).unwrap_or_default()
}

/// Value following an anchor on the same line, up to the next field delimiter.
fn value_after_anchor(rest: &str) -> &str {
    let rest = rest.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, ':' | '-' | '–' | '—' | '.' | '=' | '>')
    });
    match FIELD_DELIMITER.find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    }
}

/// Lines of `text` with their byte offsets, trimmed, blanks dropped.
fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    let mut lines = Vec::new();
    for segment in text.split_inclusive('\n') {
        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            let lead = segment.len() - segment.trim_start().len();
            lines.push((offset + lead, trimmed));
        }
        offset += segment.len();
    }
    lines
}

/// Full-text name extractor.
///
/// Looks for anchor labels (nome, titular, colaborador, ...) first, trying the
/// rest of the anchor's line and then the following line. Optionally falls
/// back to the first line of the document that formats as a name.
pub struct NameExtractor {
    line_scan: bool,
}

impl NameExtractor {
    pub fn new() -> Self {
        Self { line_scan: true }
    }

    /// Set whether unanchored lines may be taken as the name.
    pub fn with_line_scan(mut self, enabled: bool) -> Self {
        self.line_scan = enabled;
        self
    }

    /// Format `candidate`, falling back to a scan of `text`.
    pub fn resolve(&self, candidate: Option<&str>, text: &str) -> Option<ExtractionMatch<String>> {
        if let Some(name) = candidate.and_then(try_format_name) {
            return Some(ExtractionMatch::new(name, u32::MAX, candidate.unwrap_or_default()));
        }
        if let Some(rejected) = candidate {
            debug!("Upstream name {:?} rejected, scanning document text", rejected);
        }
        self.extract(text)
    }

    fn scan(&self, text: &str, first_only: bool) -> Vec<ExtractionMatch<String>> {
        let lines = lines_with_offsets(text);
        let mut found = Vec::new();

        for (i, (offset, line)) in lines.iter().enumerate() {
            for anchor in NAME_ANCHOR.find_iter(line) {
                let value = value_after_anchor(&line[anchor.end()..]);
                if let Some(name) = try_format_name(value) {
                    let start = offset + anchor.end();
                    found.push(
                        ExtractionMatch::new(name, SAME_LINE_SCORE, value)
                            .with_position(start, offset + line.len()),
                    );
                    if first_only {
                        return found;
                    }
                }

                if let Some((next_offset, next_line)) = lines.get(i + 1) {
                    if let Some(name) = try_format_name(next_line) {
                        found.push(
                            ExtractionMatch::new(name, NEXT_LINE_SCORE, *next_line)
                                .with_position(*next_offset, next_offset + next_line.len()),
                        );
                        if first_only {
                            return found;
                        }
                    }
                }
            }
        }

        if self.line_scan {
            for (offset, line) in &lines {
                if let Some(name) = try_format_name(line) {
                    found.push(
                        ExtractionMatch::new(name, LINE_SCAN_SCORE, *line)
                            .with_position(*offset, offset + line.len()),
                    );
                    if first_only {
                        return found;
                    }
                }
            }
        }

        found
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.scan(text, true).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.scan(text, false)
    }
}

/// Resolve the employee name from an upstream candidate and the document text.
pub fn extract_name(candidate: Option<&str>, text: &str) -> String {
    NameExtractor::new()
        .resolve(candidate, text)
        .map(|m| m.value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_upper_case_name() {
        assert_eq!(format_name("MARIA DA SILVA SANTOS"), "Maria da Silva Santos");
        assert_eq!(format_name("  joão   josé  "), "João José");
    }

    #[test]
    fn test_format_hyphen_and_apostrophe() {
        assert_eq!(format_name("JEAN-PIERRE D'ARC"), "Jean-Pierre D'Arc");
        assert_eq!(format_name("ana o’neil"), "Ana O’Neil");
    }

    #[test]
    fn test_format_decomposed_accents() {
        assert_eq!(format_name("JOSE\u{301} SILVA"), "Jose\u{301} Silva");
        assert_eq!(format_name("MU\u{308}LLER SANTOS"), "Mu\u{308}ller Santos");
        let once = format_name("ANA-MARI\u{301}A COSTA");
        assert_eq!(once, "Ana-Mari\u{301}a Costa");
        assert_eq!(format_name(&once), once);
    }

    #[test]
    fn test_rejects_digits() {
        assert_eq!(format_name("JOÃO JOSÉ 123"), "");
        assert_eq!(format_name("Ana Costa2"), "");
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(format_name("Ana Costa:"), "");
        assert_eq!(format_name("Ana --Costa"), "");
        assert_eq!(format_name("Ana Costa-"), "");
        assert_eq!(format_name("ana@costa.pt Silva"), "");
    }

    #[test]
    fn test_connectors_cannot_bound_a_name() {
        assert_eq!(format_name("de Silva"), "");
        assert_eq!(format_name("da Costa e"), "");
        assert_eq!(format_name("de Ana Costa do"), "Ana Costa");
        assert_eq!(format_name("de da do"), "");
    }

    #[test]
    fn test_single_word_is_rejected() {
        assert_eq!(format_name("Silva"), "");
        assert_eq!(format_name(""), "");
    }

    #[test]
    fn test_forbidden_tokens() {
        assert_eq!(format_name("DECLARAÇÃO DE RENDIMENTOS"), "");
        assert_eq!(format_name("Declaracao Anual"), "");
        assert_eq!(format_name("Banco Popular"), "");
        assert_eq!(format_name("NÚMERO CONTA"), "");
    }

    #[test]
    fn test_format_is_idempotent() {
        let inputs = [
            "MARIA DA SILVA SANTOS",
            "de Ana Costa do",
            "JEAN-PIERRE D'ARC",
            "JOÃO JOSÉ 123",
            "straße müller",
            "ΑΝΝΑ ΠΑΠΑΔΟΠΟΥΛΟΥ",
            "",
            "x y",
        ];
        for input in inputs {
            let once = format_name(input);
            assert_eq!(format_name(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_anchor_same_line() {
        let text = "Comprovativo\nNome: ANA MARIA COSTA, NIF 123456789\nMorada: Lisboa";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "Ana Maria Costa");
        assert_eq!(m.score, SAME_LINE_SCORE);
    }

    #[test]
    fn test_anchor_next_line() {
        let text = "DECLARAÇÃO\nO trabalhador\nRUI MANUEL ALVES\nNIF 123456789";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "Rui Manuel Alves");
        assert_eq!(m.score, NEXT_LINE_SCORE);
    }

    #[test]
    fn test_longer_anchor_phrase() {
        let text = "Nome do colaborador: Pedro Nuno Santos";
        assert_eq!(extract_name(None, text), "Pedro Nuno Santos");
    }

    #[test]
    fn test_line_scan_fallback() {
        let text = "RECIBO 2024\nCARLOS EDUARDO PINTO\nLisboa 1000";
        assert_eq!(extract_name(None, text), "Carlos Eduardo Pinto");

        let extractor = NameExtractor::new().with_line_scan(false);
        assert_eq!(extractor.extract(text), None);
    }

    #[test]
    fn test_candidate_with_digits_falls_back_to_text() {
        let text = "Titular: Joana Ferreira Lopes";
        assert_eq!(extract_name(Some("JOÃO JOSÉ 123"), text), "Joana Ferreira Lopes");
    }

    #[test]
    fn test_good_candidate_wins() {
        let text = "Titular: Joana Ferreira Lopes";
        assert_eq!(extract_name(Some("RUI ALVES"), text), "Rui Alves");
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(extract_name(None, "12345\n\n---"), "");
        assert_eq!(extract_name(Some("x"), ""), "");
    }

    #[test]
    fn test_extract_all_order() {
        let text = "Cliente: Ana Costa\nPEDRO ALVES";
        let all = NameExtractor::new().extract_all(text);
        let names: Vec<_> = all.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(names, vec!["Ana Costa", "Pedro Alves", "Pedro Alves"]);
    }
}

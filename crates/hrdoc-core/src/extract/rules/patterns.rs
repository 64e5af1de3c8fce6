//! Common regex patterns for Portuguese HR document extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Upstream JSON: first `{` to last `}`, across lines
    pub static ref JSON_OBJECT_SPAN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();

    // Date patterns, tried in this order by the normalizer. Digit boundaries
    // are checked by the caller since the regex crate has no lookaround.
    pub static ref DATE_ISO: Regex = Regex::new(
        r"(\d{4})-(\d{1,2})-(\d{1,2})"
    ).unwrap();

    pub static ref DATE_ISO_ALT: Regex = Regex::new(
        r"(\d{4})[./](\d{1,2})[./](\d{1,2})"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})"
    ).unwrap();

    // "12 de Março de 2024", "12 Março 2024", "12.Fev.2024", "1º de maio de 2023", "12-Julho-21"
    pub static ref DATE_PORTUGUESE_LONG: Regex = Regex::new(
        r"(?i)(\d{1,2})\s*º?\s*(?:de\s+|[./\-]\s*|\s+)(janeiro|fevereiro|março|marco|abril|maio|junho|julho|agosto|setembro|outubro|novembro|dezembro|jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez)\.?\s*(?:de\s+|[./\-]\s*|\s*)(\d{4}|\d{2})"
    ).unwrap();

    // IBAN-shaped token: country code, check digits, 11-30 alphanumerics (spaces
    // allowed). No leading boundary, so "IBANPT50..." glued by OCR still matches.
    pub static ref IBAN_SHAPED: Regex = Regex::new(
        r"[A-Z]{2}\d{2}(?:[ \t]?[A-Z0-9]){11,30}\b"
    ).unwrap();

    // Banking vocabulary and Portuguese bank names
    pub static ref BANKING_KEYWORDS: Regex = Regex::new(
        r"(?i)\b(?:iban|nib|bic|swift|n[úu]mero\s+de\s+conta|n\.?\s*[ºo°]\s*(?:de\s+)?conta|conta\s+banc[áa]ria|dados\s+banc[áa]rios|account\s+number|bank\s+account|caixa\s+geral\s+de\s+dep[óo]sitos|millennium|bcp|santander|novo\s+banco|bpi|montepio|cr[ée]dito\s+agr[íi]cola|activobank|abanca|bankinter|banco\s+ctt)\b"
    ).unwrap();

    // A single name word after lower-casing: letter runs joined by - or
    // apostrophes. Combining marks may follow a letter (decomposed "é").
    pub static ref NAME_TOKEN: Regex = Regex::new(
        r"^\p{L}[\p{L}\p{M}]*(?:['’\-]\p{L}[\p{L}\p{M}]*)*$"
    ).unwrap();

    // Labels that usually precede the employee's name. Longer phrases first so
    // "nome do colaborador" wins over "nome" at the same position.
    pub static ref NAME_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:nome\s+completo|nome\s+do\s+(?:colaborador|trabalhador|funcion[áa]rio)|nome|titular(?:\s+da\s+conta)?|cliente|benefici[áa]ri[oa]|colaboradora?|funcion[áa]ri[oa]|trabalhadora?|(?:primeiro|segundo)\s+outorgante|outorgante)\b(?:\s*\(a\))?"
    ).unwrap();

    // End of a labelled value on the same line
    pub static ref FIELD_DELIMITER: Regex = Regex::new(
        r"[,;|\t]|\s{2,}"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iban_shaped() {
        assert!(IBAN_SHAPED.is_match("IBAN: PT50 0002 0123 1234 5678 9015 4"));
        assert!(IBAN_SHAPED.is_match("PT50000201231234567890154"));
        assert!(!IBAN_SHAPED.is_match("PT50 0002"));
    }

    #[test]
    fn test_iban_glued_to_label() {
        let m = IBAN_SHAPED.find("IBANPT50000201231234567890154").unwrap();
        assert_eq!(m.as_str(), "PT50000201231234567890154");
    }

    #[test]
    fn test_name_token_accepts_combining_marks() {
        assert!(NAME_TOKEN.is_match("jose\u{301}"));
        assert!(NAME_TOKEN.is_match("mu\u{308}ller-sa\u{303}o"));
        assert!(!NAME_TOKEN.is_match("\u{301}jose"));
    }

    #[test]
    fn test_banking_keywords_are_word_bounded() {
        assert!(BANKING_KEYWORDS.is_match("Comprovativo de NIB"));
        assert!(BANKING_KEYWORDS.is_match("Número de Conta: 0001"));
        assert!(BANKING_KEYWORDS.is_match("Caixa Geral de Depósitos"));
        assert!(!BANKING_KEYWORDS.is_match("disponibilidade imediata"));
    }

    #[test]
    fn test_name_anchor_prefers_longer_phrase() {
        let m = NAME_ANCHOR.find("Nome do colaborador: Ana Costa").unwrap();
        assert_eq!(m.as_str(), "Nome do colaborador");

        let m = NAME_ANCHOR.find("Trabalhador(a): Rui Alves").unwrap();
        assert_eq!(m.as_str(), "Trabalhador(a)");
    }

    #[test]
    fn test_portuguese_long_date() {
        let caps = DATE_PORTUGUESE_LONG.captures("12 de Março de 2024").unwrap();
        assert_eq!(&caps[1], "12");
        assert_eq!(&caps[2], "Março");
        assert_eq!(&caps[3], "2024");

        let caps = DATE_PORTUGUESE_LONG.captures("12.Fev.2024").unwrap();
        assert_eq!(&caps[2], "Fev");
    }
}

//! Date normalization and full-text date selection.

use std::cmp::Reverse;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::debug;

use super::patterns::{DATE_DMY, DATE_ISO, DATE_ISO_ALT, DATE_PORTUGUESE_LONG};
use super::{fold_lower, ExtractionMatch, FieldExtractor};

/// A date found while scanning text, scored by the keywords around it.
pub type DateCandidate = ExtractionMatch<NaiveDate>;

/// Characters inspected on each side of a date match by default.
pub const DEFAULT_CONTEXT_WINDOW: usize = 100;

/// Keywords that suggest a date is the document's own date (folded), with weights.
pub const CONTEXT_KEYWORDS: [(&str, u32); 8] = [
    ("inicio de vigencia", 6),
    ("assinatura", 5),
    ("assinado", 5),
    ("vigencia", 4),
    ("inicio", 4),
    ("emissao", 3),
    ("emitido", 3),
    ("data", 2),
];

/// How the capture groups of a date pattern map onto a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLayout {
    YearMonthDay,
    DayMonthYear,
    DayMonthNameYear,
}

struct DatePattern {
    regex: &'static Regex,
    layout: DateLayout,
}

impl DatePattern {
    fn to_date(&self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let (year, month, day): (i32, u32, u32) = match self.layout {
            DateLayout::YearMonthDay => (
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            ),
            DateLayout::DayMonthYear => (
                caps[3].parse().ok()?,
                caps[2].parse().ok()?,
                caps[1].parse().ok()?,
            ),
            DateLayout::DayMonthNameYear => (
                parse_year(&caps[3])?,
                portuguese_month_to_number(&caps[2])?,
                caps[1].parse().ok()?,
            ),
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Calendar-valid dates in `text` with their byte spans, in text order.
    fn find_dates<'t>(
        &'t self,
        text: &'t str,
    ) -> impl Iterator<Item = (NaiveDate, usize, usize)> + 't {
        self.regex.captures_iter(text).filter_map(move |caps| {
            let full = caps.get(0)?;
            if !has_digit_boundaries(text, full.start(), full.end()) {
                return None;
            }
            self.to_date(&caps).map(|date| (date, full.start(), full.end()))
        })
    }
}

lazy_static::lazy_static! {
    /// Date patterns in priority order; the first calendar-valid match wins.
    static ref DATE_PATTERNS: [DatePattern; 4] = [
        DatePattern { regex: &DATE_ISO, layout: DateLayout::YearMonthDay },
        DatePattern { regex: &DATE_ISO_ALT, layout: DateLayout::YearMonthDay },
        DatePattern { regex: &DATE_DMY, layout: DateLayout::DayMonthYear },
        DatePattern { regex: &DATE_PORTUGUESE_LONG, layout: DateLayout::DayMonthNameYear },
    ];
}

/// A match must not be glued to further digits ("12024-01-01", "2024-01-011").
fn has_digit_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}

/// Four-digit years pass through; two-digit years pivot at 50.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() > 2 {
        Some(year)
    } else if year <= 50 {
        Some(2000 + year)
    } else {
        Some(1900 + year)
    }
}

fn portuguese_month_to_number(month: &str) -> Option<u32> {
    let month = fold_lower(month);
    let number = match month.as_str() {
        "janeiro" | "jan" => 1,
        "fevereiro" | "fev" => 2,
        "marco" | "mar" => 3,
        "abril" | "abr" => 4,
        "maio" | "mai" => 5,
        "junho" | "jun" => 6,
        "julho" | "jul" => 7,
        "agosto" | "ago" => 8,
        "setembro" | "set" => 9,
        "outubro" | "out" => 10,
        "novembro" | "nov" => 11,
        "dezembro" | "dez" => 12,
        _ => return None,
    };
    Some(number)
}

/// Parse a date candidate, trying each pattern in priority order.
pub fn parse_date(candidate: &str) -> Option<NaiveDate> {
    let candidate = candidate.trim();
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find_dates(candidate).next().map(|(date, _, _)| date))
}

/// Normalize a date candidate to `YYYY-MM-DD`; empty string when it is not a valid date.
pub fn normalize_date(candidate: &str) -> String {
    parse_date(candidate)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Slice of `text` reaching `radius` characters either side of `start..end`.
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = match radius.checked_sub(1) {
        Some(n) => text[..start].char_indices().rev().nth(n).map(|(i, _)| i).unwrap_or(0),
        None => start,
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

/// Sum of the weights of the context keywords present in `window`.
pub fn context_score(window: &str) -> u32 {
    let folded = fold_lower(window);
    CONTEXT_KEYWORDS
        .iter()
        .filter(|(keyword, _)| folded.contains(keyword))
        .map(|(_, weight)| weight)
        .sum()
}

/// Pick the highest-scoring candidate; ties go to the earliest position.
pub fn select_best_date(mut candidates: Vec<DateCandidate>) -> Option<DateCandidate> {
    candidates.sort_by_key(|c| (Reverse(c.score), c.start()));
    candidates.into_iter().next()
}

/// Full-text date extractor.
pub struct DateExtractor {
    window: usize,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set how many characters around a match are scored.
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Normalize `candidate`, falling back to the best date in `text`.
    pub fn resolve(&self, candidate: Option<&str>, text: &str) -> Option<DateCandidate> {
        if let Some(raw) = candidate {
            if let Some(date) = parse_date(raw) {
                return Some(ExtractionMatch::new(date, u32::MAX, raw));
            }
            debug!("Upstream date {:?} rejected, scanning document text", raw);
        }
        self.extract(text)
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = DateCandidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let best = select_best_date(self.extract_all(text));
        if let Some(ref best) = best {
            debug!("Selected date {} with context score {}", best.value, best.score);
        }
        best
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        for pattern in DATE_PATTERNS.iter() {
            for (date, start, end) in pattern.find_dates(text) {
                let score = context_score(context_window(text, start, end, self.window));
                results.push(
                    ExtractionMatch::new(date, score, &text[start..end]).with_position(start, end),
                );
            }
        }
        results
    }
}

/// Resolve the document date from an upstream candidate and the document text.
pub fn extract_date(candidate: Option<&str>, text: &str) -> String {
    DateExtractor::new()
        .resolve(candidate, text)
        .map(|m| m.value.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

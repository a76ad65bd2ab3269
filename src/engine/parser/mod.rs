use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Framework, ParsedQuestion};
use crate::util::{now_utc_string, sha256_bytes};

mod framework;
mod freetext;
mod tabular;

const QUESTION_MIN_CHARS: usize = 12;
const QUESTION_MAX_CHARS: usize = 500;
const HEADER_LINE_MAX_CHARS: usize = 80;

/// Field-to-column assignment, produced by auto-detection and accepted back
/// as a manual override when detection confidence was low.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub question: Option<usize>,
    pub category: Option<usize>,
    pub subcategory: Option<usize>,
    pub reference_id: Option<usize>,
    pub required: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseMetadata {
    pub file_name: String,
    pub source_sha256: String,
    pub generated_at: String,
    pub total_rows: usize,
    pub parsed_rows: usize,
    pub detected_framework: Option<Framework>,
    pub column_mapping: Option<ColumnMapping>,
    pub available_columns: Option<Vec<String>>,
    pub auto_detection_confidence: Option<String>,
}

impl ParseMetadata {
    fn empty(file_name: &str, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            source_sha256: sha256_bytes(bytes),
            generated_at: now_utc_string(),
            total_rows: 0,
            parsed_rows: 0,
            detected_framework: None,
            column_mapping: None,
            available_columns: None,
            auto_detection_confidence: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub questions: Vec<ParsedQuestion>,
    pub errors: Vec<String>,
    pub metadata: ParseMetadata,
}

/// Parses an uploaded questionnaire. Dispatches on the file extension and
/// never panics or propagates an error: every internal failure comes back
/// as a failed ParseResult with a human-readable message.
pub fn parse_source(bytes: &[u8], file_name: &str) -> ParseResult {
    let outcome = match extension_of(file_name).as_str() {
        "csv" | "tsv" => tabular::parse(bytes, file_name, None),
        "txt" | "md" | "text" => freetext::parse(bytes, file_name),
        other => {
            return failed(
                bytes,
                file_name,
                format!(
                    "unsupported file type '{other}'; supported extensions are csv, tsv, txt and md"
                ),
            );
        }
    };
    finalize(bytes, file_name, outcome)
}

/// Re-entry point for callers that corrected the column mapping after a
/// low-confidence auto-detection.
pub fn parse_with_mapping(bytes: &[u8], file_name: &str, mapping: &ColumnMapping) -> ParseResult {
    let outcome = match extension_of(file_name).as_str() {
        "csv" | "tsv" => tabular::parse(bytes, file_name, Some(mapping)),
        other => {
            return failed(
                bytes,
                file_name,
                format!("manual column mapping only applies to tabular files, got '{other}'"),
            );
        }
    };
    finalize(bytes, file_name, outcome)
}

fn finalize(bytes: &[u8], file_name: &str, outcome: Result<ParseResult>) -> ParseResult {
    let mut result = match outcome {
        Ok(result) => result,
        Err(error) => {
            warn!(file = file_name, error = %error, "questionnaire parse failed");
            return failed(bytes, file_name, format!("parse failed: {error:#}"));
        }
    };

    for (index, question) in result.questions.iter_mut().enumerate() {
        question.id = format!("q-{:03}", index + 1);
    }
    result.metadata.detected_framework = framework::detect_and_tag(&mut result.questions);
    result.metadata.parsed_rows = result.questions.len();

    if result.questions.is_empty() {
        result.success = false;
        result.errors.push(
            "no questions were found; check that the file contains question text, or re-submit \
             with a manual column mapping if the question column was misdetected"
                .to_string(),
        );
    }
    result
}

fn failed(bytes: &[u8], file_name: &str, error: String) -> ParseResult {
    ParseResult {
        success: false,
        questions: Vec::new(),
        errors: vec![error],
        metadata: ParseMetadata::empty(file_name, bytes),
    }
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Row-level filter shared by both source formats.
pub(super) fn looks_like_question(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.len() > QUESTION_MAX_CHARS {
        return false;
    }
    if trimmed.len() < QUESTION_MIN_CHARS && !trimmed.contains('?') {
        return false;
    }

    let lowered = trimmed.to_ascii_lowercase();
    if matches!(lowered.as_str(), "yes" | "no" | "true" | "false" | "n/a" | "na") {
        return false;
    }
    if lowered
        .chars()
        .all(|character| character.is_ascii_digit() || matches!(character, '.' | ',' | '%' | '-'))
    {
        return false;
    }
    // "please describe ..." is a question; "please fill ..." is not.
    const INSTRUCTION_PREFIXES: &[&str] = &[
        "please fill",
        "please complete",
        "note:",
        "instructions",
        "instruction:",
        "see ",
        "refer to ",
    ];
    if INSTRUCTION_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return false;
    }
    true
}

/// Strips leading enumeration tokens ("1.", "2)", "Q3:", "a)") and reports
/// whether one was present.
pub(super) fn strip_enumeration(line: &str) -> (&str, bool) {
    let trimmed = line.trim_start();

    if let Some(rest) = strip_numbered_prefix(trimmed) {
        return (rest.trim_start(), true);
    }

    let mut chars = trimmed.char_indices();
    if let (Some((_, first)), Some((second_index, second))) = (chars.next(), chars.next()) {
        let question_token = (first == 'q' || first == 'Q') && second.is_ascii_digit();
        if question_token {
            let rest = &trimmed[second_index..];
            if let Some(stripped) = strip_numbered_prefix(rest) {
                return (stripped.trim_start(), true);
            }
        }
        let letter_token = first.is_ascii_lowercase() && matches!(second, '.' | ')');
        if letter_token {
            if let Some((third_index, third)) = chars.next() {
                if third == ' ' {
                    return (trimmed[third_index..].trim_start(), true);
                }
            }
        }
    }

    (trimmed, false)
}

fn strip_numbered_prefix(text: &str) -> Option<&str> {
    let digits = text
        .char_indices()
        .take_while(|(_, character)| character.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let rest = &text[digits..];
    let mut characters = rest.chars();
    match characters.next() {
        Some('.') | Some(')') | Some(':') => Some(characters.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{looks_like_question, parse_source, parse_with_mapping, strip_enumeration, ColumnMapping};

    #[test]
    fn likeness_predicate_drops_noise_rows() {
        assert!(looks_like_question(
            "What percentage of your electricity comes from renewables?"
        ));
        assert!(looks_like_question("Scope 1?"));
        assert!(!looks_like_question("42"));
        assert!(!looks_like_question("12.5%"));
        assert!(!looks_like_question("yes"));
        assert!(!looks_like_question("N/A"));
        assert!(!looks_like_question("short"));
        assert!(!looks_like_question("Note: complete all tabs first"));
        assert!(!looks_like_question(&"x".repeat(501)));
    }

    #[test]
    fn enumeration_tokens_are_stripped() {
        assert_eq!(strip_enumeration("1. Do you recycle?"), ("Do you recycle?", true));
        assert_eq!(strip_enumeration("12) Do you recycle?"), ("Do you recycle?", true));
        assert_eq!(strip_enumeration("Q2: Do you recycle?"), ("Do you recycle?", true));
        assert_eq!(strip_enumeration("a) Do you recycle?"), ("Do you recycle?", true));
        assert_eq!(strip_enumeration("Do you recycle?"), ("Do you recycle?", false));
    }

    #[test]
    fn unsupported_extension_fails_without_panicking() {
        let result = parse_source(b"%PDF-1.4", "upload.pdf");
        assert!(!result.success);
        assert!(result.questions.is_empty());
        assert!(result.errors[0].contains("unsupported file type"));
    }

    #[test]
    fn empty_file_is_a_normal_failure_with_guidance() {
        let result = parse_source(b"", "empty.csv");
        assert!(!result.success);
        assert!(result
            .errors
            .iter()
            .any(|error| error.contains("no questions were found")));
    }

    #[test]
    fn invalid_utf8_does_not_panic() {
        // Lossy decoding yields no question-like lines; this must surface
        // as a failed result, not a panic.
        let result = parse_source(&[0xFF, 0xFE, 0x00, 0x41], "weird.txt");
        assert!(!result.success);
        assert!(result.questions.is_empty());
    }

    #[test]
    fn question_ids_are_sequential() {
        let data = b"Question\nDo you have an environmental policy in place?\nWhat is your total electricity consumption in kWh?\n";
        let result = parse_source(data, "questions.csv");
        assert!(result.success);
        let ids = result
            .questions
            .iter()
            .map(|question| question.id.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(ids, vec!["q-001", "q-002"]);
    }

    #[test]
    fn manual_mapping_requires_tabular_input() {
        let mapping = ColumnMapping {
            question: Some(0),
            ..ColumnMapping::default()
        };
        let result = parse_with_mapping(b"whatever", "notes.txt", &mapping);
        assert!(!result.success);
        assert!(result.errors[0].contains("tabular"));
    }
}

use anyhow::Result;

use super::{looks_like_question, strip_enumeration, ParseMetadata, ParseResult, HEADER_LINE_MAX_CHARS};
use crate::model::ParsedQuestion;
use crate::util::{now_utc_string, sha256_bytes};

/// Line-oriented parsing for pasted or exported question lists. A short
/// unnumbered line without a question mark acts as a section header and
/// becomes the category of every question until the next header.
pub(super) fn parse(bytes: &[u8], file_name: &str) -> Result<ParseResult> {
    let text = String::from_utf8_lossy(bytes);
    let mut questions = Vec::<ParsedQuestion>::new();
    let mut current_category: Option<String> = None;
    let mut total_rows = 0usize;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        total_rows += 1;

        let (stripped, had_enumeration) = strip_enumeration(line);

        if !had_enumeration && line.len() < HEADER_LINE_MAX_CHARS && !line.contains('?') {
            current_category = Some(line.trim_end_matches(':').trim().to_string());
            continue;
        }

        if !looks_like_question(stripped) {
            continue;
        }

        questions.push(ParsedQuestion {
            id: String::new(),
            text: stripped.to_string(),
            category: current_category.clone(),
            subcategory: None,
            reference_id: None,
            framework: None,
            required: None,
            row: index + 1,
        });
    }

    Ok(ParseResult {
        success: true,
        questions,
        errors: Vec::new(),
        metadata: ParseMetadata {
            file_name: file_name.to_string(),
            source_sha256: sha256_bytes(bytes),
            generated_at: now_utc_string(),
            total_rows,
            parsed_rows: 0,
            detected_framework: None,
            column_mapping: None,
            available_columns: None,
            auto_detection_confidence: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::super::parse_source;

    #[test]
    fn section_headers_become_categories() {
        let data = b"Environment:\n\
            1. Do you measure your electricity consumption?\n\
            2. Do you track waste volumes?\n\
            Social\n\
            3. Do you record lost-time incidents?\n";
        let result = parse_source(data, "questions.txt");

        assert!(result.success);
        assert_eq!(result.questions.len(), 3);
        assert_eq!(result.questions[0].category.as_deref(), Some("Environment"));
        assert_eq!(result.questions[1].category.as_deref(), Some("Environment"));
        assert_eq!(result.questions[2].category.as_deref(), Some("Social"));
    }

    #[test]
    fn enumeration_is_stripped_before_the_likeness_test() {
        let data = b"Q1: Do you have an environmental management system?\n";
        let result = parse_source(data, "questions.txt");
        assert_eq!(result.questions.len(), 1);
        assert_eq!(
            result.questions[0].text,
            "Do you have an environmental management system?"
        );
    }

    #[test]
    fn long_unnumbered_statement_lines_are_questions_not_headers() {
        let line = "Describe the governance processes your organisation applies to oversee climate-related risks and opportunities across sites";
        assert!(line.len() >= 80);
        let result = parse_source(format!("{line}\n").as_bytes(), "questions.txt");
        assert_eq!(result.questions.len(), 1);
        assert!(result.questions[0].category.is_none());
    }

    #[test]
    fn row_numbers_point_at_source_lines() {
        let data = b"Environment\n\nDo you monitor water use at all sites?\n";
        let result = parse_source(data, "questions.txt");
        assert_eq!(result.questions[0].row, 3);
    }
}

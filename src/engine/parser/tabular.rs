use anyhow::{Context, Result};

use super::{looks_like_question, ColumnMapping, ParseMetadata, ParseResult};
use crate::model::ParsedQuestion;
use crate::util::{now_utc_string, sha256_bytes};

const AUTO_SCORE_MIN: f64 = 15.0;
const QUESTION_MARK_WEIGHT: f64 = 100.0;

const QUESTION_SYNONYMS: &[&str] = &[
    "question",
    "questions",
    "question text",
    "prompt",
    "criteria",
    "criterion",
    "requirement",
    "disclosure",
    "disclosure requirement",
    "indicator",
];
const CATEGORY_SYNONYMS: &[&str] = &["category", "section", "theme", "pillar", "topic", "area"];
const SUBCATEGORY_SYNONYMS: &[&str] = &[
    "subcategory",
    "sub-category",
    "sub category",
    "subsection",
    "sub-topic",
    "subtopic",
];
const REFERENCE_SYNONYMS: &[&str] = &[
    "ref",
    "reference",
    "id",
    "code",
    "question id",
    "ref id",
    "indicator id",
    "no",
    "no.",
];
const REQUIRED_SYNONYMS: &[&str] = &["required", "mandatory", "must answer", "obligatory"];

pub(super) fn parse(
    bytes: &[u8],
    file_name: &str,
    manual: Option<&ColumnMapping>,
) -> Result<ParseResult> {
    let delimiter = if file_name.to_ascii_lowercase().ends_with(".tsv") {
        b'\t'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::<Vec<String>>::new();
    for record in reader.records() {
        let record = record.context("failed to read tabular row")?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let available_columns = rows.first().cloned();

    let (mapping, data_start, confidence) = match manual {
        Some(mapping) => (mapping.clone(), 0, None),
        None => detect_columns(&rows),
    };
    let question_column = mapping.question.unwrap_or(0);

    let mut questions = Vec::<ParsedQuestion>::new();
    for (index, row) in rows.iter().enumerate().skip(data_start) {
        let Some(text) = cell(row, Some(question_column)) else {
            continue;
        };
        let (stripped, _) = super::strip_enumeration(&text);
        if !looks_like_question(stripped) {
            continue;
        }
        questions.push(ParsedQuestion {
            id: String::new(),
            text: stripped.to_string(),
            category: cell(row, mapping.category),
            subcategory: cell(row, mapping.subcategory),
            reference_id: cell(row, mapping.reference_id),
            framework: None,
            required: cell(row, mapping.required).as_deref().and_then(parse_required),
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
            total_rows: rows.len(),
            parsed_rows: 0,
            detected_framework: None,
            column_mapping: Some(mapping),
            available_columns,
            auto_detection_confidence: confidence,
        },
    })
}

/// Header-synonym pass first; when no question header is present, scores
/// every column by average cell length plus the fraction of cells carrying
/// a question mark (heavily weighted), defaulting to the first column.
fn detect_columns(rows: &[Vec<String>]) -> (ColumnMapping, usize, Option<String>) {
    if rows.is_empty() {
        return (ColumnMapping::default(), 0, Some("low".to_string()));
    }

    let header = &rows[0];
    let mut mapping = ColumnMapping {
        question: find_header(header, QUESTION_SYNONYMS),
        category: find_header(header, CATEGORY_SYNONYMS),
        subcategory: find_header(header, SUBCATEGORY_SYNONYMS),
        reference_id: find_header(header, REFERENCE_SYNONYMS),
        required: find_header(header, REQUIRED_SYNONYMS),
    };

    if mapping.question.is_some() {
        return (mapping, 1, Some("high".to_string()));
    }

    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut best: Option<(usize, f64)> = None;
    for column in 0..column_count {
        let mut total_len = 0usize;
        let mut with_mark = 0usize;
        let mut counted = 0usize;
        for row in rows {
            if let Some(value) = row.get(column) {
                counted += 1;
                total_len += value.trim().len();
                if value.contains('?') {
                    with_mark += 1;
                }
            }
        }
        if counted == 0 {
            continue;
        }
        let score = total_len as f64 / counted as f64
            + (with_mark as f64 / counted as f64) * QUESTION_MARK_WEIGHT;
        if best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
            best = Some((column, score));
        }
    }

    mapping.question = match best {
        Some((column, score)) if score >= AUTO_SCORE_MIN => Some(column),
        _ => Some(0),
    };
    // No recognized header row: every row is data and the likeness filter
    // drops header-ish cells.
    (mapping, 0, Some("low".to_string()))
}

fn find_header(header: &[String], synonyms: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        let normalized = cell.trim().trim_matches(['*', ':']).trim().to_ascii_lowercase();
        synonyms.contains(&normalized.as_str())
    })
}

fn cell(row: &[String], column: Option<usize>) -> Option<String> {
    let value = row.get(column?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_required(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" | "x" | "required" | "mandatory" => Some(true),
        "no" | "false" | "0" | "optional" => Some(false),
        _ => None,
    }
}

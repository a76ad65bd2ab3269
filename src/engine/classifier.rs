use regex::Regex;

use crate::model::{ParsedQuestion, QuestionType};
use crate::util::normalize_for_matching;

/// Narrow seam for question-type tagging so the lexical heuristic can be
/// swapped without touching the generation cascade.
pub trait QuestionTypeClassifier {
    fn classify(&self, question: &ParsedQuestion) -> QuestionType;
}

const POLICY_CUES: &[&str] = &[
    "policy",
    "policies",
    "commitment",
    "commitments",
    "statement",
    "charter",
    "code of conduct",
    "position on",
    "pledge",
];

const KPI_CUES: &[&str] = &[
    "how many",
    "how much",
    "percentage",
    "percent",
    "share of",
    "total",
    "number of",
    "rate",
    "intensity",
    "kwh",
    "mwh",
    "tco2e",
    "m3",
    "kpi",
    "metric",
    "figure",
];

pub struct LexicalClassifier {
    reference_code: Option<Regex>,
}

impl LexicalClassifier {
    pub fn new() -> Self {
        Self {
            // Numeric disclosure codes like "305-1" or "E1-5" read as KPIs.
            reference_code: Regex::new(r"\b[a-z]{0,4}\d{1,3}-\d{1,2}\b").ok(),
        }
    }
}

impl Default for LexicalClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionTypeClassifier for LexicalClassifier {
    fn classify(&self, question: &ParsedQuestion) -> QuestionType {
        let mut search = question.text.clone();
        if let Some(reference) = &question.reference_id {
            search.push(' ');
            search.push_str(reference);
        }
        let normalized = normalize_for_matching(&search);

        let code_hit = self
            .reference_code
            .as_ref()
            .is_some_and(|regex| regex.is_match(&normalized));
        if code_hit || KPI_CUES.iter().any(|cue| contains_cue(&normalized, cue)) {
            return QuestionType::Kpi;
        }
        if POLICY_CUES.iter().any(|cue| contains_cue(&normalized, cue)) {
            return QuestionType::Policy;
        }
        QuestionType::Measure
    }
}

fn contains_cue(normalized: &str, cue: &str) -> bool {
    if cue.contains(' ') {
        return normalized.contains(cue);
    }
    normalized
        .split(' ')
        .any(|word| word == cue || word.trim_matches('-') == cue)
}

#[cfg(test)]
mod tests {
    use super::{LexicalClassifier, QuestionTypeClassifier};
    use crate::model::{ParsedQuestion, QuestionType};

    fn question(text: &str, reference: Option<&str>) -> ParsedQuestion {
        ParsedQuestion {
            id: "q-001".to_string(),
            text: text.to_string(),
            category: None,
            subcategory: None,
            reference_id: reference.map(str::to_string),
            framework: None,
            required: None,
            row: 1,
        }
    }

    #[test]
    fn quantity_phrasing_reads_as_kpi() {
        let classifier = LexicalClassifier::new();
        assert_eq!(
            classifier.classify(&question(
                "What percentage of electricity comes from renewables?",
                None
            )),
            QuestionType::Kpi
        );
        assert_eq!(
            classifier.classify(&question("How many lost-time incidents occurred?", None)),
            QuestionType::Kpi
        );
    }

    #[test]
    fn numeric_reference_codes_read_as_kpi() {
        let classifier = LexicalClassifier::new();
        assert_eq!(
            classifier.classify(&question("Disclose energy consumption.", Some("GRI 302-1"))),
            QuestionType::Kpi
        );
    }

    #[test]
    fn policy_cues_read_as_policy() {
        let classifier = LexicalClassifier::new();
        assert_eq!(
            classifier.classify(&question(
                "Do you have an environmental policy approved by management?",
                None
            )),
            QuestionType::Policy
        );
        assert_eq!(
            classifier.classify(&question("Describe your code of conduct.", None)),
            QuestionType::Policy
        );
    }

    #[test]
    fn everything_else_reads_as_measure() {
        let classifier = LexicalClassifier::new();
        assert_eq!(
            classifier.classify(&question(
                "Describe the actions you take to reduce waste at your sites.",
                None
            )),
            QuestionType::Measure
        );
    }

    #[test]
    fn kpi_cue_outranks_policy_cue() {
        let classifier = LexicalClassifier::new();
        assert_eq!(
            classifier.classify(&question(
                "What is the total coverage of your anti-bribery policy?",
                None
            )),
            QuestionType::Kpi
        );
    }
}

use regex::Regex;

use crate::model::{Framework, ParsedQuestion};

/// Signature registry in evaluation order; the first framework whose
/// pattern matches anywhere in the combined questionnaire text wins.
const FRAMEWORK_SIGNATURES: &[(Framework, &str)] = &[
    (Framework::Csrd, r"(?i)\b(esrs|csrd)\b"),
    (Framework::Gri, r"(?i)\bgri\b"),
    (Framework::Cdp, r"(?i)\bcdp\b"),
    (Framework::Ecovadis, r"(?i)ecovadis"),
    (Framework::Sasb, r"(?i)\bsasb\b"),
    (Framework::Tcfd, r"(?i)\btcfd\b"),
    (Framework::Sdg, r"(?i)\bsdgs?\b|sustainable development goal"),
];

/// Scans question text, categories and reference ids for a framework
/// signature and tags every question with the first hit.
pub fn detect_and_tag(questions: &mut [ParsedQuestion]) -> Option<Framework> {
    let mut combined = String::new();
    for question in questions.iter() {
        combined.push_str(&question.text);
        combined.push('\n');
        if let Some(category) = &question.category {
            combined.push_str(category);
            combined.push('\n');
        }
        if let Some(reference) = &question.reference_id {
            combined.push_str(reference);
            combined.push('\n');
        }
    }

    let detected = FRAMEWORK_SIGNATURES.iter().find_map(|(framework, pattern)| {
        Regex::new(pattern)
            .ok()
            .filter(|regex| regex.is_match(&combined))
            .map(|_| *framework)
    });

    if let Some(framework) = detected {
        for question in questions.iter_mut() {
            question.framework = Some(framework);
        }
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::detect_and_tag;
    use crate::model::{Framework, ParsedQuestion};

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
    fn detects_csrd_from_esrs_reference() {
        let mut questions = vec![question("Disclose gross Scope 1 emissions.", Some("ESRS E1-6"))];
        assert_eq!(detect_and_tag(&mut questions), Some(Framework::Csrd));
        assert_eq!(questions[0].framework, Some(Framework::Csrd));
    }

    #[test]
    fn first_matching_signature_wins() {
        let mut questions = vec![
            question("Report per GRI 302-1.", None),
            question("Also see the CSRD delegated act.", None),
        ];
        // CSRD precedes GRI in the registry.
        assert_eq!(detect_and_tag(&mut questions), Some(Framework::Csrd));
    }

    #[test]
    fn tags_every_question_on_a_hit() {
        let mut questions = vec![
            question("What is your carbon footprint?", None),
            question("Answer per the CDP climate module.", None),
        ];
        assert_eq!(detect_and_tag(&mut questions), Some(Framework::Cdp));
        assert!(questions.iter().all(|q| q.framework == Some(Framework::Cdp)));
    }

    #[test]
    fn no_signature_leaves_questions_untagged() {
        let mut questions = vec![question("Do you recycle?", None)];
        assert_eq!(detect_and_tag(&mut questions), None);
        assert!(questions[0].framework.is_none());
    }
}

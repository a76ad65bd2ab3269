use anyhow::Result;
use tracing::info;

use crate::cli::MatchArgs;
use crate::commands::{emit, read_json};
use crate::engine::matcher::DomainMatcher;
use crate::model::{ParsedQuestion, StructuredRule};

pub fn run(args: MatchArgs) -> Result<()> {
    let rules: Vec<StructuredRule> = match &args.rules {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let matcher = DomainMatcher::new(&rules);

    let question = ParsedQuestion {
        id: "q-001".to_string(),
        text: args.question.clone(),
        category: args.category.clone(),
        subcategory: None,
        reference_id: None,
        framework: None,
        required: None,
        row: 1,
    };

    let result = matcher.match_question(&question);
    info!(
        domain = ?result.primary_domain,
        confidence = ?result.confidence,
        keywords = result.matched_keywords.len(),
        "question matched"
    );
    emit(&result, None)
}

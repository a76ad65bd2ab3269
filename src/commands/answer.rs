use anyhow::{bail, Context, Result};
use tracing::info;

use crate::cli::AnswerArgs;
use crate::commands::{emit, read_json};
use crate::engine;
use crate::engine::parser::{self, ColumnMapping};
use crate::model::{
    AnswerConfidence, CompanyProfile, CompanySnapshot, GenerationConfig, StructuredRule,
};

pub fn run(args: AnswerArgs) -> Result<()> {
    let bytes = std::fs::read(&args.questionnaire).with_context(|| {
        format!("failed to read questionnaire: {}", args.questionnaire.display())
    })?;
    let file_name = args
        .questionnaire
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("questionnaire")
        .to_string();

    let parsed = match &args.column_mapping {
        Some(path) => {
            let mapping: ColumnMapping = read_json(path)?;
            parser::parse_with_mapping(&bytes, &file_name, &mapping)
        }
        None => parser::parse_source(&bytes, &file_name),
    };
    if !parsed.success {
        bail!("questionnaire could not be parsed: {}", parsed.errors.join("; "));
    }

    let snapshot: CompanySnapshot = read_json(&args.company_data)?;
    let profile: Option<CompanyProfile> = match &args.profile {
        Some(path) => Some(read_json(path)?),
        None => None,
    };
    let rules: Vec<StructuredRule> = match &args.rules {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let config = GenerationConfig {
        verbosity: args.verbosity.into(),
        include_methodology: !args.no_methodology,
        include_assumptions: !args.no_assumptions,
        include_limitations: !args.no_limitations,
        aggregate_sites: !args.per_site,
        use_llm: args.use_llm,
    };

    let drafts = engine::answer_questions(
        &parsed.questions,
        &snapshot,
        &rules,
        &config,
        profile.as_ref(),
    );

    let mut high = 0usize;
    let mut medium = 0usize;
    let mut low = 0usize;
    let mut unknown = 0usize;
    for draft in &drafts {
        match draft.answer_confidence {
            AnswerConfidence::High => high += 1,
            AnswerConfidence::Medium => medium += 1,
            AnswerConfidence::Low => low += 1,
            AnswerConfidence::None => unknown += 1,
        }
    }
    info!(
        questions = drafts.len(),
        high, medium, low, unknown,
        framework = ?parsed.metadata.detected_framework,
        "answer drafts generated"
    );

    emit(&drafts, args.output.as_deref())
}

use tracing::debug;

use crate::engine::classifier::{LexicalClassifier, QuestionTypeClassifier};
use crate::engine::keywords::domains_for_practice_topic;
use crate::engine::rewriter;
use crate::model::{
    AnswerConfidence, AnswerDraft, CompanyProfile, ConfidenceSource, DataConfidence, DataContext,
    Domain, GenerationConfig, InformalPractice, MatchConfidence, MatchResult, ParsedQuestion,
    QuestionType, RetrievedDataPoint, Topic,
};

mod fallback;
mod maturity;
mod practices;
mod templates;

pub(super) struct StageInput<'a> {
    pub question: &'a ParsedQuestion,
    pub question_type: QuestionType,
    pub match_result: &'a MatchResult,
    pub context: &'a DataContext,
    pub profile: Option<&'a CompanyProfile>,
    pub config: &'a GenerationConfig,
    pub company: &'a str,
}

pub(super) struct StageAnswer {
    pub text: String,
    pub used_informal_practice: bool,
    pub assumptions: Vec<String>,
}

impl StageAnswer {
    fn plain(text: String) -> Self {
        Self {
            text,
            used_informal_practice: false,
            assumptions: Vec::new(),
        }
    }
}

type Stage = fn(&StageInput) -> Option<StageAnswer>;

/// The decision cascade: first stage to return an answer wins. New stages
/// slot in without touching existing ones.
const STAGES: &[Stage] = &[
    maturity::generate,
    templates::generate,
    practices::generate,
    fallback::generate,
];

pub const UNKNOWN_ANSWER: &str = "Unknown — input required.";

/// Engine entry point. Inputs are parallel per-question slices; output
/// order mirrors input order. Processing is stateless per question over
/// immutable inputs, so callers may parallelize as long as they preserve
/// ordering.
pub fn generate_answer_drafts(
    questions: &[ParsedQuestion],
    match_results: &[MatchResult],
    data_contexts: &[DataContext],
    config: &GenerationConfig,
    profile: Option<&CompanyProfile>,
    classifications: Option<&[QuestionType]>,
) -> Vec<AnswerDraft> {
    if config.use_llm {
        debug!("use_llm is recognized but has no effect in the rule-based engine");
    }
    let classifier = LexicalClassifier::new();

    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let match_result = match_results
                .get(index)
                .cloned()
                .unwrap_or_else(|| empty_match(question));
            let context = data_contexts.get(index).cloned().unwrap_or_default();
            let question_type = classifications
                .and_then(|types| types.get(index).copied())
                .unwrap_or_else(|| classifier.classify(question));
            generate_one(question, question_type, &match_result, &context, config, profile)
        })
        .collect()
}

fn generate_one(
    question: &ParsedQuestion,
    question_type: QuestionType,
    match_result: &MatchResult,
    context: &DataContext,
    config: &GenerationConfig,
    profile: Option<&CompanyProfile>,
) -> AnswerDraft {
    let company = company_name(profile, context);
    let input = StageInput {
        question,
        question_type,
        match_result,
        context,
        profile,
        config,
        company: &company,
    };

    let stage_answer = STAGES
        .iter()
        .find_map(|stage| stage(&input))
        .unwrap_or_else(|| StageAnswer::plain(fallback::no_data_sentence(&company)));

    let confidence = compute_confidence(match_result, context, stage_answer.used_informal_practice);

    // With nothing to ground the narrative in, the generated text is
    // discarded wholesale and the draft asks for input instead.
    let answer = if confidence.source == ConfidenceSource::Unknown {
        match &match_result.prompt_if_missing {
            Some(prompt) => format!("{UNKNOWN_ANSWER} {prompt}"),
            None => UNKNOWN_ANSWER.to_string(),
        }
    } else {
        rewriter::rewrite(&stage_answer.text)
    };

    let mut assumptions = stage_answer.assumptions;
    if config.include_assumptions
        && context.all_points().any(|point| point.is_estimate)
        && !assumptions
            .iter()
            .any(|assumption| assumption.contains("emission factors"))
    {
        assumptions.push(
            "Estimated figures are derived from activity data using published average emission factors."
                .to_string(),
        );
    }
    if !config.include_assumptions {
        assumptions.clear();
    }
    let mut limitations = if config.include_limitations {
        context.data_gaps.clone()
    } else {
        Vec::new()
    };
    // A per-site breakdown was requested but the snapshot only carries
    // company-level figures.
    if !config.aggregate_sites && context.sites_included.len() > 1 {
        limitations.push(
            "Figures are aggregated across sites; a per-site breakdown is not available."
                .to_string(),
        );
    }

    let citation = citation_point(context);
    let metric_keys_used = merge_metric_keys(context, &match_result.metric_keys);

    AnswerDraft {
        question_id: question.id.clone(),
        question_text: question.text.clone(),
        category: question.category.clone(),
        question_type,
        match_result: match_result.clone(),
        data_context: context.clone(),
        answer,
        data_value: citation.map(|point| point.value.render()),
        data_period: citation.and_then(|point| point.period.clone()),
        data_source: citation.and_then(|point| point.source.clone()),
        answer_confidence: confidence.answer,
        confidence_source: confidence.source,
        assumptions,
        limitations,
        metric_keys_used,
        prompt_for_missing: match_result.prompt_if_missing.clone(),
        needs_review: confidence.answer != AnswerConfidence::High,
        is_estimate: context.all_points().any(|point| point.is_estimate),
        has_data_gaps: !context.data_gaps.is_empty(),
    }
}

struct Confidence {
    answer: AnswerConfidence,
    source: ConfidenceSource,
}

/// Confidence is independent of which narrative stage fired: it combines
/// point confidence, gap-freeness and the match confidence. "Provided"
/// requires substantive (operational or calculated) high-confidence data;
/// a matched domain with no substantive data never reports "provided".
fn compute_confidence(
    match_result: &MatchResult,
    context: &DataContext,
    used_informal_practice: bool,
) -> Confidence {
    let has_any = context.has_any_data();
    let substantive = || context.operational.iter().chain(context.calculated.iter());
    let has_substantive = substantive().next().is_some();
    let any_high = substantive().any(|point| point.confidence == DataConfidence::High);
    let any_estimate = context
        .all_points()
        .any(|point| point.confidence == DataConfidence::Medium || point.is_estimate);
    let gaps_empty = context.data_gaps.is_empty();

    let answer = if !has_substantive {
        if has_any || used_informal_practice {
            AnswerConfidence::Low
        } else {
            AnswerConfidence::None
        }
    } else {
        let mut level: i8 = if any_high { 2 } else { 1 };
        if !gaps_empty {
            level -= 1;
        }
        if match_result.confidence <= MatchConfidence::Low {
            level -= 1;
        }
        match level.max(0) {
            2 => AnswerConfidence::High,
            1 => AnswerConfidence::Medium,
            _ => AnswerConfidence::Low,
        }
    };

    let source = if !has_any && !used_informal_practice {
        ConfidenceSource::Unknown
    } else if any_estimate || answer == AnswerConfidence::Low || !has_substantive {
        ConfidenceSource::Estimated
    } else {
        ConfidenceSource::Provided
    };

    Confidence { answer, source }
}

/// Citation prefers substantive figures over static company attributes.
fn citation_point(context: &DataContext) -> Option<&RetrievedDataPoint> {
    context
        .operational
        .first()
        .or_else(|| context.calculated.first())
        .or_else(|| context.company.first())
}

fn merge_metric_keys(context: &DataContext, rule_keys: &[String]) -> Vec<String> {
    let mut keys = Vec::<String>::new();
    for point in context.operational.iter().chain(context.calculated.iter()) {
        if !keys.contains(&point.field) {
            keys.push(point.field.clone());
        }
    }
    for key in rule_keys {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}

fn company_name(profile: Option<&CompanyProfile>, context: &DataContext) -> String {
    if let Some(profile) = profile {
        if !profile.company_name.trim().is_empty() {
            return profile.company_name.clone();
        }
    }
    context
        .company
        .iter()
        .find(|point| point.field == "legal_name")
        .map(|point| point.value.render())
        .unwrap_or_else(|| "the company".to_string())
}

fn empty_match(question: &ParsedQuestion) -> MatchResult {
    MatchResult {
        question_id: question.id.clone(),
        primary_domain: None,
        secondary_domains: Vec::new(),
        topics: std::collections::BTreeSet::new(),
        confidence: MatchConfidence::None,
        matched_keywords: Vec::new(),
        suggested_data_points: Vec::new(),
        metric_keys: Vec::new(),
        prompt_if_missing: None,
    }
}

/// Practices whose coarse topic maps onto one of the matched domains.
pub(super) fn relevant_practices<'a>(
    profile: &'a CompanyProfile,
    matched_domains: &[Domain],
) -> Vec<&'a InformalPractice> {
    profile
        .informal_practices
        .iter()
        .filter(|practice| {
            domains_for_practice_topic(&practice.topic)
                .iter()
                .any(|domain| matched_domains.contains(domain))
        })
        .collect()
}

/// The topic the narrative should speak to: the first matched topic, else a
/// default derived from the primary domain.
pub(super) fn narrative_topic(match_result: &MatchResult) -> Option<Topic> {
    if let Some(topic) = match_result.topics.iter().next() {
        return Some(*topic);
    }
    match_result.primary_domain.map(default_topic)
}

fn default_topic(domain: Domain) -> Topic {
    match domain {
        Domain::EnergyElectricity | Domain::EnergyFuels => Topic::EnergyManagement,
        Domain::Emissions => Topic::GhgEmissions,
        Domain::Water => Topic::WaterManagement,
        Domain::Waste => Topic::WasteManagement,
        Domain::Workforce => Topic::DiversityInclusion,
        Domain::HealthSafety => Topic::WorkplaceSafety,
        Domain::Training => Topic::TrainingDevelopment,
        Domain::Governance | Domain::General => Topic::BusinessEthics,
    }
}

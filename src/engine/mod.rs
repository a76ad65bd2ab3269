pub mod classifier;
pub mod emission;
pub mod generator;
pub mod keywords;
pub mod knowledge;
pub mod matcher;
pub mod parser;
pub mod retrieval;
pub mod rewriter;

use crate::engine::classifier::{LexicalClassifier, QuestionTypeClassifier};
use crate::engine::matcher::DomainMatcher;
use crate::engine::retrieval::retrieve_data_context;
use crate::model::{
    AnswerDraft, CompanyProfile, CompanySnapshot, DataContext, GenerationConfig, MatchResult,
    ParsedQuestion, QuestionType, StructuredRule,
};

pub use generator::{generate_answer_drafts, UNKNOWN_ANSWER};

/// Full per-question pass: match, classify, retrieve, generate. Questions
/// are independent of one another; output order mirrors input order.
pub fn answer_questions(
    questions: &[ParsedQuestion],
    snapshot: &CompanySnapshot,
    rules: &[StructuredRule],
    config: &GenerationConfig,
    profile: Option<&CompanyProfile>,
) -> Vec<AnswerDraft> {
    let matcher = DomainMatcher::new(rules);
    let classifier = LexicalClassifier::new();

    let match_results: Vec<MatchResult> = questions
        .iter()
        .map(|question| matcher.match_question(question))
        .collect();
    let contexts: Vec<DataContext> = match_results
        .iter()
        .map(|matched| retrieve_data_context(matched, snapshot))
        .collect();
    let classifications: Vec<QuestionType> = questions
        .iter()
        .map(|question| classifier.classify(question))
        .collect();

    generate_answer_drafts(
        questions,
        &match_results,
        &contexts,
        config,
        profile,
        Some(&classifications),
    )
}

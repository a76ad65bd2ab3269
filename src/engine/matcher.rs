use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::warn;

use crate::engine::keywords::{data_point_hints, KEYWORD_TABLE};
use crate::model::{
    Domain, MatchConfidence, MatchResult, ParsedQuestion, PatternType, StructuredRule, Topic,
};
use crate::util::normalize_for_matching;

const HIGH_SCORE_MIN: u32 = 15;
const MEDIUM_SCORE_MIN: u32 = 8;
const SECONDARY_DOMAIN_MAX: usize = 3;
const HINTS_PER_DOMAIN_MAX: usize = 3;
const HINTS_TOTAL_MAX: usize = 6;

enum CompiledPattern {
    Regex(Regex),
    Substring(String),
}

struct CompiledStructuredRule {
    pattern: CompiledPattern,
    metric_keys: Vec<String>,
    prompt_if_missing: Option<String>,
}

enum KeywordTest {
    Substring,
    WordBoundary(Regex),
}

struct CompiledKeyword {
    keyword: &'static str,
    test: KeywordTest,
}

struct CompiledKeywordRule {
    keywords: Vec<CompiledKeyword>,
    domain: Domain,
    topics: &'static [Topic],
    weight: u32,
}

/// Immutable matcher instance. Structured rules are compiled and sorted at
/// construction; a malformed rule is skipped, never fatal.
pub struct DomainMatcher {
    structured_rules: Vec<CompiledStructuredRule>,
    keyword_rules: Vec<CompiledKeywordRule>,
}

impl DomainMatcher {
    pub fn new(rules: &[StructuredRule]) -> Self {
        let mut sorted = rules.to_vec();
        sorted.sort_by_key(|rule| rule.priority);

        let structured_rules = sorted
            .into_iter()
            .filter_map(|rule| {
                let pattern = match rule.pattern_type {
                    PatternType::Substring => {
                        CompiledPattern::Substring(rule.pattern.to_ascii_lowercase())
                    }
                    PatternType::Regex => match Regex::new(&rule.pattern) {
                        Ok(regex) => CompiledPattern::Regex(regex),
                        Err(error) => {
                            warn!(pattern = %rule.pattern, error = %error, "skipping malformed structured rule");
                            return None;
                        }
                    },
                };
                Some(CompiledStructuredRule {
                    pattern,
                    metric_keys: rule.metric_keys,
                    prompt_if_missing: rule.prompt_if_missing,
                })
            })
            .collect();

        let keyword_rules = KEYWORD_TABLE
            .iter()
            .map(|rule| CompiledKeywordRule {
                keywords: rule
                    .keywords
                    .iter()
                    .map(|keyword| CompiledKeyword {
                        keyword,
                        test: compile_keyword_test(keyword),
                    })
                    .collect(),
                domain: rule.domain,
                topics: rule.topics,
                weight: rule.weight,
            })
            .collect();

        Self {
            structured_rules,
            keyword_rules,
        }
    }

    pub fn match_question(&self, question: &ParsedQuestion) -> MatchResult {
        let mut search = question.text.clone();
        if let Some(category) = &question.category {
            search.push(' ');
            search.push_str(category);
        }
        if let Some(subcategory) = &question.subcategory {
            search.push(' ');
            search.push_str(subcategory);
        }
        let normalized = normalize_for_matching(&search);

        // Structured pass runs first-match-wins but only contributes metric
        // keys and the missing-data prompt; it never shifts the keyword
        // ranking below.
        let structured_hit = self
            .structured_rules
            .iter()
            .find(|rule| pattern_matches(&rule.pattern, &normalized));

        let mut scores = BTreeMap::<Domain, u32>::new();
        let mut domain_topics = BTreeMap::<Domain, BTreeSet<Topic>>::new();
        let mut matched_keywords = Vec::<String>::new();

        for rule in &self.keyword_rules {
            let mut rule_hit = false;
            for compiled in &rule.keywords {
                if keyword_matches(compiled, &normalized) {
                    matched_keywords.push(compiled.keyword.to_string());
                    rule_hit = true;
                }
            }
            if rule_hit {
                *scores.entry(rule.domain).or_default() += rule.weight;
                domain_topics
                    .entry(rule.domain)
                    .or_default()
                    .extend(rule.topics.iter().copied());
            }
        }

        let mut ranked = scores.into_iter().collect::<Vec<(Domain, u32)>>();
        ranked.sort_by(|left, right| right.1.cmp(&left.1));

        let top_score = ranked.first().map(|(_, score)| *score).unwrap_or(0);
        let confidence = confidence_tier(top_score);
        let primary_domain = ranked.first().map(|(domain, _)| *domain);
        let secondary_domains = ranked
            .iter()
            .skip(1)
            .take(SECONDARY_DOMAIN_MAX)
            .map(|(domain, _)| *domain)
            .collect::<Vec<Domain>>();

        let mut topics = BTreeSet::<Topic>::new();
        for (domain, _) in ranked.iter().take(1 + SECONDARY_DOMAIN_MAX) {
            if let Some(domain_set) = domain_topics.get(domain) {
                topics.extend(domain_set.iter().copied());
            }
        }

        let mut suggested_data_points = Vec::<String>::new();
        for (domain, _) in ranked.iter().take(3) {
            for hint in data_point_hints(*domain).iter().take(HINTS_PER_DOMAIN_MAX) {
                if suggested_data_points.len() >= HINTS_TOTAL_MAX {
                    break;
                }
                if !suggested_data_points.iter().any(|existing| existing == hint) {
                    suggested_data_points.push((*hint).to_string());
                }
            }
        }

        MatchResult {
            question_id: question.id.clone(),
            primary_domain,
            secondary_domains,
            topics,
            confidence,
            matched_keywords,
            suggested_data_points,
            metric_keys: structured_hit
                .map(|rule| rule.metric_keys.clone())
                .unwrap_or_default(),
            prompt_if_missing: structured_hit.and_then(|rule| rule.prompt_if_missing.clone()),
        }
    }
}

fn compile_keyword_test(keyword: &str) -> KeywordTest {
    if keyword.contains(' ') {
        return KeywordTest::Substring;
    }
    match Regex::new(&format!(r"\b{}\b", regex::escape(keyword))) {
        Ok(regex) => KeywordTest::WordBoundary(regex),
        // Escaped literals always compile; substring is the safe fallback.
        Err(_) => KeywordTest::Substring,
    }
}

fn keyword_matches(compiled: &CompiledKeyword, normalized: &str) -> bool {
    match &compiled.test {
        KeywordTest::Substring => normalized.contains(compiled.keyword),
        KeywordTest::WordBoundary(regex) => regex.is_match(normalized),
    }
}

fn pattern_matches(pattern: &CompiledPattern, normalized: &str) -> bool {
    match pattern {
        CompiledPattern::Regex(regex) => regex.is_match(normalized),
        CompiledPattern::Substring(needle) => normalized.contains(needle),
    }
}

fn confidence_tier(score: u32) -> MatchConfidence {
    if score >= HIGH_SCORE_MIN {
        MatchConfidence::High
    } else if score >= MEDIUM_SCORE_MIN {
        MatchConfidence::Medium
    } else if score > 0 {
        MatchConfidence::Low
    } else {
        MatchConfidence::None
    }
}

#[cfg(test)]
mod tests {
    use super::DomainMatcher;
    use crate::model::{
        Domain, MatchConfidence, ParsedQuestion, PatternType, StructuredRule, Topic,
    };

    fn question(text: &str) -> ParsedQuestion {
        ParsedQuestion {
            id: "q-001".to_string(),
            text: text.to_string(),
            category: None,
            subcategory: None,
            reference_id: None,
            framework: None,
            required: None,
            row: 1,
        }
    }

    #[test]
    fn renewable_electricity_question_scores_high() {
        let matcher = DomainMatcher::new(&[]);
        let result = matcher.match_question(&question(
            "What percentage of your electricity consumption comes from renewable energy sources?",
        ));

        assert_eq!(result.primary_domain, Some(Domain::EnergyElectricity));
        assert_eq!(result.confidence, MatchConfidence::High);
        assert!(result.topics.contains(&Topic::RenewableEnergy));
        assert!(result
            .matched_keywords
            .iter()
            .any(|keyword| keyword == "renewable energy"));
    }

    #[test]
    fn confidence_tiers_respect_score_thresholds() {
        let matcher = DomainMatcher::new(&[]);

        // "water" alone scores 4 -> low.
        let low = matcher.match_question(&question("Describe your approach to water."));
        assert_eq!(low.confidence, MatchConfidence::Low);

        // "water consumption" (10) + "water" (4) = 14 -> medium.
        let medium = matcher.match_question(&question("Report your total water consumption."));
        assert_eq!(medium.confidence, MatchConfidence::Medium);

        // adds "water withdrawal" (8) -> 22 -> high.
        let high = matcher.match_question(&question(
            "Report your total water consumption and water withdrawal by source.",
        ));
        assert_eq!(high.confidence, MatchConfidence::High);

        let none = matcher.match_question(&question("Describe your product roadmap."));
        assert_eq!(none.confidence, MatchConfidence::None);
        assert!(none.primary_domain.is_none());
    }

    #[test]
    fn single_word_keywords_require_word_boundaries() {
        let matcher = DomainMatcher::new(&[]);
        // "retraining" must not hit the single-word keyword "training".
        let result = matcher.match_question(&question("Describe retraining of suppliers."));
        assert!(!result
            .matched_keywords
            .iter()
            .any(|keyword| keyword == "training"));
    }

    #[test]
    fn matching_is_deterministic() {
        let matcher = DomainMatcher::new(&[]);
        let q = question("Do you track scope 1 and scope 2 greenhouse gas emissions in tCO2e?");
        let first = matcher.match_question(&q);
        let second = matcher.match_question(&q);
        assert_eq!(first, second);
        assert_eq!(first.primary_domain, Some(Domain::Emissions));
    }

    #[test]
    fn secondary_domains_are_capped_at_three() {
        let matcher = DomainMatcher::new(&[]);
        let result = matcher.match_question(&question(
            "Report energy, emissions, water, waste and safety training for employees.",
        ));
        assert!(result.secondary_domains.len() <= 3);
        assert!(result.suggested_data_points.len() <= 6);
    }

    #[test]
    fn structured_rule_attaches_metric_keys_without_changing_ranking() {
        let rules = vec![StructuredRule {
            pattern: "renewable".to_string(),
            pattern_type: PatternType::Substring,
            metric_keys: vec!["renewable_percent".to_string()],
            category: Some("Environment".to_string()),
            prompt_if_missing: Some("Provide your renewable electricity share.".to_string()),
            priority: 10,
        }];
        let with_rule = DomainMatcher::new(&rules);
        let without_rule = DomainMatcher::new(&[]);

        let q = question("What share of electricity is renewable energy?");
        let hit = with_rule.match_question(&q);
        let baseline = without_rule.match_question(&q);

        assert_eq!(hit.metric_keys, vec!["renewable_percent".to_string()]);
        assert!(hit.prompt_if_missing.is_some());
        assert_eq!(hit.primary_domain, baseline.primary_domain);
        assert_eq!(hit.confidence, baseline.confidence);
        assert_eq!(hit.topics, baseline.topics);
    }

    #[test]
    fn malformed_regex_rule_is_skipped_not_fatal() {
        let rules = vec![
            StructuredRule {
                pattern: "(unclosed".to_string(),
                pattern_type: PatternType::Regex,
                metric_keys: vec!["broken".to_string()],
                category: None,
                prompt_if_missing: None,
                priority: 0,
            },
            StructuredRule {
                pattern: r"\bdiesel\b".to_string(),
                pattern_type: PatternType::Regex,
                metric_keys: vec!["diesel_litres".to_string()],
                category: None,
                prompt_if_missing: None,
                priority: 1,
            },
        ];
        let matcher = DomainMatcher::new(&rules);
        let result = matcher.match_question(&question("How much diesel did your fleet consume?"));
        assert_eq!(result.metric_keys, vec!["diesel_litres".to_string()]);
    }

    #[test]
    fn lower_priority_structured_rule_wins_first() {
        let rules = vec![
            StructuredRule {
                pattern: "emissions".to_string(),
                pattern_type: PatternType::Substring,
                metric_keys: vec!["late".to_string()],
                category: None,
                prompt_if_missing: None,
                priority: 20,
            },
            StructuredRule {
                pattern: "emissions".to_string(),
                pattern_type: PatternType::Substring,
                metric_keys: vec!["early".to_string()],
                category: None,
                prompt_if_missing: None,
                priority: 5,
            },
        ];
        let matcher = DomainMatcher::new(&rules);
        let result = matcher.match_question(&question("Report your emissions."));
        assert_eq!(result.metric_keys, vec!["early".to_string()]);
    }

    #[test]
    fn category_text_contributes_to_the_search_string() {
        let matcher = DomainMatcher::new(&[]);
        let mut q = question("Do you have targets in place?");
        q.category = Some("GHG emissions".to_string());
        let result = matcher.match_question(&q);
        assert_eq!(result.primary_domain, Some(Domain::Emissions));
    }
}

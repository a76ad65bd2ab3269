use super::{narrative_topic, relevant_practices, StageAnswer, StageInput};
use crate::engine::knowledge;
use crate::model::{MaturityBand, QuestionType};
use crate::util::next_calendar_year;

/// Stage 1: the maturity matrix. Needs a profile and a topic to speak to;
/// selects one of nine narrative shapes by (question type, maturity band).
/// KPI questions from mature companies fall through to the data templates.
pub(super) fn generate(input: &StageInput) -> Option<StageAnswer> {
    let profile = input.profile?;
    let topic = narrative_topic(input.match_result)?;
    let band = resolve_band(input);

    let guidance = knowledge::lookup(profile.industry.as_deref(), topic);
    let company = input.company;
    let year = next_calendar_year();

    let matched = input.match_result.matched_domains();
    let practices = relevant_practices(profile, &matched);
    let informal = practices
        .iter()
        .filter(|practice| !practice.is_formalized)
        .take(2)
        .collect::<Vec<_>>();

    let text = match (input.question_type, band) {
        (QuestionType::Policy, MaturityBand::None) => format!(
            "{company} recognises the importance of {policy}. Our vision is to manage this area \
             in a structured and transparent way as the business grows. We are preparing a \
             written policy and are formalising our commitments by {year}.",
            policy = guidance.policy_language,
        ),
        (QuestionType::Policy, MaturityBand::Informal) => format!(
            "{company} is committed to {policy}. This commitment is currently applied through \
             established working practices rather than a stand-alone written document. We intend \
             to formalise it into a documented policy by {year}.",
            policy = guidance.policy_language,
        ),
        (QuestionType::Policy, MaturityBand::Formal) => format!(
            "{company} maintains a formal commitment to {policy}. The policy applies to all \
             sites and employees, is communicated internally and is reviewed by management on a \
             regular cycle.",
            policy = guidance.policy_language,
        ),
        (QuestionType::Measure, MaturityBand::None) => format!(
            "{company} is planning operational measures in this area. Candidate steps include \
             {measures}. Implementation is scheduled to begin by {year}.",
            measures = join_listing(guidance.plausible_measures, 3),
        ),
        (QuestionType::Measure, MaturityBand::Informal) => {
            let mut text = format!(
                "{company} applies operational controls in this area, including {measures}.",
                measures = join_listing(guidance.plausible_measures, 3),
            );
            if !informal.is_empty() {
                let listed = informal
                    .iter()
                    .map(|practice| practice.description.trim().trim_end_matches('.'))
                    .collect::<Vec<&str>>()
                    .join("; ");
                text.push_str(&format!(" In day-to-day operations we also {listed}."));
            }
            text.push_str(&format!(
                " These controls are being consolidated into documented procedures by {year}."
            ));
            text
        }
        (QuestionType::Measure, MaturityBand::Formal) => format!(
            "{company} has implemented documented controls covering this area, including \
             {measures}. {approach}",
            measures = join_listing(guidance.plausible_measures, 3),
            approach = guidance.management_approach,
        ),
        (QuestionType::Kpi, MaturityBand::None) => format!(
            "{company} does not yet track a quantitative indicator for this area. We are \
             establishing a measurement baseline and expect first figures to be available by \
             {year}.",
        ),
        (QuestionType::Kpi, MaturityBand::Informal) => format!(
            "{company} monitors this area informally and the available figures are indicative \
             rather than audited. We are formalising data collection to support reliable \
             reporting by {year}.",
        ),
        // Mature KPI answers belong to the data templates.
        (QuestionType::Kpi, MaturityBand::Formal) => return None,
    };

    Some(StageAnswer {
        text,
        used_informal_practice: band == MaturityBand::Informal && !practices.is_empty(),
        assumptions: Vec::new(),
    })
}

/// Formal when substantive data or a formalized practice covers the matched
/// domains; informal when only undocumented practices do; none otherwise.
fn resolve_band(input: &StageInput) -> MaturityBand {
    let has_substantive_data =
        !input.context.operational.is_empty() || !input.context.calculated.is_empty();

    let matched = input.match_result.matched_domains();
    let practices = input
        .profile
        .map(|profile| relevant_practices(profile, &matched))
        .unwrap_or_default();
    let any_formalized = practices.iter().any(|practice| practice.is_formalized);
    let any_informal = practices.iter().any(|practice| !practice.is_formalized);

    if has_substantive_data || any_formalized {
        MaturityBand::Formal
    } else if any_informal {
        MaturityBand::Informal
    } else {
        MaturityBand::None
    }
}

fn join_listing(items: &[&str], take: usize) -> String {
    let taken = items.iter().take(take).copied().collect::<Vec<&str>>();
    match taken.len() {
        0 => String::new(),
        1 => taken[0].to_string(),
        count => {
            let mut out = taken[..count - 1].join(", ");
            out.push_str(" and ");
            out.push_str(taken[count - 1]);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::join_listing;

    #[test]
    fn listings_read_naturally() {
        assert_eq!(join_listing(&["a"], 3), "a");
        assert_eq!(join_listing(&["a", "b"], 3), "a and b");
        assert_eq!(join_listing(&["a", "b", "c", "d"], 3), "a, b and c");
        assert_eq!(join_listing(&[], 3), "");
    }
}

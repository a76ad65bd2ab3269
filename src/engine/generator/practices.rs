use super::{narrative_topic, relevant_practices, StageAnswer, StageInput};
use crate::engine::knowledge;
use crate::util::next_calendar_year;

/// Stage 3: narrative built from user-reported practices when no data
/// template fired. Leads with the action being taken, keeps documented and
/// undocumented practices apart and closes with a formalization commitment.
pub(super) fn generate(input: &StageInput) -> Option<StageAnswer> {
    let profile = input.profile?;
    let matched = input.match_result.matched_domains();
    let practices = relevant_practices(profile, &matched);
    if practices.is_empty() {
        return None;
    }

    let formalized = practices
        .iter()
        .filter(|practice| practice.is_formalized)
        .map(|practice| practice.description.trim().trim_end_matches('.'))
        .collect::<Vec<&str>>();
    let informal = practices
        .iter()
        .filter(|practice| !practice.is_formalized)
        .map(|practice| practice.description.trim().trim_end_matches('.'))
        .collect::<Vec<&str>>();

    let company = input.company;
    let mut text = format!("{company} already takes concrete steps in this area.");
    if !formalized.is_empty() {
        text.push_str(&format!(
            " The following practices are documented and consistently applied: {}.",
            formalized.join("; ")
        ));
    }
    if !informal.is_empty() {
        text.push_str(&format!(
            " In day-to-day operations we additionally {}.",
            informal.join("; ")
        ));
    }

    if let Some(topic) = narrative_topic(input.match_result) {
        let guidance = knowledge::lookup(profile.industry.as_deref(), topic);
        text.push(' ');
        text.push_str(guidance.management_approach);
    }

    text.push_str(&format!(
        " We intend to formalise these practices into documented procedures by {}.",
        next_calendar_year()
    ));

    Some(StageAnswer {
        text,
        used_informal_practice: true,
        assumptions: vec![
            "Practice descriptions reflect management self-assessment and are not yet independently documented."
                .to_string(),
        ],
    })
}

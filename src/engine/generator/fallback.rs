use super::{StageAnswer, StageInput};

const FALLBACK_POINT_MAX: usize = 5;

/// Stage 4: always produces an answer. Joins the retrieved points as plain
/// "label: value" statements, or states that data collection is being
/// established when nothing was retrieved.
pub(super) fn generate(input: &StageInput) -> Option<StageAnswer> {
    let mut statements = Vec::<String>::new();
    for point in input
        .context
        .operational
        .iter()
        .chain(input.context.calculated.iter())
        .chain(input.context.company.iter())
        .take(FALLBACK_POINT_MAX)
    {
        let mut statement = format!("{}: {}", point.label, point.value.render());
        if let Some(unit) = &point.unit {
            statement.push(' ');
            statement.push_str(unit);
        }
        statements.push(statement);
    }

    let text = if statements.is_empty() {
        no_data_sentence(input.company)
    } else {
        format!(
            "Our current records show the following for this topic: {}.",
            statements.join("; ")
        )
    };

    Some(StageAnswer {
        text,
        used_informal_practice: false,
        assumptions: Vec::new(),
    })
}

pub(super) fn no_data_sentence(company: &str) -> String {
    format!(
        "{company} is currently establishing data collection processes for this topic and will \
         provide a quantified response in a future reporting cycle."
    )
}

use super::{StageAnswer, StageInput};
use crate::engine::keywords::framework_boilerplate;
use crate::model::{DataContext, DataValue, Domain, Topic, Verbosity};
use crate::util::format_number;

struct TemplateEntry {
    domains: &'static [Domain],
    topics: &'static [Topic],
    generate: fn(&StageInput) -> Option<String>,
}

/// Registration order is the tie-break for equal topic overlap.
const REGISTRY: &[TemplateEntry] = &[
    TemplateEntry {
        domains: &[Domain::EnergyElectricity],
        topics: &[Topic::RenewableEnergy, Topic::EnergyManagement],
        generate: electricity_template,
    },
    TemplateEntry {
        domains: &[Domain::Emissions],
        topics: &[Topic::GhgEmissions, Topic::ClimateStrategy],
        generate: emissions_template,
    },
    TemplateEntry {
        domains: &[Domain::Water],
        topics: &[Topic::WaterManagement],
        generate: water_template,
    },
    TemplateEntry {
        domains: &[Domain::Waste],
        topics: &[Topic::WasteManagement, Topic::CircularEconomy],
        generate: waste_template,
    },
    TemplateEntry {
        domains: &[Domain::Workforce],
        topics: &[Topic::DiversityInclusion, Topic::EmployeeWellbeing],
        generate: workforce_template,
    },
    TemplateEntry {
        domains: &[Domain::HealthSafety],
        topics: &[Topic::WorkplaceSafety],
        generate: safety_template,
    },
    TemplateEntry {
        domains: &[Domain::Training],
        topics: &[Topic::TrainingDevelopment],
        generate: training_template,
    },
];

/// Stage 2: rich data templates. Candidates overlap the match result on
/// domain or topic; the highest topic-overlap count wins and each generator
/// is gated on its own data sufficiency.
pub(super) fn generate(input: &StageInput) -> Option<StageAnswer> {
    let matched_domains = input.match_result.matched_domains();

    let mut winner: Option<(usize, &TemplateEntry)> = None;
    for entry in REGISTRY {
        let domain_overlap = entry
            .domains
            .iter()
            .any(|domain| matched_domains.contains(domain));
        let topic_overlap = entry
            .topics
            .iter()
            .filter(|topic| input.match_result.topics.contains(topic))
            .count();
        if !domain_overlap && topic_overlap == 0 {
            continue;
        }
        let better = winner
            .map(|(best, _)| topic_overlap > best)
            .unwrap_or(true);
        if better {
            winner = Some((topic_overlap, entry));
        }
    }

    let (_, entry) = winner?;
    let mut text = (entry.generate)(input)?;

    if input.config.aggregate_sites && input.context.sites_included.len() > 1 {
        text.push_str(&format!(
            " Figures are aggregated across {} sites.",
            input.context.sites_included.len()
        ));
    }

    if let Some(framework) = input.question.framework {
        text.push(' ');
        text.push_str(framework_boilerplate(framework));
    }

    Some(StageAnswer {
        text,
        used_informal_practice: false,
        assumptions: Vec::new(),
    })
}

fn number(context: &DataContext, field: &str) -> Option<f64> {
    context.all_points().find_map(|point| {
        if point.field != field {
            return None;
        }
        match point.value {
            DataValue::Number(value) if value != 0.0 => Some(value),
            _ => None,
        }
    })
}

fn period_clause(context: &DataContext) -> String {
    match &context.reporting_period {
        Some(period) => format!("In the {period} reporting period"),
        None => "In the most recent reporting period".to_string(),
    }
}

fn electricity_template(input: &StageInput) -> Option<String> {
    let kwh = number(input.context, "electricity_kwh")?;
    let company = input.company;
    let mut text = format!(
        "{period}, {company} consumed {kwh} kWh of electricity.",
        period = period_clause(input.context),
        kwh = format_number(kwh),
    );

    if let Some(percent) = number(input.context, "renewable_percent") {
        if percent >= 50.0 {
            text.push_str(&format!(
                " Renewable sources accounted for {share}% of this consumption, reflecting a \
                 predominantly renewable supply mix.",
                share = format_number(percent),
            ));
        } else {
            text.push_str(&format!(
                " Renewable sources accounted for {share}% of this consumption, and we are \
                 working to increase this share through procurement choices.",
                share = format_number(percent),
            ));
        }
    }

    if input.config.include_methodology && input.config.verbosity != Verbosity::Concise {
        text.push_str(" Figures are taken from supplier invoices and meter readings.");
    }
    Some(text)
}

fn emissions_template(input: &StageInput) -> Option<String> {
    let scope1 = number(input.context, "scope1_tco2e");
    let scope2 = number(input.context, "scope2_tco2e");
    let scope2_location = number(input.context, "scope2_location_tco2e");
    let scope2_market = number(input.context, "scope2_market_tco2e");
    if scope1.is_none() && scope2.is_none() && scope2_location.is_none() && scope2_market.is_none()
    {
        return None;
    }

    let mut clauses = Vec::<String>::new();
    if let Some(value) = scope1 {
        clauses.push(format!("Scope 1 emissions of {} tCO2e", format_number(value)));
    }
    if let Some(value) = scope2 {
        clauses.push(format!("Scope 2 emissions of {} tCO2e", format_number(value)));
    }
    if let Some(value) = scope2_location {
        clauses.push(format!(
            "location-based Scope 2 emissions of {} tCO2e",
            format_number(value)
        ));
    }
    if let Some(value) = scope2_market {
        clauses.push(format!(
            "market-based Scope 2 emissions of {} tCO2e",
            format_number(value)
        ));
    }

    let mut text = format!(
        "{period}, {company} accounted for {clauses}.",
        period = period_clause(input.context),
        company = input.company,
        clauses = clauses.join(", "),
    );

    let any_estimate = input.context.calculated.iter().any(|point| point.is_estimate);
    if any_estimate && input.config.include_methodology && input.config.verbosity != Verbosity::Concise
    {
        text.push_str(
            " Estimates follow the GHG Protocol and apply published average emission factors to \
             our activity data.",
        );
    }
    Some(text)
}

fn water_template(input: &StageInput) -> Option<String> {
    let volume = number(input.context, "water_m3")?;
    Some(format!(
        "{period}, {company} withdrew {volume} m3 of water across the sites in scope. \
         Consumption is tracked through metered utility data.",
        period = period_clause(input.context),
        company = input.company,
        volume = format_number(volume),
    ))
}

fn waste_template(input: &StageInput) -> Option<String> {
    let total = number(input.context, "total_waste_kg")?;
    let mut text = format!(
        "{period}, {company} generated {total} kg of waste.",
        period = period_clause(input.context),
        company = input.company,
        total = format_number(total),
    );
    if let Some(recycled) = number(input.context, "recycled_waste_kg") {
        let share = (recycled / total * 100.0).clamp(0.0, 100.0);
        text.push_str(&format!(
            " Of this, {recycled} kg ({share}%) was separated for recycling.",
            recycled = format_number(recycled),
            share = format_number(share),
        ));
    }
    Some(text)
}

fn workforce_template(input: &StageInput) -> Option<String> {
    let headcount = number(input.context, "headcount")?;
    let mut text = format!(
        "{company} employed {headcount} people in the period under review.",
        company = input.company,
        headcount = format_number(headcount),
    );
    if let Some(share) = number(input.context, "female_headcount_percent") {
        text.push_str(&format!(
            " Women represented {share}% of the workforce.",
            share = format_number(share),
        ));
    }
    Some(text)
}

fn safety_template(input: &StageInput) -> Option<String> {
    let incidents = number(input.context, "lost_time_incidents")?;
    Some(format!(
        "{period}, {company} recorded {incidents} lost-time incidents. Each incident is \
         investigated and corrective actions are tracked to closure.",
        period = period_clause(input.context),
        company = input.company,
        incidents = format_number(incidents),
    ))
}

fn training_template(input: &StageInput) -> Option<String> {
    let hours = number(input.context, "training_hours")?;
    let mut text = format!(
        "{period}, {company} delivered {hours} hours of employee training.",
        period = period_clause(input.context),
        company = input.company,
        hours = format_number(hours),
    );
    if let Some(headcount) = number(input.context, "headcount") {
        let per_employee = hours / headcount;
        text.push_str(&format!(
            " This corresponds to {per_employee} hours per employee.",
            per_employee = format_number(per_employee),
        ));
    }
    Some(text)
}

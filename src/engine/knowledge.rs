use crate::model::Topic;

/// Per-(industry, topic) policy language and plausible operational measures,
/// consumed by the maturity-matrix and informal-practice stages.
#[derive(Debug, Clone, Copy)]
pub struct IndustryGuidance {
    pub policy_language: &'static str,
    pub management_approach: &'static str,
    pub plausible_measures: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndustryGroup {
    Manufacturing,
    Logistics,
    Retail,
    Construction,
    Services,
}

fn industry_group(industry: Option<&str>) -> IndustryGroup {
    let lowered = industry.unwrap_or("").to_ascii_lowercase();
    if lowered.contains("manufactur") || lowered.contains("industrial") || lowered.contains("factory") {
        IndustryGroup::Manufacturing
    } else if lowered.contains("logistic") || lowered.contains("transport") || lowered.contains("freight") {
        IndustryGroup::Logistics
    } else if lowered.contains("retail") || lowered.contains("wholesale") || lowered.contains("commerce") {
        IndustryGroup::Retail
    } else if lowered.contains("construct") || lowered.contains("building") {
        IndustryGroup::Construction
    } else {
        IndustryGroup::Services
    }
}

pub fn lookup(industry: Option<&str>, topic: Topic) -> IndustryGuidance {
    let group = industry_group(industry);
    match topic {
        Topic::EnergyManagement | Topic::RenewableEnergy => energy_guidance(group),
        Topic::GhgEmissions | Topic::ClimateStrategy => emissions_guidance(group),
        Topic::WaterManagement => water_guidance(group),
        Topic::WasteManagement | Topic::CircularEconomy => waste_guidance(group),
        Topic::DiversityInclusion | Topic::EmployeeWellbeing => workforce_guidance(),
        Topic::WorkplaceSafety => safety_guidance(group),
        Topic::TrainingDevelopment => training_guidance(),
        Topic::BusinessEthics => ethics_guidance(),
    }
}

fn energy_guidance(group: IndustryGroup) -> IndustryGuidance {
    match group {
        IndustryGroup::Manufacturing => IndustryGuidance {
            policy_language: "reducing the energy intensity of our production processes",
            management_approach: "Energy use is reviewed as part of routine production planning.",
            plausible_measures: &[
                "sub-metering of major production lines",
                "compressed-air leak detection rounds",
                "scheduled shutdown of idle equipment",
            ],
        },
        IndustryGroup::Logistics => IndustryGuidance {
            policy_language: "improving the fuel and energy efficiency of our fleet and depots",
            management_approach: "Fuel and electricity use is monitored at depot level.",
            plausible_measures: &[
                "route optimisation for regular deliveries",
                "driver eco-driving briefings",
                "LED conversion in warehouses",
            ],
        },
        _ => IndustryGuidance {
            policy_language: "reducing the energy consumption of our facilities",
            management_approach: "Energy consumption is reviewed against utility invoices.",
            plausible_measures: &[
                "LED lighting replacement",
                "heating and cooling set-point adjustments",
                "switching off equipment outside business hours",
            ],
        },
    }
}

fn emissions_guidance(group: IndustryGroup) -> IndustryGuidance {
    match group {
        IndustryGroup::Manufacturing => IndustryGuidance {
            policy_language: "measuring and reducing the greenhouse gas emissions of our operations and production",
            management_approach: "Emission sources are reviewed alongside annual energy figures.",
            plausible_measures: &[
                "annual estimation of Scope 1 and Scope 2 emissions",
                "prioritising electricity over fossil-fuelled process heat where feasible",
                "supplier dialogue on material footprints",
            ],
        },
        IndustryGroup::Logistics => IndustryGuidance {
            policy_language: "measuring and reducing emissions from transport operations",
            management_approach: "Fleet emissions are tracked through fuel purchase records.",
            plausible_measures: &[
                "fleet renewal towards lower-emission vehicles",
                "load-factor optimisation",
                "annual Scope 1 estimation from fuel data",
            ],
        },
        _ => IndustryGuidance {
            policy_language: "measuring and reducing the greenhouse gas emissions of our activities",
            management_approach: "Emissions are estimated annually from energy consumption data.",
            plausible_measures: &[
                "annual estimation of Scope 1 and Scope 2 emissions",
                "green electricity procurement",
                "reducing business travel where practical",
            ],
        },
    }
}

fn water_guidance(group: IndustryGroup) -> IndustryGuidance {
    match group {
        IndustryGroup::Manufacturing => IndustryGuidance {
            policy_language: "using water efficiently in our production processes",
            management_approach: "Water use is monitored through metered consumption per site.",
            plausible_measures: &[
                "monitoring of process water consumption",
                "reuse of rinse water where quality permits",
                "prompt repair of detected leaks",
            ],
        },
        _ => IndustryGuidance {
            policy_language: "using water responsibly across our sites",
            management_approach: "Water consumption is reviewed through utility invoices.",
            plausible_measures: &[
                "water-efficient fittings in sanitary facilities",
                "leak checks during facility inspections",
            ],
        },
    }
}

fn waste_guidance(group: IndustryGroup) -> IndustryGuidance {
    match group {
        IndustryGroup::Construction => IndustryGuidance {
            policy_language: "reducing and segregating construction waste",
            management_approach: "Waste streams are handled by licensed contractors per site.",
            plausible_measures: &[
                "on-site segregation of waste fractions",
                "reuse of excavated material where permitted",
                "licensed disposal of hazardous fractions",
            ],
        },
        _ => IndustryGuidance {
            policy_language: "reducing waste and increasing recycling across our operations",
            management_approach: "Waste volumes are tracked through contractor reports.",
            plausible_measures: &[
                "separate collection of recyclable fractions",
                "reduction of single-use packaging",
                "reuse of shipping materials",
            ],
        },
    }
}

fn workforce_guidance() -> IndustryGuidance {
    IndustryGuidance {
        policy_language: "providing an inclusive and fair working environment",
        management_approach: "Workforce composition is reviewed as part of HR reporting.",
        plausible_measures: &[
            "structured, criteria-based recruitment",
            "flexible working arrangements",
            "regular employee feedback conversations",
        ],
    }
}

fn safety_guidance(group: IndustryGroup) -> IndustryGuidance {
    match group {
        IndustryGroup::Services | IndustryGroup::Retail => IndustryGuidance {
            policy_language: "maintaining a safe and healthy workplace",
            management_approach: "Workplace risks are assessed during facility reviews.",
            plausible_measures: &[
                "workstation ergonomics checks",
                "first-aid training for designated staff",
            ],
        },
        _ => IndustryGuidance {
            policy_language: "preventing occupational injuries and work-related ill health",
            management_approach: "Incidents and near misses are recorded and reviewed.",
            plausible_measures: &[
                "site-level risk assessments",
                "mandatory personal protective equipment",
                "incident and near-miss recording",
            ],
        },
    }
}

fn training_guidance() -> IndustryGuidance {
    IndustryGuidance {
        policy_language: "developing the skills and competence of our employees",
        management_approach: "Training needs are reviewed in annual development discussions.",
        plausible_measures: &[
            "onboarding training for all new joiners",
            "role-specific technical training",
            "support for external certifications",
        ],
    }
}

fn ethics_guidance() -> IndustryGuidance {
    IndustryGuidance {
        policy_language: "conducting business honestly and in compliance with applicable law",
        management_approach: "Ethics matters are escalated directly to management.",
        plausible_measures: &[
            "management review of third-party relationships",
            "four-eyes approval of significant payments",
            "confidential reporting route to management",
        ],
    }
}

use crate::model::{Domain, Framework, Topic};

/// One keyword rule: any keyword hit scores the rule's weight once for the
/// rule's domain and contributes the rule's topics.
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub domain: Domain,
    pub topics: &'static [Topic],
    pub weight: u32,
}

pub const KEYWORD_TABLE: &[KeywordRule] = &[
    // energy_electricity
    KeywordRule {
        keywords: &["electricity consumption", "electricity use", "electricity usage"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::EnergyManagement],
        weight: 10,
    },
    KeywordRule {
        keywords: &["renewable energy", "renewable electricity", "green electricity", "green energy"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::RenewableEnergy],
        weight: 10,
    },
    KeywordRule {
        keywords: &["energy efficiency", "energy management", "energy intensity"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::EnergyManagement],
        weight: 8,
    },
    KeywordRule {
        keywords: &["kwh", "mwh", "megawatt"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::EnergyManagement],
        weight: 8,
    },
    KeywordRule {
        keywords: &["solar", "wind power", "power purchase agreement"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::RenewableEnergy],
        weight: 5,
    },
    KeywordRule {
        keywords: &["electricity"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::EnergyManagement],
        weight: 5,
    },
    KeywordRule {
        keywords: &["energy"],
        domain: Domain::EnergyElectricity,
        topics: &[Topic::EnergyManagement],
        weight: 3,
    },
    // energy_fuels
    KeywordRule {
        keywords: &["natural gas", "gas consumption"],
        domain: Domain::EnergyFuels,
        topics: &[Topic::EnergyManagement],
        weight: 8,
    },
    KeywordRule {
        keywords: &["diesel", "fuel consumption", "fuel use", "fleet fuel"],
        domain: Domain::EnergyFuels,
        topics: &[Topic::EnergyManagement],
        weight: 8,
    },
    // emissions
    KeywordRule {
        keywords: &["ghg emissions", "greenhouse gas", "greenhouse gases"],
        domain: Domain::Emissions,
        topics: &[Topic::GhgEmissions],
        weight: 10,
    },
    KeywordRule {
        keywords: &["carbon footprint"],
        domain: Domain::Emissions,
        topics: &[Topic::GhgEmissions],
        weight: 10,
    },
    KeywordRule {
        keywords: &["scope 1", "scope 2", "scope 3"],
        domain: Domain::Emissions,
        topics: &[Topic::GhgEmissions],
        weight: 10,
    },
    KeywordRule {
        keywords: &["tco2e", "co2", "carbon dioxide"],
        domain: Domain::Emissions,
        topics: &[Topic::GhgEmissions],
        weight: 8,
    },
    KeywordRule {
        keywords: &["net zero", "net-zero", "decarbonisation", "decarbonization", "climate target", "science based targets"],
        domain: Domain::Emissions,
        topics: &[Topic::ClimateStrategy],
        weight: 8,
    },
    KeywordRule {
        keywords: &["climate change", "climate risk"],
        domain: Domain::Emissions,
        topics: &[Topic::ClimateStrategy],
        weight: 6,
    },
    KeywordRule {
        keywords: &["emissions"],
        domain: Domain::Emissions,
        topics: &[Topic::GhgEmissions],
        weight: 5,
    },
    KeywordRule {
        keywords: &["carbon"],
        domain: Domain::Emissions,
        topics: &[Topic::GhgEmissions],
        weight: 3,
    },
    // water
    KeywordRule {
        keywords: &["water consumption", "water use", "water usage"],
        domain: Domain::Water,
        topics: &[Topic::WaterManagement],
        weight: 10,
    },
    KeywordRule {
        keywords: &["water withdrawal", "wastewater", "water discharge", "water stress"],
        domain: Domain::Water,
        topics: &[Topic::WaterManagement],
        weight: 8,
    },
    KeywordRule {
        keywords: &["water"],
        domain: Domain::Water,
        topics: &[Topic::WaterManagement],
        weight: 4,
    },
    // waste
    KeywordRule {
        keywords: &["waste management", "waste generated", "waste generation"],
        domain: Domain::Waste,
        topics: &[Topic::WasteManagement],
        weight: 10,
    },
    KeywordRule {
        keywords: &["hazardous waste", "landfill"],
        domain: Domain::Waste,
        topics: &[Topic::WasteManagement],
        weight: 8,
    },
    KeywordRule {
        keywords: &["recycling", "recycled", "recyclable"],
        domain: Domain::Waste,
        topics: &[Topic::CircularEconomy],
        weight: 8,
    },
    KeywordRule {
        keywords: &["circular economy", "material reuse"],
        domain: Domain::Waste,
        topics: &[Topic::CircularEconomy],
        weight: 8,
    },
    KeywordRule {
        keywords: &["waste"],
        domain: Domain::Waste,
        topics: &[Topic::WasteManagement],
        weight: 5,
    },
    // workforce
    KeywordRule {
        keywords: &["diversity", "gender balance", "gender pay"],
        domain: Domain::Workforce,
        topics: &[Topic::DiversityInclusion],
        weight: 10,
    },
    KeywordRule {
        keywords: &["inclusion", "equal opportunity", "equal opportunities"],
        domain: Domain::Workforce,
        topics: &[Topic::DiversityInclusion],
        weight: 8,
    },
    KeywordRule {
        keywords: &["employee wellbeing", "employee well-being", "work-life balance"],
        domain: Domain::Workforce,
        topics: &[Topic::EmployeeWellbeing],
        weight: 8,
    },
    KeywordRule {
        keywords: &["turnover", "retention"],
        domain: Domain::Workforce,
        topics: &[Topic::EmployeeWellbeing],
        weight: 5,
    },
    KeywordRule {
        keywords: &["headcount", "employees", "workforce"],
        domain: Domain::Workforce,
        topics: &[Topic::EmployeeWellbeing],
        weight: 4,
    },
    // health_safety
    KeywordRule {
        keywords: &["health and safety", "occupational health", "occupational safety"],
        domain: Domain::HealthSafety,
        topics: &[Topic::WorkplaceSafety],
        weight: 10,
    },
    KeywordRule {
        keywords: &["lost time", "incident rate", "accident", "accidents", "injury", "injuries"],
        domain: Domain::HealthSafety,
        topics: &[Topic::WorkplaceSafety],
        weight: 8,
    },
    KeywordRule {
        keywords: &["safety"],
        domain: Domain::HealthSafety,
        topics: &[Topic::WorkplaceSafety],
        weight: 5,
    },
    // training
    KeywordRule {
        keywords: &["training hours", "training and development"],
        domain: Domain::Training,
        topics: &[Topic::TrainingDevelopment],
        weight: 10,
    },
    KeywordRule {
        keywords: &["training", "upskilling", "professional development"],
        domain: Domain::Training,
        topics: &[Topic::TrainingDevelopment],
        weight: 5,
    },
    // governance
    KeywordRule {
        keywords: &["code of conduct", "business ethics", "anti-corruption", "anti-bribery"],
        domain: Domain::Governance,
        topics: &[Topic::BusinessEthics],
        weight: 10,
    },
    KeywordRule {
        keywords: &["whistleblowing", "whistleblower"],
        domain: Domain::Governance,
        topics: &[Topic::BusinessEthics],
        weight: 8,
    },
    KeywordRule {
        keywords: &["board oversight", "governance"],
        domain: Domain::Governance,
        topics: &[Topic::BusinessEthics],
        weight: 5,
    },
    KeywordRule {
        keywords: &["compliance", "ethics"],
        domain: Domain::Governance,
        topics: &[Topic::BusinessEthics],
        weight: 4,
    },
];

/// Data-point hints surfaced to the caller per domain; the matcher takes up
/// to three per domain for the top three domains, capped at six overall.
pub fn data_point_hints(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::EnergyElectricity => &[
            "Total electricity consumption (kWh)",
            "Renewable share of electricity (%)",
            "Energy intensity per employee",
        ],
        Domain::EnergyFuels => &[
            "Natural gas consumption (m3)",
            "Diesel consumption (litres)",
        ],
        Domain::Emissions => &[
            "Scope 1 emissions (tCO2e)",
            "Scope 2 emissions (tCO2e)",
            "Emission factor source",
        ],
        Domain::Water => &[
            "Total water consumption (m3)",
            "Water withdrawal by source",
        ],
        Domain::Waste => &[
            "Total waste generated (kg)",
            "Recycled waste share (%)",
        ],
        Domain::Workforce => &[
            "Total headcount",
            "Female share of workforce (%)",
        ],
        Domain::HealthSafety => &[
            "Lost-time incidents",
            "Incident rate per 200,000 hours",
        ],
        Domain::Training => &[
            "Total training hours",
            "Training hours per employee",
        ],
        Domain::Governance => &[
            "Code of conduct in place",
            "Whistleblowing channel in place",
        ],
        Domain::General => &[],
    }
}

/// Fixed mapping from profile practice topics to the domains they cover.
/// Practice topics are coarse labels supplied by onboarding, compared
/// case-insensitively.
pub fn domains_for_practice_topic(topic: &str) -> &'static [Domain] {
    match topic.trim().to_ascii_uppercase().as_str() {
        "ENVIRONMENT" => &[
            Domain::EnergyElectricity,
            Domain::EnergyFuels,
            Domain::Emissions,
            Domain::Water,
            Domain::Waste,
        ],
        "ENERGY" => &[Domain::EnergyElectricity, Domain::EnergyFuels],
        "EMISSIONS" | "CLIMATE" => &[Domain::Emissions],
        "WATER" => &[Domain::Water],
        "WASTE" => &[Domain::Waste],
        "SOCIAL" => &[Domain::Workforce, Domain::HealthSafety, Domain::Training],
        "HEALTH_SAFETY" | "SAFETY" => &[Domain::HealthSafety],
        "TRAINING" => &[Domain::Training],
        "GOVERNANCE" | "ETHICS" => &[Domain::Governance],
        _ => &[],
    }
}

/// One boilerplate sentence appended by the rich-template stage when the
/// questionnaire carried a recognizable framework signature.
pub fn framework_boilerplate(framework: Framework) -> &'static str {
    match framework {
        Framework::Csrd => {
            "This disclosure is prepared with reference to the ESRS under the EU Corporate Sustainability Reporting Directive (CSRD)."
        }
        Framework::Gri => {
            "This disclosure is aligned with the applicable GRI Standards reporting requirements."
        }
        Framework::Cdp => {
            "Figures are stated on a basis consistent with our CDP questionnaire submission."
        }
        Framework::Ecovadis => {
            "Supporting documentation is available for EcoVadis assessment purposes."
        }
        Framework::Sasb => {
            "Metrics are reported with reference to the relevant SASB industry standard."
        }
        Framework::Tcfd => {
            "This response reflects the governance, strategy and metrics pillars of the TCFD recommendations."
        }
        Framework::Sdg => {
            "Our activities in this area contribute to the relevant UN Sustainable Development Goals."
        }
    }
}

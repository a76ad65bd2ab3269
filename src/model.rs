use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    EnergyElectricity,
    EnergyFuels,
    Emissions,
    Water,
    Waste,
    Workforce,
    HealthSafety,
    Training,
    Governance,
    General,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnergyElectricity => "energy_electricity",
            Self::EnergyFuels => "energy_fuels",
            Self::Emissions => "emissions",
            Self::Water => "water",
            Self::Waste => "waste",
            Self::Workforce => "workforce",
            Self::HealthSafety => "health_safety",
            Self::Training => "training",
            Self::Governance => "governance",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    GhgEmissions,
    RenewableEnergy,
    EnergyManagement,
    WaterManagement,
    WasteManagement,
    CircularEconomy,
    DiversityInclusion,
    EmployeeWellbeing,
    WorkplaceSafety,
    TrainingDevelopment,
    BusinessEthics,
    ClimateStrategy,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Framework {
    Csrd,
    Gri,
    Cdp,
    Ecovadis,
    Sasb,
    Tcfd,
    Sdg,
}

impl Framework {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csrd => "CSRD",
            Self::Gri => "GRI",
            Self::Cdp => "CDP",
            Self::Ecovadis => "ECOVADIS",
            Self::Sasb => "SASB",
            Self::Tcfd => "TCFD",
            Self::Sdg => "SDG",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    Policy,
    Measure,
    Kpi,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataConfidence {
    High,
    Medium,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerConfidence {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceSource {
    Provided,
    Estimated,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaturityBand {
    None,
    Informal,
    Formal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub id: String,
    pub text: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub reference_id: Option<String>,
    pub framework: Option<Framework>,
    pub required: Option<bool>,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub question_id: String,
    pub primary_domain: Option<Domain>,
    pub secondary_domains: Vec<Domain>,
    pub topics: BTreeSet<Topic>,
    pub confidence: MatchConfidence,
    pub matched_keywords: Vec<String>,
    pub suggested_data_points: Vec<String>,
    pub metric_keys: Vec<String>,
    pub prompt_if_missing: Option<String>,
}

impl MatchResult {
    pub fn matched_domains(&self) -> Vec<Domain> {
        let mut domains = Vec::with_capacity(1 + self.secondary_domains.len());
        if let Some(primary) = self.primary_domain {
            domains.push(primary);
        }
        domains.extend(self.secondary_domains.iter().copied());
        domains
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Flag(bool),
    Text(String),
    Null,
}

impl DataValue {
    pub fn render(&self) -> String {
        match self {
            Self::Number(value) => crate::util::format_number(*value),
            Self::Flag(value) => if *value { "yes" } else { "no" }.to_string(),
            Self::Text(value) => value.clone(),
            Self::Null => "n/a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDataPoint {
    pub domain: Domain,
    pub field: String,
    pub label: String,
    pub value: DataValue,
    pub unit: Option<String>,
    pub confidence: DataConfidence,
    /// Set where the point is created; never inferred from label text.
    pub is_estimate: bool,
    pub period: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataContext {
    pub company: Vec<RetrievedDataPoint>,
    pub operational: Vec<RetrievedDataPoint>,
    pub calculated: Vec<RetrievedDataPoint>,
    pub reporting_period: Option<String>,
    pub data_gaps: Vec<String>,
    pub sites_included: Vec<String>,
}

impl DataContext {
    pub fn all_points(&self) -> impl Iterator<Item = &RetrievedDataPoint> {
        self.company
            .iter()
            .chain(self.operational.iter())
            .chain(self.calculated.iter())
    }

    pub fn has_any_data(&self) -> bool {
        self.all_points().next().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformalPractice {
    pub topic: String,
    pub description: String,
    pub is_formalized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: Option<String>,
    pub reporting_period: Option<String>,
    pub maturity_level: Option<String>,
    #[serde(default)]
    pub informal_practices: Vec<InformalPractice>,
}

/// Flat company-data snapshot keyed by business field. All fields are
/// optional; retrieval applies the presence rule on top of `Option`
/// (empty string, zero and null all count as absent, so a reported zero
/// is indistinguishable from "not reported").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySnapshot {
    pub legal_name: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub headcount: Option<f64>,
    pub sites: Vec<String>,
    pub revenue_band: Option<String>,
    pub reporting_period: Option<String>,
    pub electricity_kwh: Option<f64>,
    pub renewable_percent: Option<f64>,
    pub natural_gas_m3: Option<f64>,
    pub diesel_litres: Option<f64>,
    pub water_m3: Option<f64>,
    pub total_waste_kg: Option<f64>,
    pub recycled_waste_kg: Option<f64>,
    pub female_headcount_percent: Option<f64>,
    pub lost_time_incidents: Option<f64>,
    pub training_hours: Option<f64>,
    pub scope1_override_tco2e: Option<f64>,
    pub scope2_override_tco2e: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Concise,
    #[default]
    Standard,
    Detailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub verbosity: Verbosity,
    pub include_methodology: bool,
    pub include_assumptions: bool,
    pub include_limitations: bool,
    pub aggregate_sites: bool,
    pub use_llm: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Standard,
            include_methodology: true,
            include_assumptions: true,
            include_limitations: true,
            aggregate_sites: true,
            use_llm: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDraft {
    pub question_id: String,
    pub question_text: String,
    pub category: Option<String>,
    pub question_type: QuestionType,
    pub match_result: MatchResult,
    pub data_context: DataContext,
    pub answer: String,
    pub data_value: Option<String>,
    pub data_period: Option<String>,
    pub data_source: Option<String>,
    pub answer_confidence: AnswerConfidence,
    pub confidence_source: ConfidenceSource,
    pub assumptions: Vec<String>,
    pub limitations: Vec<String>,
    pub metric_keys_used: Vec<String>,
    pub prompt_for_missing: Option<String>,
    pub needs_review: bool,
    pub is_estimate: bool,
    pub has_data_gaps: bool,
}

/// Externally supplied matching rule, evaluated ahead of the keyword table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRule {
    pub pattern: String,
    pub pattern_type: PatternType,
    #[serde(default)]
    pub metric_keys: Vec<String>,
    pub category: Option<String>,
    pub prompt_if_missing: Option<String>,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Regex,
    Substring,
}

use std::collections::BTreeSet;

use crate::engine::emission;
use crate::model::{
    CompanySnapshot, DataConfidence, DataContext, DataValue, Domain, MatchResult,
    RetrievedDataPoint,
};

/// Presence rule for snapshot fields: empty string, zero and null all count
/// as absent. A legitimately reported zero (e.g. zero incidents) is
/// indistinguishable from "not reported" under this rule; tests pin the
/// behavior down explicitly.
fn present_number(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value != 0.0)
}

fn present_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    Company,
    Operational,
    Calculated,
}

struct ContextBuilder<'a> {
    snapshot: &'a CompanySnapshot,
    context: DataContext,
    seen: BTreeSet<(Bucket, Domain, String)>,
}

impl<'a> ContextBuilder<'a> {
    fn new(snapshot: &'a CompanySnapshot) -> Self {
        Self {
            snapshot,
            context: DataContext {
                reporting_period: present_text(snapshot.reporting_period.as_deref())
                    .map(str::to_string),
                sites_included: snapshot.sites.clone(),
                ..DataContext::default()
            },
            seen: BTreeSet::new(),
        }
    }

    fn push(&mut self, bucket: Bucket, point: RetrievedDataPoint) -> bool {
        let key = (bucket, point.domain, point.field.clone());
        if !self.seen.insert(key) {
            return false;
        }
        match bucket {
            Bucket::Company => self.context.company.push(point),
            Bucket::Operational => self.context.operational.push(point),
            Bucket::Calculated => self.context.calculated.push(point),
        }
        true
    }

    fn push_reported_number(
        &mut self,
        bucket: Bucket,
        domain: Domain,
        field: &str,
        label: &str,
        value: Option<f64>,
        unit: Option<&str>,
    ) -> bool {
        let Some(value) = present_number(value) else {
            return false;
        };
        self.push(
            bucket,
            RetrievedDataPoint {
                domain,
                field: field.to_string(),
                label: label.to_string(),
                value: DataValue::Number(value),
                unit: unit.map(str::to_string),
                confidence: DataConfidence::High,
                is_estimate: false,
                period: self.context.reporting_period.clone(),
                source: Some("reported".to_string()),
            },
        )
    }

    fn push_reported_text(
        &mut self,
        bucket: Bucket,
        domain: Domain,
        field: &str,
        label: &str,
        value: Option<&str>,
    ) -> bool {
        let Some(value) = present_text(value) else {
            return false;
        };
        let owned = value.to_string();
        self.push(
            bucket,
            RetrievedDataPoint {
                domain,
                field: field.to_string(),
                label: label.to_string(),
                value: DataValue::Text(owned),
                unit: None,
                confidence: DataConfidence::High,
                is_estimate: false,
                period: self.context.reporting_period.clone(),
                source: Some("reported".to_string()),
            },
        )
    }

    fn fill_company_bucket(&mut self) {
        let snapshot = self.snapshot;
        let legal_name = snapshot.legal_name.clone();
        let industry = snapshot.industry.clone();
        let revenue_band = snapshot.revenue_band.clone();
        let reporting_period = snapshot.reporting_period.clone();
        let headcount = snapshot.headcount;
        let site_count = snapshot.sites.len();

        self.push_reported_text(
            Bucket::Company,
            Domain::General,
            "legal_name",
            "Legal entity name",
            legal_name.as_deref(),
        );
        self.push_reported_text(
            Bucket::Company,
            Domain::General,
            "industry",
            "Industry",
            industry.as_deref(),
        );
        self.push_reported_number(
            Bucket::Company,
            Domain::General,
            "headcount",
            "Total headcount",
            headcount,
            Some("employees"),
        );
        if site_count > 0 {
            self.push_reported_number(
                Bucket::Company,
                Domain::General,
                "sites",
                "Number of sites",
                Some(site_count as f64),
                Some("sites"),
            );
        }
        self.push_reported_text(
            Bucket::Company,
            Domain::General,
            "revenue_band",
            "Revenue band",
            revenue_band.as_deref(),
        );
        self.push_reported_text(
            Bucket::Company,
            Domain::General,
            "reporting_period",
            "Reporting period",
            reporting_period.as_deref(),
        );
    }

    fn fill_domain(&mut self, domain: Domain) {
        let snapshot = self.snapshot;
        let mut found = false;

        match domain {
            Domain::EnergyElectricity => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "electricity_kwh",
                    "Total electricity consumption",
                    snapshot.electricity_kwh,
                    Some("kWh"),
                );
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "renewable_percent",
                    "Renewable share of electricity",
                    snapshot.renewable_percent,
                    Some("%"),
                );
                if !found {
                    self.gap("No electricity consumption data");
                }
            }
            Domain::EnergyFuels => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "natural_gas_m3",
                    "Natural gas consumption",
                    snapshot.natural_gas_m3,
                    Some("m3"),
                );
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "diesel_litres",
                    "Diesel consumption",
                    snapshot.diesel_litres,
                    Some("litres"),
                );
                if !found {
                    self.gap("No fuel consumption data");
                }
            }
            Domain::Emissions => {
                if !self.fill_emissions() {
                    self.gap("No emissions data and no activity data to estimate from");
                }
            }
            Domain::Water => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "water_m3",
                    "Total water consumption",
                    snapshot.water_m3,
                    Some("m3"),
                );
                if !found {
                    self.gap("No water consumption data");
                }
            }
            Domain::Waste => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "total_waste_kg",
                    "Total waste generated",
                    snapshot.total_waste_kg,
                    Some("kg"),
                );
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "recycled_waste_kg",
                    "Recycled waste",
                    snapshot.recycled_waste_kg,
                    Some("kg"),
                );
                if !found {
                    self.gap("No waste data");
                }
            }
            Domain::Workforce => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "headcount",
                    "Total headcount",
                    snapshot.headcount,
                    Some("employees"),
                );
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "female_headcount_percent",
                    "Female share of workforce",
                    snapshot.female_headcount_percent,
                    Some("%"),
                );
                if !found {
                    self.gap("No workforce data");
                }
            }
            Domain::HealthSafety => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "lost_time_incidents",
                    "Lost-time incidents",
                    snapshot.lost_time_incidents,
                    Some("incidents"),
                );
                if !found {
                    self.gap("No health and safety incident data");
                }
            }
            Domain::Training => {
                found |= self.push_reported_number(
                    Bucket::Operational,
                    domain,
                    "training_hours",
                    "Total training hours",
                    snapshot.training_hours,
                    Some("hours"),
                );
                if !found {
                    self.gap("No training data");
                }
            }
            Domain::Governance => {
                // The snapshot carries no governance metrics; maturity and
                // practice narratives cover this domain.
                self.gap("No governance data points available");
            }
            Domain::General => {}
        }
    }

    /// Emissions prefer explicit user overrides at high confidence;
    /// otherwise figures come from the factor calculator at medium
    /// confidence with an auto-calculated label.
    fn fill_emissions(&mut self) -> bool {
        let snapshot = self.snapshot;
        let country = snapshot.country.clone();
        let mut found = false;

        if let Some(scope1) = present_number(snapshot.scope1_override_tco2e) {
            found |= self.push_override("scope1_tco2e", "Scope 1 emissions", scope1);
        } else if let Some(scope1) =
            emission::scope1(snapshot.natural_gas_m3, snapshot.diesel_litres)
        {
            found |= self.push_calculated(
                "scope1_tco2e",
                "Scope 1 emissions (auto-calculated)",
                scope1,
                "fixed combustion factors",
            );
        }

        if let Some(scope2) = present_number(snapshot.scope2_override_tco2e) {
            found |= self.push_override("scope2_tco2e", "Scope 2 emissions", scope2);
        } else {
            let factor = emission::electricity_factor(country.as_deref());
            if let Some(location) =
                emission::scope2_location(snapshot.electricity_kwh, country.as_deref())
            {
                found |= self.push_calculated(
                    "scope2_location_tco2e",
                    "Scope 2 emissions, location-based (auto-calculated)",
                    location,
                    &factor.source,
                );
            }
            if let Some(market) = emission::scope2_market(
                snapshot.electricity_kwh,
                snapshot.renewable_percent,
                country.as_deref(),
            ) {
                found |= self.push_calculated(
                    "scope2_market_tco2e",
                    "Scope 2 emissions, market-based (auto-calculated)",
                    market,
                    &factor.source,
                );
            }
        }

        found
    }

    fn push_override(&mut self, field: &str, label: &str, value: f64) -> bool {
        self.push(
            Bucket::Calculated,
            RetrievedDataPoint {
                domain: Domain::Emissions,
                field: field.to_string(),
                label: label.to_string(),
                value: DataValue::Number(value),
                unit: Some("tCO2e".to_string()),
                confidence: DataConfidence::High,
                is_estimate: false,
                period: self.context.reporting_period.clone(),
                source: Some("user override".to_string()),
            },
        )
    }

    fn push_calculated(&mut self, field: &str, label: &str, value: f64, source: &str) -> bool {
        self.push(
            Bucket::Calculated,
            RetrievedDataPoint {
                domain: Domain::Emissions,
                field: field.to_string(),
                label: label.to_string(),
                value: DataValue::Number(value),
                unit: Some("tCO2e".to_string()),
                confidence: DataConfidence::Medium,
                is_estimate: true,
                period: self.context.reporting_period.clone(),
                source: Some(source.to_string()),
            },
        )
    }

    fn gap(&mut self, sentence: &str) {
        let owned = sentence.to_string();
        if !self.context.data_gaps.contains(&owned) {
            self.context.data_gaps.push(owned);
        }
    }
}

/// Builds the per-question DataContext for every matched domain
/// (primary plus secondaries). Domains with nothing retrievable surface a
/// specific gap sentence instead of being silently skipped.
pub fn retrieve_data_context(
    match_result: &MatchResult,
    snapshot: &CompanySnapshot,
) -> DataContext {
    let domains = match_result.matched_domains();
    let mut builder = ContextBuilder::new(snapshot);

    // Static company attributes are relevant whatever matched; the generic
    // fallback stage leans on them when no domain did.
    builder.fill_company_bucket();
    for domain in domains {
        builder.fill_domain(domain);
    }

    builder.context
}

#[cfg(test)]
mod tests {
    use super::{present_number, retrieve_data_context};
    use crate::model::{
        CompanySnapshot, DataConfidence, DataValue, Domain, MatchConfidence, MatchResult,
    };
    use std::collections::{BTreeSet, HashSet};

    fn match_for(primary: Domain, secondary: &[Domain]) -> MatchResult {
        MatchResult {
            question_id: "q-001".to_string(),
            primary_domain: Some(primary),
            secondary_domains: secondary.to_vec(),
            topics: BTreeSet::new(),
            confidence: MatchConfidence::High,
            matched_keywords: Vec::new(),
            suggested_data_points: Vec::new(),
            metric_keys: Vec::new(),
            prompt_if_missing: None,
        }
    }

    fn snapshot() -> CompanySnapshot {
        CompanySnapshot {
            legal_name: Some("Example GmbH".to_string()),
            industry: Some("Manufacturing".to_string()),
            country: Some("Germany".to_string()),
            headcount: Some(120.0),
            sites: vec!["Berlin".to_string(), "Leipzig".to_string()],
            reporting_period: Some("2024".to_string()),
            electricity_kwh: Some(50_000.0),
            renewable_percent: Some(60.0),
            natural_gas_m3: Some(1_000.0),
            ..CompanySnapshot::default()
        }
    }

    #[test]
    fn zero_and_absent_metrics_are_both_treated_as_absent() {
        // Known ambiguity of the presence rule: a reported zero and a
        // missing value retrieve identically.
        assert_eq!(present_number(Some(0.0)), None);
        assert_eq!(present_number(None), None);

        let mut with_zero = snapshot();
        with_zero.total_waste_kg = Some(0.0);
        let mut without = snapshot();
        without.total_waste_kg = None;

        let matched = match_for(Domain::Waste, &[]);
        let zero_context = retrieve_data_context(&matched, &with_zero);
        let absent_context = retrieve_data_context(&matched, &without);
        assert!(zero_context.operational.is_empty());
        assert!(absent_context.operational.is_empty());
        assert!(zero_context
            .data_gaps
            .iter()
            .any(|gap| gap == "No waste data"));
    }

    #[test]
    fn buckets_are_deduplicated_by_domain_and_field() {
        // workforce twice: headcount must appear once in operational.
        let matched = match_for(Domain::Workforce, &[Domain::Workforce]);
        let context = retrieve_data_context(&matched, &snapshot());

        for bucket in [&context.company, &context.operational, &context.calculated] {
            let mut seen = HashSet::new();
            for point in bucket.iter() {
                assert!(
                    seen.insert((point.domain, point.field.clone())),
                    "duplicate point: {:?}/{}",
                    point.domain,
                    point.field
                );
            }
        }
    }

    #[test]
    fn emissions_prefer_user_override_over_calculator() {
        let mut data = snapshot();
        data.scope1_override_tco2e = Some(42.0);

        let matched = match_for(Domain::Emissions, &[]);
        let context = retrieve_data_context(&matched, &data);

        let scope1 = context
            .calculated
            .iter()
            .find(|point| point.field == "scope1_tco2e")
            .expect("scope 1 point");
        assert_eq!(scope1.confidence, DataConfidence::High);
        assert!(!scope1.is_estimate);
        assert_eq!(scope1.value, DataValue::Number(42.0));
        assert_eq!(scope1.source.as_deref(), Some("user override"));
    }

    #[test]
    fn emissions_fall_back_to_auto_calculated_estimates() {
        let matched = match_for(Domain::Emissions, &[]);
        let context = retrieve_data_context(&matched, &snapshot());

        let scope1 = context
            .calculated
            .iter()
            .find(|point| point.field == "scope1_tco2e")
            .expect("scope 1 point");
        assert_eq!(scope1.confidence, DataConfidence::Medium);
        assert!(scope1.is_estimate);
        assert!(scope1.label.contains("(auto-calculated)"));

        // Germany, 50000 kWh: location 19.0, market 7.6.
        let location = context
            .calculated
            .iter()
            .find(|point| point.field == "scope2_location_tco2e")
            .expect("location point");
        assert_eq!(location.value, DataValue::Number(19.0));
        let market = context
            .calculated
            .iter()
            .find(|point| point.field == "scope2_market_tco2e")
            .expect("market point");
        assert_eq!(market.value, DataValue::Number(7.6));
    }

    #[test]
    fn empty_domain_appends_specific_gap_sentence() {
        let matched = match_for(Domain::Water, &[]);
        let context = retrieve_data_context(&matched, &snapshot());
        assert!(context
            .data_gaps
            .iter()
            .any(|gap| gap == "No water consumption data"));
    }

    #[test]
    fn company_bucket_carries_static_attributes() {
        let matched = match_for(Domain::EnergyElectricity, &[]);
        let context = retrieve_data_context(&matched, &snapshot());
        assert!(context
            .company
            .iter()
            .any(|point| point.field == "legal_name"));
        assert_eq!(context.reporting_period.as_deref(), Some("2024"));
        assert_eq!(context.sites_included.len(), 2);
        assert!(context
            .operational
            .iter()
            .any(|point| point.field == "electricity_kwh"));
    }
}

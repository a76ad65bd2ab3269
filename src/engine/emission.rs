use crate::util::round_to_one_decimal;

/// Grid electricity factors in tCO2e per kWh (location-based, latest
/// published national grid averages).
const ELECTRICITY_FACTORS: &[(&str, f64)] = &[
    ("austria", 0.000110),
    ("belgium", 0.000120),
    ("denmark", 0.000135),
    ("finland", 0.000080),
    ("france", 0.000056),
    ("germany", 0.000380),
    ("ireland", 0.000290),
    ("italy", 0.000310),
    ("netherlands", 0.000330),
    ("norway", 0.000011),
    ("poland", 0.000660),
    ("portugal", 0.000170),
    ("spain", 0.000170),
    ("sweden", 0.000009),
    ("switzerland", 0.000012),
    ("united kingdom", 0.000210),
    ("united states", 0.000370),
];

/// Documented fallback when the country is unknown or not in the table.
pub const GLOBAL_AVERAGE_FACTOR: f64 = 0.000436;
pub const GLOBAL_AVERAGE_SOURCE: &str = "global grid average (default)";

/// Fixed combustion factors and the volume-to-energy constant for natural
/// gas (kWh per m3 of gas, tCO2e per kWh / per litre).
const GAS_KWH_PER_M3: f64 = 10.55;
const GAS_TCO2E_PER_KWH: f64 = 0.000184;
const DIESEL_TCO2E_PER_LITRE: f64 = 0.00268;

#[derive(Debug, Clone, PartialEq)]
pub struct ElectricityFactor {
    pub factor: f64,
    pub is_default: bool,
    pub source: String,
}

/// Exact lookup, then case-insensitive, then the global-average default.
pub fn electricity_factor(country: Option<&str>) -> ElectricityFactor {
    if let Some(country) = country {
        let trimmed = country.trim();
        if let Some((name, factor)) = ELECTRICITY_FACTORS
            .iter()
            .find(|(name, _)| *name == trimmed)
        {
            return ElectricityFactor {
                factor: *factor,
                is_default: false,
                source: format!("national grid factor ({name})"),
            };
        }

        let lowered = trimmed.to_lowercase();
        if let Some((name, factor)) = ELECTRICITY_FACTORS
            .iter()
            .find(|(name, _)| *name == lowered)
        {
            return ElectricityFactor {
                factor: *factor,
                is_default: false,
                source: format!("national grid factor ({name})"),
            };
        }
    }

    ElectricityFactor {
        factor: GLOBAL_AVERAGE_FACTOR,
        is_default: true,
        source: GLOBAL_AVERAGE_SOURCE.to_string(),
    }
}

/// Direct combustion emissions from gas and diesel volumes. None iff both
/// inputs are absent; a single present fuel is enough.
pub fn scope1(gas_m3: Option<f64>, diesel_litres: Option<f64>) -> Option<f64> {
    let gas = gas_m3.filter(|value| *value > 0.0);
    let diesel = diesel_litres.filter(|value| *value > 0.0);
    if gas.is_none() && diesel.is_none() {
        return None;
    }

    let mut total = 0.0;
    if let Some(volume) = gas {
        total += volume * GAS_KWH_PER_M3 * GAS_TCO2E_PER_KWH;
    }
    if let Some(volume) = diesel {
        total += volume * DIESEL_TCO2E_PER_LITRE;
    }
    Some(round_to_one_decimal(total))
}

pub fn scope2_location(electricity_kwh: Option<f64>, country: Option<&str>) -> Option<f64> {
    let kwh = electricity_kwh.filter(|value| *value > 0.0)?;
    let factor = electricity_factor(country);
    Some(round_to_one_decimal(kwh * factor.factor))
}

/// Market-based Scope 2. Both inputs must be present; a renewable share of
/// zero is a valid value, not an absence signal. The share is clamped to
/// [0, 100].
pub fn scope2_market(
    electricity_kwh: Option<f64>,
    renewable_percent: Option<f64>,
    country: Option<&str>,
) -> Option<f64> {
    let kwh = electricity_kwh.filter(|value| *value > 0.0)?;
    let percent = renewable_percent?.clamp(0.0, 100.0);
    let factor = electricity_factor(country);
    Some(round_to_one_decimal(kwh * (1.0 - percent / 100.0) * factor.factor))
}

#[cfg(test)]
mod tests {
    use super::{
        electricity_factor, scope1, scope2_location, scope2_market, GLOBAL_AVERAGE_FACTOR,
    };

    #[test]
    fn country_lookup_is_case_insensitive() {
        let exact = electricity_factor(Some("germany"));
        let mixed = electricity_factor(Some("Germany"));
        let upper = electricity_factor(Some("GERMANY"));
        assert_eq!(exact.factor, mixed.factor);
        assert_eq!(exact.factor, upper.factor);
        assert!(!mixed.is_default);
    }

    #[test]
    fn unknown_country_falls_back_to_documented_default() {
        let fallback = electricity_factor(Some("Atlantis"));
        assert!(fallback.is_default);
        assert_eq!(fallback.factor, GLOBAL_AVERAGE_FACTOR);
        assert!(fallback.source.contains("default"));

        let missing = electricity_factor(None);
        assert!(missing.is_default);
    }

    #[test]
    fn scope1_is_none_iff_both_fuels_absent() {
        assert_eq!(scope1(None, None), None);
        assert_eq!(scope1(Some(0.0), Some(0.0)), None);
        assert!(scope1(Some(1000.0), None).is_some());
        assert!(scope1(None, Some(500.0)).is_some());
    }

    #[test]
    fn scope1_sums_gas_and_diesel_rounded() {
        // 1000 m3 gas = 1000 * 10.55 * 0.000184 = 1.9412 -> with diesel
        // 500 l = 1.34 -> 3.2812 -> 3.3
        assert_eq!(scope1(Some(1000.0), Some(500.0)), Some(3.3));
    }

    #[test]
    fn scope2_location_requires_electricity() {
        assert_eq!(scope2_location(None, Some("Germany")), None);
        assert_eq!(scope2_location(Some(0.0), Some("Germany")), None);
        // 100000 kWh * 0.00038 = 38.0
        assert_eq!(scope2_location(Some(100_000.0), Some("Germany")), Some(38.0));
    }

    #[test]
    fn scope2_market_accepts_zero_renewable_share() {
        // Zero percent is a legitimate market-based input.
        let result = scope2_market(Some(50_000.0), Some(0.0), None);
        assert_eq!(result, Some(21.8));
        assert_eq!(result, scope2_location(Some(50_000.0), None));
    }

    #[test]
    fn scope2_market_requires_both_inputs() {
        assert_eq!(scope2_market(Some(50_000.0), None, None), None);
        assert_eq!(scope2_market(None, Some(60.0), None), None);
    }

    #[test]
    fn scope2_market_clamps_percent_and_discounts() {
        // 50000 * 0.4 * 0.000436 = 8.72 -> 8.7
        assert_eq!(scope2_market(Some(50_000.0), Some(60.0), None), Some(8.7));
        assert_eq!(scope2_market(Some(50_000.0), Some(150.0), None), Some(0.0));
        assert_eq!(
            scope2_market(Some(50_000.0), Some(-10.0), None),
            scope2_market(Some(50_000.0), Some(0.0), None)
        );
    }
}

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn next_calendar_year() -> i32 {
    Utc::now().year() + 1
}

pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Lowercases, strips punctuation except hyphens and collapses whitespace.
/// The matcher and the structured-rule pass both search this form.
pub fn normalize_for_matching(input: &str) -> String {
    let stripped = input
        .chars()
        .map(|character| {
            if character.is_alphanumeric() || character == '-' {
                character.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>();
    normalize_whitespace(&stripped)
}

/// Renders a number with thousands separators; one decimal kept when the
/// value is not integral ("50,000", "8.7").
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    let negative = rounded < 0.0;
    let magnitude = rounded.abs();
    let whole = magnitude.trunc() as u64;
    let fraction = ((magnitude - magnitude.trunc()) * 10.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, character) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(character);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction > 0 {
        out.push('.');
        out.push_str(&fraction.to_string());
    }
    out
}

pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{format_number, normalize_for_matching, round_to_one_decimal, sha256_bytes};

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(50000.0), "50,000");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(999.0), "999");
    }

    #[test]
    fn format_number_keeps_single_decimal_when_fractional() {
        assert_eq!(format_number(8.72), "8.7");
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-12.34), "-12.3");
    }

    #[test]
    fn normalize_for_matching_keeps_hyphens_and_lowercases() {
        assert_eq!(
            normalize_for_matching("Do you track Scope 1/2 (GHG) emissions?"),
            "do you track scope 1 2 ghg emissions"
        );
        assert_eq!(normalize_for_matching("  Health-and-Safety  "), "health-and-safety");
    }

    #[test]
    fn round_to_one_decimal_is_stable() {
        assert_eq!(round_to_one_decimal(8.749), 8.7);
        assert_eq!(round_to_one_decimal(8.75), 8.8);
    }

    #[test]
    fn sha256_bytes_matches_known_digest() {
        assert_eq!(
            sha256_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

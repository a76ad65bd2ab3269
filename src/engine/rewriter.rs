use std::sync::OnceLock;

use regex::Regex;

use crate::util::normalize_whitespace;

/// Absolute-claim softenings. Replacement text never contains a mapped
/// input, so reapplying the pass is a no-op.
const SOFTENINGS: &[(&str, &str)] = &[
    ("we guarantee", "we aim to ensure"),
    ("guarantees that", "is intended to ensure that"),
    ("will always", "is expected to"),
    ("will never", "is designed to avoid"),
    ("100% compliant", "compliant to the best of our knowledge"),
    ("fully eliminates", "substantially reduces"),
    ("eliminates all", "substantially reduces"),
    ("zero risk", "low residual risk"),
];

fn softening_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SOFTENINGS
            .iter()
            .filter_map(|(needle, replacement)| {
                // Escaped literals always compile.
                Regex::new(&format!("(?i){}", regex::escape(needle)))
                    .ok()
                    .map(|regex| (regex, *replacement))
            })
            .collect()
    })
}

/// Idempotent text-safety pass applied to every generated answer except the
/// "Unknown — input required." state. Preserves factual content and does
/// not materially lengthen the text.
pub fn rewrite(answer: &str) -> String {
    let mut text = normalize_whitespace(answer);

    for (regex, replacement) in softening_patterns() {
        text = soften(&text, regex, replacement);
    }

    while text.ends_with("..") {
        text.pop();
    }

    let ends_with_terminal = text
        .chars()
        .last()
        .map(|character| matches!(character, '.' | '!' | '?' | ':'))
        .unwrap_or(true);
    if !ends_with_terminal {
        text.push('.');
    }

    text
}

/// Case-insensitive replacement that keeps a leading capital when the
/// matched text started with one.
fn soften(text: &str, regex: &Regex, replacement: &str) -> String {
    regex
        .replace_all(text, |captures: &regex::Captures| {
            let matched_upper = captures[0]
                .chars()
                .next()
                .map(char::is_uppercase)
                .unwrap_or(false);
            if !matched_upper {
                return replacement.to_string();
            }
            let mut characters = replacement.chars();
            match characters.next() {
                Some(first) => {
                    let mut out = String::with_capacity(replacement.len());
                    out.extend(first.to_uppercase());
                    out.push_str(characters.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .into_owned()
}

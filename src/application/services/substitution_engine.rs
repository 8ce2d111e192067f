use strsim::levenshtein;

use crate::domain::SubstitutionRule;

/// Normalized edit-distance ratio between two strings, 0-100. Both inputs
/// are compared case-folded; 100 means equal after folding.
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100;
    }
    let distance = levenshtein(&a, &b);
    let ratio = 100.0 * (1.0 - distance as f64 / max_len as f64);
    ratio.round().clamp(0.0, 100.0) as u8
}

/// Candidate replacements for one transcript token.
///
/// The first rule in caller order whose key scores at least `threshold`
/// against the token wins; ties among qualifying rules are broken by that
/// same order. This is deliberately first-match, not best-score: variant
/// sets stay reproducible when a later rule's key happens to score higher.
///
/// Returns the matched rule's full candidate list, or `[token]` when no
/// rule qualifies or the matched rule has no candidates. Never empty. Pure;
/// safe to call concurrently for different tokens.
pub fn candidates_for(token: &str, rules: &[SubstitutionRule], threshold: u8) -> Vec<String> {
    let matched = rules
        .iter()
        .find(|rule| similarity_ratio(token, &rule.key) >= threshold);

    match matched {
        Some(rule) if !rule.candidates.is_empty() => rule.candidates.clone(),
        _ => vec![token.to_string()],
    }
}

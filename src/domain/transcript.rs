use std::sync::OnceLock;

use regex::Regex;

fn punctuation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\s]").expect("static pattern"))
}

/// Strips punctuation and special characters, leaving word characters and
/// whitespace. Case is preserved; callers fold where they need to.
pub fn clean_text(text: &str) -> String {
    punctuation_pattern().replace_all(text, "").into_owned()
}

/// Cleans and splits into whitespace-delimited tokens, preserving order.
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Tokens of `variant` whose lowercased form does not appear in the cleaned
/// original. Order-preserving, duplicates removed. These name the output
/// artifact for the variant.
pub fn distinguishing_words(original: &str, variant: &str) -> Vec<String> {
    let original_tokens: std::collections::HashSet<String> = tokenize(original)
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect();

    let mut seen = std::collections::HashSet::new();
    tokenize(variant)
        .into_iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !original_tokens.contains(t) && seen.insert(t.clone()))
        .collect()
}

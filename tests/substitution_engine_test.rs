use revocal::application::services::{candidates_for, similarity_ratio};
use revocal::domain::SubstitutionRule;

fn rule(key: &str, candidates: &[&str]) -> SubstitutionRule {
    SubstitutionRule::new(key, candidates.iter().map(|c| c.to_string()).collect())
}

#[test]
fn given_equal_strings_when_scoring_then_ratio_is_100() {
    assert_eq!(similarity_ratio("nick", "nick"), 100);
    assert_eq!(similarity_ratio("Nick", "nick"), 100);
}

#[test]
fn given_disjoint_strings_when_scoring_then_ratio_is_low() {
    assert!(similarity_ratio("nick", "xylophone") < 30);
}

#[test]
fn given_close_strings_when_scoring_then_ratio_reflects_edit_distance() {
    // One substitution over four characters.
    assert_eq!(similarity_ratio("nick", "nick"), 100);
    assert_eq!(similarity_ratio("nick", "rick"), 75);
}

#[test]
fn given_matching_rule_when_resolving_then_full_candidate_list_is_returned() {
    let rules = vec![rule("nick", &["alex", "ben"])];
    assert_eq!(candidates_for("nick", &rules, 90), vec!["alex", "ben"]);
}

#[test]
fn given_no_rule_above_threshold_when_resolving_then_token_is_identity() {
    let rules = vec![rule("nick", &["alex"])];
    assert_eq!(candidates_for("brother", &rules, 90), vec!["brother"]);
}

#[test]
fn given_fuzzy_match_when_resolving_then_threshold_governs_acceptance() {
    let rules = vec![rule("nick", &["alex"])];
    // "nick" vs "nic" scores 75.
    assert_eq!(candidates_for("nic", &rules, 75), vec!["alex"]);
    assert_eq!(candidates_for("nic", &rules, 76), vec!["nic"]);
}

#[test]
fn given_two_qualifying_rules_when_resolving_then_first_in_caller_order_wins() {
    let rules = vec![rule("nick", &["alex"]), rule("nick", &["ben"])];
    assert_eq!(candidates_for("nick", &rules, 80), vec!["alex"]);

    let reversed = vec![rule("nick", &["ben"]), rule("nick", &["alex"])];
    assert_eq!(candidates_for("nick", &reversed, 80), vec!["ben"]);
}

#[test]
fn given_better_scoring_later_rule_when_resolving_then_first_match_still_wins() {
    // "nick" scores 75 against "rick" and 100 against "nick"; the earlier
    // qualifying rule wins regardless.
    let rules = vec![rule("rick", &["ron"]), rule("nick", &["alex"])];
    assert_eq!(candidates_for("nick", &rules, 70), vec!["ron"]);
}

#[test]
fn given_matching_rule_with_empty_candidates_when_resolving_then_token_is_identity() {
    let rules = vec![rule("nick", &[])];
    assert_eq!(candidates_for("nick", &rules, 90), vec!["nick"]);
}

#[test]
fn given_any_input_when_resolving_then_result_is_never_empty() {
    let rules = vec![rule("", &[]), rule("x", &["y"])];
    for token in ["", "x", "nick", "a-b"] {
        assert!(!candidates_for(token, &rules, 0).is_empty());
    }
}

#[test]
fn given_case_difference_when_resolving_then_match_is_case_folded() {
    let rules = vec![rule("Nick", &["alex"])];
    assert_eq!(candidates_for("NICK", &rules, 100), vec!["alex"]);
}

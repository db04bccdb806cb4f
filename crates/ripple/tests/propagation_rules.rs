//! Integration tests for propagation rules and impact groups.
//!
//! All scenarios run on the ABCD topology: A, B and D each impact C.

use ripple::domain::Edge;
use ripple::rules::PropagationRule;
use ripple::state::State;
use rstest::rstest;
use serde_json::json;

mod common;
use common::{abcd, abcd_with_rule, id, impact, state_of};

// ============================================================================
// One Rule on Every Edge
// ============================================================================

#[rstest]
#[case::most_severe(PropagationRule::MostSevere, State::Failed)]
#[case::least_severe(PropagationRule::LeastSevere, State::Working)]
#[case::degradation(PropagationRule::Degradation, State::Degraded)]
#[case::risk_propagation(PropagationRule::RiskPropagation, State::AtRisk)]
#[case::protection_one_of_three_down(PropagationRule::Protection, State::Working)]
fn single_seed_under_rule(#[case] rule: PropagationRule, #[case] expected: State) {
    let graph = abcd_with_rule(rule);
    let a = id(&graph, "A").as_i64();

    let results = impact(&graph, json!(a), None, None).unwrap();

    assert_eq!(state_of(&graph, &results, "C"), Some(expected));
    assert_eq!(state_of(&graph, &results, "A"), Some(State::Failed));
    assert_eq!(results.len(), 2);
}

#[test]
fn edges_without_rule_use_most_severe() {
    let graph = abcd(|_| Edge::new("IMPACTS"));
    let results = impact(&graph, json!(id(&graph, "A").as_i64()), None, None).unwrap();
    assert_eq!(state_of(&graph, &results, "C"), Some(State::Failed));
}

#[test]
fn unknown_rule_name_falls_back_to_most_severe() {
    let graph = abcd(|_| {
        let mut edge = Edge::new("IMPACTS");
        edge.properties
            .insert("impact_propagation".into(), json!("SOMETIMES"));
        edge
    });
    let results = impact(&graph, json!(id(&graph, "A").as_i64()), None, None).unwrap();
    assert_eq!(state_of(&graph, &results, "C"), Some(State::Failed));
}

#[test]
fn rule_alias_property_is_honoured() {
    let graph = abcd(|_| {
        let mut edge = Edge::new("IMPACTS");
        edge.properties
            .insert("propagation_rule".into(), json!("DEGRADATION"));
        edge
    });
    let results = impact(&graph, json!(id(&graph, "A").as_i64()), None, None).unwrap();
    assert_eq!(state_of(&graph, &results, "C"), Some(State::Degraded));
}

#[test]
fn protection_with_one_survivor_is_at_risk() {
    let graph = abcd_with_rule(PropagationRule::Protection);
    let seeds = json!([{"id": id(&graph, "A").as_i64()}, {"id": id(&graph, "B").as_i64()}]);

    let results = impact(&graph, seeds, None, None).unwrap();

    assert_eq!(state_of(&graph, &results, "C"), Some(State::AtRisk));
}

#[test]
fn protection_with_no_survivor_fails() {
    let graph = abcd_with_rule(PropagationRule::Protection);
    let seeds = json!([0, 1, 3]);

    let results = impact(&graph, seeds, None, None).unwrap();

    assert_eq!(state_of(&graph, &results, "C"), Some(State::Failed));
}

// ============================================================================
// Impact Groups
// ============================================================================

#[test]
fn groups_aggregate_separately_then_take_worst() {
    // group 1 LEAST_SEVERE: A, B / group 2 RISK_PROPAGATION: D
    let graph = abcd(|source| match source {
        "D" => Edge::new("IMPACTS")
            .with_rule(PropagationRule::RiskPropagation)
            .with_group(2),
        _ => Edge::new("IMPACTS")
            .with_rule(PropagationRule::LeastSevere)
            .with_group(1),
    });
    let seeds = json!([id(&graph, "A").as_i64(), id(&graph, "D").as_i64()]);

    let results = impact(&graph, seeds, None, None).unwrap();

    assert_eq!(state_of(&graph, &results, "C"), Some(State::AtRisk));
}

#[test]
fn failed_group_dominates_protected_group() {
    // group 1 PROTECTION: A, B / group 2 MOST_SEVERE: D
    let graph = abcd(|source| match source {
        "D" => Edge::new("IMPACTS")
            .with_rule(PropagationRule::MostSevere)
            .with_group(2),
        _ => Edge::new("IMPACTS")
            .with_rule(PropagationRule::Protection)
            .with_group(1),
    });
    let seeds = json!([id(&graph, "A").as_i64(), id(&graph, "D").as_i64()]);

    let results = impact(&graph, seeds, None, None).unwrap();

    assert_eq!(state_of(&graph, &results, "C"), Some(State::Failed));
}

#[test]
fn same_rule_in_different_groups_does_not_mix() {
    // Protection pairs {A, B} and {D} alone: D's group has no survivor
    let graph = abcd(|source| match source {
        "D" => Edge::new("IMPACTS")
            .with_rule(PropagationRule::Protection)
            .with_group("solo"),
        _ => Edge::new("IMPACTS")
            .with_rule(PropagationRule::Protection)
            .with_group("pair"),
    });

    let results = impact(&graph, json!(id(&graph, "D").as_i64()), None, None).unwrap();

    assert_eq!(state_of(&graph, &results, "C"), Some(State::Failed));
}

#[test]
fn numeric_and_text_group_ids_match() {
    let graph = abcd(|source| {
        let edge = Edge::new("IMPACTS").with_rule(PropagationRule::Protection);
        match source {
            "A" => edge.with_group(7),
            "B" => edge.with_group("7"),
            _ => edge.with_group("other"),
        }
    });

    let results = impact(&graph, json!(id(&graph, "A").as_i64()), None, None).unwrap();

    // One group {A, B} with B still working. Split groups would leave A
    // alone and fail C.
    assert_eq!(state_of(&graph, &results, "C"), Some(State::AtRisk));
}

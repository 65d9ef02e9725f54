//! Integration tests for decision, GOTO and TERMINATE rules.

#[allow(dead_code)]
mod helpers;

use flow_validator::document::ReferenceValue;
use flow_validator::error::Rule;
use helpers::*;

// =============================================================================
// Decisions
// =============================================================================

#[test]
fn decision_with_two_outcomes_passes() {
    let flow = base_flow(vec![with_assignee(
        decision(
            "d1",
            vec![outcome("o1", vec![task("t1")]), outcome("o2", vec![])],
        ),
        ReferenceValue::One(user_ref("u1")),
    )]);
    let report = validate_strict(&flow);
    assert!(report.valid, "{:?}", report);
}

#[test]
fn decision_with_one_outcome() {
    let flow = base_flow(vec![decision("d1", vec![outcome("o1", vec![])])]);
    let report = validate_strict(&flow);
    assert_eq!(
        issue_paths(&report, Rule::MinOutcomes),
        vec!["steps[0].outcomes".to_string()]
    );
}

#[test]
fn decision_with_too_many_outcomes() {
    let outcomes = (0..6).map(|i| outcome(&format!("o{i}"), vec![])).collect();
    let flow = base_flow(vec![decision("d1", outcomes)]);
    let report = validate_strict(&flow);
    assert_eq!(count_rule(&report, Rule::MaxDecisionOutcomes), 1);
    assert_no_issue(&report, Rule::MinOutcomes);
}

#[test]
fn duplicate_outcome_ids_scoped_per_decision() {
    let flow = base_flow(vec![
        decision("d1", vec![outcome("same", vec![]), outcome("same", vec![])]),
        decision("d2", vec![outcome("same", vec![]), outcome("other", vec![])]),
    ]);
    let report = validate_strict(&flow);
    // d2 reuses "same" without penalty; only d1's repeat is flagged.
    assert_eq!(
        issue_paths(&report, Rule::UniqueId),
        vec!["steps[0].outcomes[same].outcomeId".to_string()]
    );
}

#[test]
fn decision_assignee_must_not_be_a_collection() {
    let flow = base_flow(vec![with_assignee(
        decision(
            "d1",
            vec![outcome("o1", vec![]), outcome("o1", vec![])],
        ),
        ReferenceValue::Many(vec![user_ref("u1")]),
    )]);
    let report = validate_strict(&flow);
    // Independent of the outcome checks.
    assert_eq!(
        issue_paths(&report, Rule::DecisionSingleAssignee),
        vec!["steps[0].assignee".to_string()]
    );
    assert_eq!(count_rule(&report, Rule::UniqueId), 1);
}

// =============================================================================
// GOTO
// =============================================================================

fn goto_in_outcome(target: &str) -> flow_validator::document::Flow {
    base_flow(vec![
        destination("d1"),
        decision(
            "dec",
            vec![
                outcome("o1", vec![goto("g1", target)]),
                outcome("o2", vec![task("t1")]),
            ],
        ),
    ])
}

#[test]
fn goto_in_outcome_targeting_main_path_destination() {
    let report = validate_strict(&goto_in_outcome("d1"));
    assert!(report.valid, "{:?}", report);
}

#[test]
fn goto_with_undeclared_target() {
    let report = validate_strict(&goto_in_outcome("d2"));
    assert_eq!(
        issue_paths(&report, Rule::GotoTargetMainPath),
        vec!["steps[1].outcomes[o1].steps[0].targetGotoDestinationId".to_string()]
    );
    assert_no_issue(&report, Rule::GotoPlacement);
}

#[test]
fn goto_on_main_path_reports_placement_only() {
    let flow = base_flow(vec![destination("d1"), goto("g1", "nowhere")]);
    let report = validate_strict(&flow);
    assert_eq!(
        issue_paths(&report, Rule::GotoPlacement),
        vec!["steps[1]".to_string()]
    );
    // Target resolution is skipped once placement failed.
    assert_no_issue(&report, Rule::GotoTargetMainPath);
}

#[test]
fn goto_in_branch_path_is_allowed() {
    let flow = base_flow(vec![
        destination("d1"),
        branch(
            "b1",
            vec![
                path("p1", vec![goto("g1", "d1")]),
                path("p2", vec![task("t1")]),
            ],
        ),
    ]);
    let report = validate_strict(&flow);
    assert!(report.valid, "{:?}", report);
}

#[test]
fn nested_destinations_are_not_legal_targets() {
    let flow = base_flow(vec![decision(
        "dec",
        vec![
            outcome("o1", vec![destination("inner"), goto("g1", "inner")]),
            outcome("o2", vec![task("t1")]),
        ],
    )]);
    let report = validate_strict(&flow);
    assert_eq!(count_rule(&report, Rule::GotoTargetMainPath), 1);
}

// =============================================================================
// TERMINATE
// =============================================================================

#[test]
fn terminate_in_outcome_with_valid_status() {
    let flow = base_flow(vec![decision(
        "dec",
        vec![
            outcome("o1", vec![terminate("end", "CANCELLED")]),
            outcome("o2", vec![task("t1")]),
        ],
    )]);
    let report = validate_strict(&flow);
    assert!(report.valid, "{:?}", report);
}

#[test]
fn terminate_on_main_path() {
    let flow = base_flow(vec![task("t1"), terminate("end", "COMPLETED")]);
    let report = validate_strict(&flow);
    assert_eq!(
        issue_paths(&report, Rule::TerminatePlacement),
        vec!["steps[1]".to_string()]
    );
    assert_no_issue(&report, Rule::TerminateStatus);
}

#[test]
fn terminate_with_invalid_status() {
    let flow = base_flow(vec![branch(
        "b1",
        vec![
            path("p1", vec![terminate("end", "DONE")]),
            path("p2", vec![task("t1")]),
        ],
    )]);
    let report = validate_strict(&flow);
    assert_eq!(
        issue_paths(&report, Rule::TerminateStatus),
        vec!["steps[0].paths[p1].steps[0].status".to_string()]
    );
    assert_no_issue(&report, Rule::TerminatePlacement);
}

#[test]
fn misplaced_terminate_with_bad_status_reports_both() {
    let flow = base_flow(vec![terminate("end", "DONE")]);
    let report = validate_strict(&flow);
    assert_eq!(count_rule(&report, Rule::TerminatePlacement), 1);
    assert_eq!(count_rule(&report, Rule::TerminateStatus), 1);
}

use flow_validator::document::*;
use flow_validator::error::{Issue, Rule};
use flow_validator::validate::{self, ValidateOptions, ValidationMode, ValidationReport};

// =============================================================================
// Flow builders
// =============================================================================

/// Minimal valid flow: id, name, the given main path, no milestones.
pub fn base_flow(steps: Vec<Step>) -> Flow {
    Flow {
        flow_id: Some("flow-1".into()),
        name: Some("Test Flow".into()),
        steps: Some(steps),
        milestones: vec![],
        assignee_placeholders: vec![],
        settings: None,
    }
}

pub fn flow_with_milestones(steps: Vec<Step>, milestones: Vec<&str>) -> Flow {
    let mut flow = base_flow(steps);
    flow.milestones = milestones.into_iter().map(milestone).collect();
    flow
}

pub fn milestone(id: &str) -> Milestone {
    Milestone {
        milestone_id: Some(id.into()),
        name: Some(id.into()),
    }
}

pub fn placeholder(id: &str) -> AssigneePlaceholder {
    AssigneePlaceholder {
        placeholder_id: Some(id.into()),
        name: Some(id.into()),
    }
}

// =============================================================================
// Step builders
// =============================================================================

fn base<C>(id: &str, config: C) -> StepBase<C> {
    StepBase {
        step_id: Some(id.into()),
        name: Some(id.into()),
        milestone_id: None,
        assignee: None,
        assignees: None,
        reviewer: None,
        signers: None,
        config,
    }
}

pub fn task(id: &str) -> Step {
    step_of_type(id, "TASK")
}

pub fn step_of_type(id: &str, step_type: &str) -> Step {
    Step::Other(base(
        id,
        OtherConfig {
            step_type: step_type.into(),
        },
    ))
}

pub fn branch(id: &str, paths: Vec<BranchPath>) -> Step {
    Step::Branch(base(id, BranchConfig { paths }))
}

pub fn path(id: &str, steps: Vec<Step>) -> BranchPath {
    BranchPath {
        path_id: Some(id.into()),
        condition: None,
        conditions: None,
        condition_logic: None,
        steps,
    }
}

pub fn decision(id: &str, outcomes: Vec<Outcome>) -> Step {
    Step::Decision(base(id, DecisionConfig { outcomes }))
}

pub fn outcome(id: &str, steps: Vec<Step>) -> Outcome {
    Outcome {
        outcome_id: Some(id.into()),
        name: Some(id.into()),
        steps,
    }
}

pub fn goto(id: &str, target: &str) -> Step {
    Step::Goto(base(
        id,
        GotoConfig {
            target_goto_destination_id: Some(target.into()),
        },
    ))
}

pub fn destination(id: &str) -> Step {
    Step::GotoDestination(base(id, GotoDestinationConfig {}))
}

pub fn terminate(id: &str, status: &str) -> Step {
    Step::Terminate(base(
        id,
        TerminateConfig {
            status: Some(status.into()),
        },
    ))
}

pub fn condition(condition_type: &str) -> Condition {
    Condition {
        condition_type: Some(condition_type.into()),
        field: Some("status".into()),
        value: Some(serde_json::json!("open")),
    }
}

// =============================================================================
// Step mutators
// =============================================================================

pub fn with_milestone(mut step: Step, id: &str) -> Step {
    let milestone = Some(id.to_string());
    match &mut step {
        Step::Branch(s) => s.milestone_id = milestone,
        Step::Decision(s) => s.milestone_id = milestone,
        Step::Goto(s) => s.milestone_id = milestone,
        Step::GotoDestination(s) => s.milestone_id = milestone,
        Step::Terminate(s) => s.milestone_id = milestone,
        Step::Other(s) => s.milestone_id = milestone,
    }
    step
}

pub fn without_step_id(mut step: Step) -> Step {
    match &mut step {
        Step::Branch(s) => s.step_id = None,
        Step::Decision(s) => s.step_id = None,
        Step::Goto(s) => s.step_id = None,
        Step::GotoDestination(s) => s.step_id = None,
        Step::Terminate(s) => s.step_id = None,
        Step::Other(s) => s.step_id = None,
    }
    step
}

pub fn with_assignee(mut step: Step, value: ReferenceValue) -> Step {
    let value = Some(value);
    match &mut step {
        Step::Branch(s) => s.assignee = value,
        Step::Decision(s) => s.assignee = value,
        Step::Goto(s) => s.assignee = value,
        Step::GotoDestination(s) => s.assignee = value,
        Step::Terminate(s) => s.assignee = value,
        Step::Other(s) => s.assignee = value,
    }
    step
}

pub fn with_assignees(mut step: Step, value: ReferenceValue) -> Step {
    let value = Some(value);
    match &mut step {
        Step::Branch(s) => s.assignees = value,
        Step::Decision(s) => s.assignees = value,
        Step::Goto(s) => s.assignees = value,
        Step::GotoDestination(s) => s.assignees = value,
        Step::Terminate(s) => s.assignees = value,
        Step::Other(s) => s.assignees = value,
    }
    step
}

pub fn placeholder_ref(id: &str) -> Reference {
    Reference {
        mode: Some("PLACEHOLDER".into()),
        placeholder_id: Some(id.into()),
        user_id: None,
        email: None,
    }
}

pub fn user_ref(id: &str) -> Reference {
    Reference {
        mode: Some("USER".into()),
        placeholder_id: None,
        user_id: Some(id.into()),
        email: None,
    }
}

// =============================================================================
// Validation + assertion helpers
// =============================================================================

pub fn validate_strict(flow: &Flow) -> ValidationReport {
    validate::validate(flow, &ValidateOptions::default())
}

pub fn validate_lenient(flow: &Flow) -> ValidationReport {
    validate::validate(
        flow,
        &ValidateOptions {
            mode: ValidationMode::Lenient,
        },
    )
}

pub fn all_issues(report: &ValidationReport) -> Vec<&Issue> {
    report.errors.iter().chain(report.warnings.iter()).collect()
}

pub fn count_rule(report: &ValidationReport, rule: Rule) -> usize {
    all_issues(report).iter().filter(|i| i.rule == rule).count()
}

pub fn assert_has_error(report: &ValidationReport, rule: Rule) {
    assert!(
        report.errors.iter().any(|i| i.rule == rule),
        "Expected error {rule}, got: {:?}",
        report
    );
}

pub fn assert_no_issue(report: &ValidationReport, rule: Rule) {
    assert!(
        !all_issues(report).iter().any(|i| i.rule == rule),
        "Did not expect {rule}, but got: {:?}",
        report
    );
}

pub fn issue_paths(report: &ValidationReport, rule: Rule) -> Vec<String> {
    all_issues(report)
        .iter()
        .filter(|i| i.rule == rule)
        .map(|i| i.path.clone())
        .collect()
}

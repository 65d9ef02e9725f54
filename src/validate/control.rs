//! Decision, GOTO and TERMINATE rules. The escape-hook rules thread a
//! container token through the recursion so placement checks compare an
//! explicit enum instead of strings.

use std::collections::HashSet;

use crate::document::Step;
use crate::error::{Issue, Rule};
use crate::validate::{IssueSink, RuleContext, indexed, join, keyed, non_empty};

/// What structure the walk is currently nested inside.
#[derive(Debug, Clone, Copy)]
enum Container<'a> {
    MainPath,
    DecisionOutcome,
    BranchPath(&'a str),
}

impl Container<'_> {
    /// Container type string for the constraint provider; `None` on the main
    /// path, where escape hooks are never legal.
    fn type_name(&self) -> Option<&str> {
        match self {
            Container::MainPath => None,
            Container::DecisionOutcome => Some("DECISION"),
            Container::BranchPath(branch_type) => Some(branch_type),
        }
    }
}

/// Decision steps: single assignee, outcome cardinality, outcome-id
/// uniqueness scoped per decision.
pub(crate) fn validate_decisions(ctx: &RuleContext, sink: &mut IssueSink) {
    walk_decisions(ctx, ctx.flow.main_path(), "", sink);
}

fn walk_decisions(ctx: &RuleContext, steps: &[Step], prefix: &str, sink: &mut IssueSink) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        match step {
            Step::Decision(decision) => {
                if decision.assignee.as_ref().is_some_and(|a| a.is_collection()) {
                    sink.push(Issue::new(
                        join(&step_path, "assignee"),
                        Rule::DecisionSingleAssignee,
                        "Decision steps take exactly one assignee, not a collection",
                    ));
                }

                let count = decision.config.outcomes.len();
                let max_outcomes = ctx.constraints.max_decision_outcomes();
                if count < 2 {
                    sink.push(Issue::new(
                        join(&step_path, "outcomes"),
                        Rule::MinOutcomes,
                        format!("Decision must have at least 2 outcomes, found {count}"),
                    ));
                } else if count > max_outcomes {
                    sink.push(Issue::new(
                        join(&step_path, "outcomes"),
                        Rule::MaxDecisionOutcomes,
                        format!("Decision cannot have more than {max_outcomes} outcomes, found {count}"),
                    ));
                }

                let mut seen = HashSet::new();
                for outcome in &decision.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    if let Some(id) = non_empty(outcome.outcome_id.as_deref()) {
                        if !seen.insert(id) {
                            sink.push(Issue::new(
                                join(&outcome_prefix, "outcomeId"),
                                Rule::UniqueId,
                                format!("Duplicate outcome ID '{id}'"),
                            ));
                        }
                    }
                    walk_decisions(ctx, &outcome.steps, &outcome_prefix, sink);
                }
            }
            Step::Branch(branch) => {
                for path in &branch.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    walk_decisions(ctx, &path.steps, &path_prefix, sink);
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

/// GOTO placement and target resolution. Only anchors declared on the main
/// path are legal jump targets; nested destinations are never collected.
pub(crate) fn validate_goto(ctx: &RuleContext, sink: &mut IssueSink) {
    let mut destinations = HashSet::new();
    for step in ctx.flow.main_path() {
        if let Step::GotoDestination(_) = step {
            if let Some(id) = non_empty(step.step_id()) {
                destinations.insert(id);
            }
        }
    }
    walk_goto(ctx, ctx.flow.main_path(), "", Container::MainPath, &destinations, sink);
}

fn walk_goto(
    ctx: &RuleContext,
    steps: &[Step],
    prefix: &str,
    container: Container,
    destinations: &HashSet<&str>,
    sink: &mut IssueSink,
) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        match step {
            Step::Goto(goto) => {
                let allowed = container
                    .type_name()
                    .is_some_and(|t| ctx.constraints.is_goto_allowed_in(t));
                if !allowed {
                    sink.push(Issue::new(
                        step_path,
                        Rule::GotoPlacement,
                        "GOTO is only allowed inside a decision outcome or a branch path",
                    ));
                    continue;
                }
                if ctx.constraints.must_goto_target_main_path() {
                    let target = goto.config.target_goto_destination_id.as_deref().unwrap_or("");
                    if !destinations.contains(target) {
                        sink.push(Issue::new(
                            join(&step_path, "targetGotoDestinationId"),
                            Rule::GotoTargetMainPath,
                            format!("GOTO target '{target}' is not a main-path destination"),
                        ));
                    }
                }
            }
            Step::Branch(branch) => {
                for path in &branch.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    walk_goto(
                        ctx,
                        &path.steps,
                        &path_prefix,
                        Container::BranchPath(step.step_type()),
                        destinations,
                        sink,
                    );
                }
            }
            Step::Decision(decision) => {
                for outcome in &decision.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    walk_goto(
                        ctx,
                        &outcome.steps,
                        &outcome_prefix,
                        Container::DecisionOutcome,
                        destinations,
                        sink,
                    );
                }
            }
            Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

/// TERMINATE placement and status. Same container walk as GOTO, without a
/// destination table.
pub(crate) fn validate_terminate(ctx: &RuleContext, sink: &mut IssueSink) {
    walk_terminate(ctx, ctx.flow.main_path(), "", Container::MainPath, sink);
}

fn walk_terminate(
    ctx: &RuleContext,
    steps: &[Step],
    prefix: &str,
    container: Container,
    sink: &mut IssueSink,
) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        match step {
            Step::Terminate(terminate) => {
                let allowed = container
                    .type_name()
                    .is_some_and(|t| ctx.constraints.is_terminate_allowed_in(t));
                if !allowed {
                    sink.push(Issue::new(
                        step_path.clone(),
                        Rule::TerminatePlacement,
                        "TERMINATE is only allowed inside a decision outcome or a branch path",
                    ));
                }
                let status = terminate.config.status.as_deref().unwrap_or("");
                if !ctx.constraints.is_valid_terminate_status(status) {
                    sink.push(Issue::new(
                        join(&step_path, "status"),
                        Rule::TerminateStatus,
                        format!("Invalid terminate status '{status}'"),
                    ));
                }
            }
            Step::Branch(branch) => {
                for path in &branch.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    walk_terminate(
                        ctx,
                        &path.steps,
                        &path_prefix,
                        Container::BranchPath(step.step_type()),
                        sink,
                    );
                }
            }
            Step::Decision(decision) => {
                for outcome in &decision.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    walk_terminate(
                        ctx,
                        &outcome.steps,
                        &outcome_prefix,
                        Container::DecisionOutcome,
                        sink,
                    );
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Other(_) => {}
        }
    }
}

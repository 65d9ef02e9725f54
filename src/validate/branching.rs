//! Branch structure rules: nesting depth, path cardinality, milestone
//! consistency, and per-path condition validation.

use crate::document::{BranchPath, Step};
use crate::error::{Issue, Rule};
use crate::validate::{IssueSink, RuleContext, indexed, join, keyed, non_empty};

const VALID_CONDITION_TYPES: [&str; 6] = [
    "EQUALS",
    "NOT_EQUALS",
    "CONTAINS",
    "NOT_CONTAINS",
    "NOT_EMPTY",
    "ELSE",
];
const VALID_CONDITION_LOGIC: [&str; 2] = ["ALL", "ANY"];
pub(crate) const MAX_CONDITIONS_PER_PATH: usize = 10;

/// Nesting depth, path count, and branch milestone consistency. Depth counts
/// from 1 at the main path and increments only for nested branches, so the
/// check admits branches up to the configured depth inclusive.
pub(crate) fn validate_branching(ctx: &RuleContext, sink: &mut IssueSink) {
    walk_branches(ctx, ctx.flow.main_path(), "", 1, None, sink);
}

// TODO: `_parent_milestone` is threaded through nested calls but never read;
// decide whether grandchild branches should also match the top ancestor's
// milestone before wiring it into the consistency check.
fn walk_branches(
    ctx: &RuleContext,
    steps: &[Step],
    prefix: &str,
    depth: usize,
    _parent_milestone: Option<&str>,
    sink: &mut IssueSink,
) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        match step {
            Step::Branch(branch) => {
                let max_depth = ctx.constraints.max_branch_nesting_depth();
                if depth > max_depth {
                    sink.push(Issue::new(
                        step_path.clone(),
                        Rule::MaxNestingDepth,
                        format!("Branch nesting depth {depth} exceeds maximum of {max_depth}"),
                    ));
                }

                let count = branch.config.paths.len();
                let max_paths = ctx.constraints.max_parallel_paths();
                if count < 2 {
                    sink.push(Issue::new(
                        join(&step_path, "paths"),
                        Rule::MinPaths,
                        format!("Branch must have at least 2 paths, found {count}"),
                    ));
                } else if count > max_paths {
                    sink.push(Issue::new(
                        join(&step_path, "paths"),
                        Rule::MaxParallelPaths,
                        format!("Branch cannot have more than {max_paths} paths, found {count}"),
                    ));
                }

                let branch_milestone = non_empty(branch.milestone_id.as_deref());
                for path in &branch.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    if ctx.constraints.must_branch_fit_single_milestone() {
                        scan_milestone_mismatch(&path.steps, &path_prefix, branch_milestone, sink);
                    }
                    walk_branches(
                        ctx,
                        &path.steps,
                        &path_prefix,
                        depth + 1,
                        branch_milestone,
                        sink,
                    );
                }
            }
            Step::Decision(decision) => {
                for outcome in &decision.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    walk_branches(ctx, &outcome.steps, &outcome_prefix, depth, _parent_milestone, sink);
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

/// Every step nested in a branch path must carry the branch's own milestone.
/// The first mismatch yields one issue for the path and stops the scan.
fn scan_milestone_mismatch(
    steps: &[Step],
    prefix: &str,
    expected: Option<&str>,
    sink: &mut IssueSink,
) -> bool {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        if non_empty(step.milestone_id()) != expected {
            let message = match expected {
                Some(m) => format!("Step must carry the branch milestone '{m}'"),
                None => "Step must not carry a milestone when its branch has none".to_string(),
            };
            sink.push(Issue::new(
                join(&step_path, "milestoneId"),
                Rule::BranchMilestoneConsistency,
                message,
            ));
            return true;
        }
        let mismatched = match step {
            Step::Branch(b) => b.config.paths.iter().any(|p| {
                let path_prefix = keyed(&step_path, "paths", p.path_id.as_deref());
                scan_milestone_mismatch(&p.steps, &path_prefix, expected, sink)
            }),
            Step::Decision(d) => d.config.outcomes.iter().any(|o| {
                let outcome_prefix = keyed(&step_path, "outcomes", o.outcome_id.as_deref());
                scan_milestone_mismatch(&o.steps, &outcome_prefix, expected, sink)
            }),
            _ => false,
        };
        if mismatched {
            return true;
        }
    }
    false
}

/// Condition shape of every branch path, everywhere in the tree. Runs
/// regardless of container legality; placement is a different rule's job.
pub(crate) fn validate_path_conditions(ctx: &RuleContext, sink: &mut IssueSink) {
    walk_conditions(ctx.flow.main_path(), "", sink);
}

fn walk_conditions(steps: &[Step], prefix: &str, sink: &mut IssueSink) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        match step {
            Step::Branch(branch) => {
                for path in &branch.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    check_branch_path(path, &path_prefix, sink);
                    walk_conditions(&path.steps, &path_prefix, sink);
                }
            }
            Step::Decision(decision) => {
                for outcome in &decision.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    walk_conditions(&outcome.steps, &outcome_prefix, sink);
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

fn check_branch_path(path: &BranchPath, prefix: &str, sink: &mut IssueSink) {
    if let Some(condition) = &path.condition {
        let ty = condition.condition_type.as_deref().unwrap_or("");
        if !VALID_CONDITION_TYPES.contains(&ty) {
            sink.push(Issue::new(
                join(prefix, "condition.type"),
                Rule::InvalidConditionType,
                format!("Invalid condition type '{ty}'"),
            ));
        }
    }

    if let Some(conditions) = &path.conditions {
        if conditions.len() > MAX_CONDITIONS_PER_PATH {
            sink.push(Issue::new(
                join(prefix, "conditions"),
                Rule::MaxConditionsPerPath,
                format!(
                    "A path cannot have more than {MAX_CONDITIONS_PER_PATH} conditions, found {}",
                    conditions.len()
                ),
            ));
        }
        for (j, condition) in conditions.iter().enumerate() {
            let ty = condition.condition_type.as_deref().unwrap_or("");
            if !VALID_CONDITION_TYPES.contains(&ty) {
                sink.push(Issue::new(
                    join(&indexed(prefix, "conditions", j), "type"),
                    Rule::InvalidConditionType,
                    format!("Invalid condition type '{ty}'"),
                ));
            }
        }
    }

    let multiple = path.conditions.as_ref().is_some_and(|c| c.len() > 1);
    if multiple {
        match non_empty(path.condition_logic.as_deref()) {
            None => sink.push(Issue::new(
                join(prefix, "conditionLogic"),
                Rule::RequiredField,
                "conditionLogic is required when a path has multiple conditions",
            )),
            Some(logic) if !VALID_CONDITION_LOGIC.contains(&logic) => sink.push(Issue::new(
                join(prefix, "conditionLogic"),
                Rule::InvalidConditionLogic,
                format!("Invalid condition logic '{logic}'"),
            )),
            Some(_) => {}
        }
    } else if let Some(logic) = non_empty(path.condition_logic.as_deref()) {
        // Re-validated here for the zero/one-condition case.
        if !VALID_CONDITION_LOGIC.contains(&logic) {
            sink.push(Issue::new(
                join(prefix, "conditionLogic"),
                Rule::InvalidConditionLogic,
                format!("Invalid condition logic '{logic}'"),
            ));
        }
    }
}

//! Flow-level structural rules: required fields, the milestone list, global
//! step-id uniqueness, step-type validity, and the main-path milestone
//! requirement.

use std::collections::HashSet;

use crate::document::Step;
use crate::error::{Issue, Rule};
use crate::validate::{IssueSink, RuleContext, indexed, join, keyed, non_empty};

/// Presence of `flowId`, `name` and the `steps` sequence.
pub(crate) fn validate_structure(ctx: &RuleContext, sink: &mut IssueSink) {
    if non_empty(ctx.flow.flow_id.as_deref()).is_none() {
        sink.push(Issue::new(
            "flowId",
            Rule::RequiredField,
            "Flow must have a flowId",
        ));
    }
    if non_empty(ctx.flow.name.as_deref()).is_none() {
        sink.push(Issue::new(
            "name",
            Rule::RequiredField,
            "Flow must have a name",
        ));
    }
    if ctx.flow.steps.is_none() {
        sink.push(Issue::new(
            "steps",
            Rule::RequiredField,
            "Flow must have a steps sequence",
        ));
    }
}

/// Every milestone carries a non-empty id; duplicates are reported against
/// the repeat occurrences. Milestones without an id stay out of the duplicate
/// set since their absence is already reported.
pub(crate) fn validate_milestones(ctx: &RuleContext, sink: &mut IssueSink) {
    let mut seen = HashSet::new();
    for (i, milestone) in ctx.flow.milestones.iter().enumerate() {
        let id_path = join(&indexed("", "milestones", i), "milestoneId");
        let Some(id) = non_empty(milestone.milestone_id.as_deref()) else {
            sink.push(Issue::new(
                id_path,
                Rule::RequiredField,
                "Milestone must have a milestoneId",
            ));
            continue;
        };
        if !seen.insert(id) {
            sink.push(Issue::new(
                id_path,
                Rule::UniqueId,
                format!("Duplicate milestone ID '{id}'"),
            ));
        }
    }
}

/// Step ids are unique across the entire nested tree: one global set shared
/// across siblings and unrelated subtrees.
pub(crate) fn validate_step_ids(ctx: &RuleContext, sink: &mut IssueSink) {
    let mut seen = HashSet::new();
    collect_step_ids(ctx.flow.main_path(), "", &mut seen, sink);
}

fn collect_step_ids(
    steps: &[Step],
    prefix: &str,
    seen: &mut HashSet<String>,
    sink: &mut IssueSink,
) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        let Some(id) = non_empty(step.step_id()) else {
            // Reported once; the subtree is not descended and nothing enters
            // the set.
            sink.push(Issue::new(
                join(&step_path, "stepId"),
                Rule::RequiredField,
                "Step must have a stepId",
            ));
            continue;
        };
        if !seen.insert(id.to_string()) {
            sink.push(Issue::new(
                join(&step_path, "stepId"),
                Rule::UniqueId,
                format!("Duplicate step ID '{id}'"),
            ));
        }
        match step {
            Step::Branch(b) => {
                for path in &b.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    collect_step_ids(&path.steps, &path_prefix, seen, sink);
                }
            }
            Step::Decision(d) => {
                for outcome in &d.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    collect_step_ids(&outcome.steps, &outcome_prefix, seen, sink);
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

/// Every step's type must be known to the registry. Under LENIENT mode the
/// issue is filed as a warning so imported documents with unregistered step
/// types never fail validity on this rule alone.
pub(crate) fn validate_step_types(ctx: &RuleContext, sink: &mut IssueSink) {
    check_step_types(ctx, ctx.flow.main_path(), "", sink);
}

fn check_step_types(ctx: &RuleContext, steps: &[Step], prefix: &str, sink: &mut IssueSink) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        let step_type = step.step_type();
        if !ctx.registry.is_known_step_type(step_type) {
            sink.push_with(
                Issue::new(
                    step_path.clone(),
                    Rule::UnknownStepType,
                    format!("Unknown step type '{step_type}'"),
                ),
                ctx.mode.is_lenient(),
            );
        }
        match step {
            Step::Branch(b) => {
                for path in &b.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    check_step_types(ctx, &path.steps, &path_prefix, sink);
                }
            }
            Step::Decision(d) => {
                for outcome in &d.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    check_step_types(ctx, &outcome.steps, &outcome_prefix, sink);
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

/// When milestones are declared, every main-path step except GOTO must carry
/// a milestoneId resolving to one of them. Nested subtrees are governed by
/// the branch consistency rule, not by this presence check.
pub(crate) fn validate_main_path_milestones(ctx: &RuleContext, sink: &mut IssueSink) {
    if ctx.flow.milestones.is_empty() {
        return;
    }
    let declared: HashSet<&str> = ctx
        .flow
        .milestones
        .iter()
        .filter_map(|m| non_empty(m.milestone_id.as_deref()))
        .collect();

    for (i, step) in ctx.flow.main_path().iter().enumerate() {
        if matches!(step, Step::Goto(_)) {
            continue;
        }
        let id_path = join(&indexed("", "steps", i), "milestoneId");
        let Some(milestone_id) = non_empty(step.milestone_id()) else {
            sink.push(Issue::new(
                id_path,
                Rule::RequiredField,
                "Main-path step must have a milestoneId when milestones are defined",
            ));
            continue;
        };
        if !declared.contains(milestone_id) {
            sink.push(Issue::new(
                id_path,
                Rule::InvalidReference,
                format!("Step references undeclared milestone '{milestone_id}'"),
            ));
        }
    }
}

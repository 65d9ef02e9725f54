//! Assignee placeholder reference integrity.
//!
//! Only resolvable-but-invalid placeholder references are flagged; malformed
//! or absent references are skipped, their shape being the generator's
//! responsibility.

use std::collections::HashSet;

use crate::document::{Reference, ReferenceValue, Step};
use crate::error::{Issue, Rule};
use crate::validate::{IssueSink, RuleContext, indexed, join, keyed, non_empty};

pub(crate) fn validate_assignee_refs(ctx: &RuleContext, sink: &mut IssueSink) {
    let declared: HashSet<&str> = ctx
        .flow
        .assignee_placeholders
        .iter()
        .filter_map(|p| non_empty(p.placeholder_id.as_deref()))
        .collect();
    walk_references(ctx.flow.main_path(), "", &declared, sink);
}

fn walk_references(
    steps: &[Step],
    prefix: &str,
    declared: &HashSet<&str>,
    sink: &mut IssueSink,
) {
    for (i, step) in steps.iter().enumerate() {
        let step_path = indexed(prefix, "steps", i);
        for (field, value) in step.assignment_fields() {
            let Some(value) = value else { continue };
            match value {
                ReferenceValue::One(reference) => {
                    check_reference(reference, &join(&step_path, field), declared, sink);
                }
                ReferenceValue::Many(references) => {
                    for (j, reference) in references.iter().enumerate() {
                        check_reference(reference, &indexed(&step_path, field, j), declared, sink);
                    }
                }
                ReferenceValue::Other(_) => {}
            }
        }
        match step {
            Step::Branch(branch) => {
                for path in &branch.config.paths {
                    let path_prefix = keyed(&step_path, "paths", path.path_id.as_deref());
                    walk_references(&path.steps, &path_prefix, declared, sink);
                }
            }
            Step::Decision(decision) => {
                for outcome in &decision.config.outcomes {
                    let outcome_prefix =
                        keyed(&step_path, "outcomes", outcome.outcome_id.as_deref());
                    walk_references(&outcome.steps, &outcome_prefix, declared, sink);
                }
            }
            Step::Goto(_) | Step::GotoDestination(_) | Step::Terminate(_) | Step::Other(_) => {}
        }
    }
}

fn check_reference(
    reference: &Reference,
    path_prefix: &str,
    declared: &HashSet<&str>,
    sink: &mut IssueSink,
) {
    if !reference.is_placeholder() {
        return;
    }
    let Some(id) = non_empty(reference.placeholder_id.as_deref()) else {
        return;
    };
    if !declared.contains(id) {
        sink.push(Issue::new(
            join(path_prefix, "placeholderId"),
            Rule::InvalidReference,
            format!("Unknown assignee placeholder '{id}'"),
        ));
    }
}

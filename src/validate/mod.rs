//! Structural validation of a flow document.
//!
//! Eleven independent read-only passes over the step tree, aggregated into a
//! single `{valid, errors, warnings}` report. Rules file issues and keep
//! walking, so one call surfaces every violation rather than the first.

pub mod branching;
pub mod control;
pub mod references;
pub mod structure;

use serde::{Deserialize, Serialize};

use crate::config::{ConstraintProvider, FlowConstraints, StepTypeCatalog, StepTypeRegistry};
use crate::document::Flow;
use crate::error::{Issue, Severity};

/// Validation strictness profile: STRICT for our own generator's output,
/// LENIENT for imported documents whose unknown step types are tolerated
/// and merely flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
    #[default]
    Strict,
    Lenient,
}

impl ValidationMode {
    pub fn is_lenient(self) -> bool {
        self == ValidationMode::Lenient
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateOptions {
    pub mode: ValidationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

/// Effective severity of an issue. Rules state an intended severity; this
/// policy has the final say, so the remap stays testable on its own.
pub(crate) fn effective_severity(intended: Severity, force_warning: bool) -> Severity {
    if force_warning {
        Severity::Warning
    } else {
        intended
    }
}

/// Per-call accumulator with a single-writer contract: every rule pushes into
/// the same sink, nothing is shared across calls.
#[derive(Debug, Default)]
pub(crate) struct IssueSink {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl IssueSink {
    pub(crate) fn push(&mut self, issue: Issue) {
        self.push_with(issue, false);
    }

    pub(crate) fn push_with(&mut self, mut issue: Issue, force_warning: bool) {
        issue.severity = effective_severity(issue.severity, force_warning);
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    fn into_report(self) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// Read-only state every rule receives.
pub(crate) struct RuleContext<'a> {
    pub flow: &'a Flow,
    pub registry: &'a dyn StepTypeRegistry,
    pub constraints: &'a dyn ConstraintProvider,
    pub mode: ValidationMode,
}

/// Validate a flow against the default step-type catalog and constraints.
pub fn validate(flow: &Flow, options: &ValidateOptions) -> ValidationReport {
    validate_with(
        flow,
        options,
        &StepTypeCatalog::default(),
        &FlowConstraints::default(),
    )
}

/// Validate a flow against injected collaborators. Purely read-only over the
/// document; safe to call concurrently across documents.
pub fn validate_with(
    flow: &Flow,
    options: &ValidateOptions,
    registry: &dyn StepTypeRegistry,
    constraints: &dyn ConstraintProvider,
) -> ValidationReport {
    let ctx = RuleContext {
        flow,
        registry,
        constraints,
        mode: options.mode,
    };
    let mut sink = IssueSink::default();

    structure::validate_structure(&ctx, &mut sink);
    structure::validate_milestones(&ctx, &mut sink);
    structure::validate_step_ids(&ctx, &mut sink);
    structure::validate_step_types(&ctx, &mut sink);
    structure::validate_main_path_milestones(&ctx, &mut sink);
    branching::validate_branching(&ctx, &mut sink);
    branching::validate_path_conditions(&ctx, &mut sink);
    control::validate_decisions(&ctx, &mut sink);
    control::validate_goto(&ctx, &mut sink);
    control::validate_terminate(&ctx, &mut sink);
    references::validate_assignee_refs(&ctx, &mut sink);

    sink.into_report()
}

// ---------------------------------------------------------------------------
// Location-path helpers
// ---------------------------------------------------------------------------
// Dotted field access, bracket indices for arrays, bracket ids for keyed
// collections: `steps[2].paths[pathA].steps[0].milestoneId`.

pub(crate) fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

pub(crate) fn indexed(prefix: &str, field: &str, index: usize) -> String {
    join(prefix, &format!("{field}[{index}]"))
}

pub(crate) fn keyed(prefix: &str, field: &str, id: Option<&str>) -> String {
    join(prefix, &format!("{field}[{}]", id.unwrap_or("")))
}

/// Treats `None` and empty strings alike; several fields are "present" only
/// when non-empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

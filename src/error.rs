//! Issue and error types shared by every validation rule.

use serde::{Deserialize, Serialize};

/// Rule identifiers, doubling as machine-readable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    RequiredField,
    UniqueId,
    UnknownStepType,
    InvalidReference,
    MaxNestingDepth,
    MaxParallelPaths,
    MinPaths,
    BranchMilestoneConsistency,
    InvalidConditionType,
    MaxConditionsPerPath,
    InvalidConditionLogic,
    DecisionSingleAssignee,
    MaxDecisionOutcomes,
    MinOutcomes,
    GotoPlacement,
    GotoTargetMainPath,
    TerminatePlacement,
    TerminateStatus,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::RequiredField => "REQUIRED_FIELD",
            Rule::UniqueId => "UNIQUE_ID",
            Rule::UnknownStepType => "UNKNOWN_STEP_TYPE",
            Rule::InvalidReference => "INVALID_REFERENCE",
            Rule::MaxNestingDepth => "MAX_NESTING_DEPTH",
            Rule::MaxParallelPaths => "MAX_PARALLEL_PATHS",
            Rule::MinPaths => "MIN_PATHS",
            Rule::BranchMilestoneConsistency => "BRANCH_MILESTONE_CONSISTENCY",
            Rule::InvalidConditionType => "INVALID_CONDITION_TYPE",
            Rule::MaxConditionsPerPath => "MAX_CONDITIONS_PER_PATH",
            Rule::InvalidConditionLogic => "INVALID_CONDITION_LOGIC",
            Rule::DecisionSingleAssignee => "DECISION_SINGLE_ASSIGNEE",
            Rule::MaxDecisionOutcomes => "MAX_DECISION_OUTCOMES",
            Rule::MinOutcomes => "MIN_OUTCOMES",
            Rule::GotoPlacement => "GOTO_PLACEMENT",
            Rule::GotoTargetMainPath => "GOTO_TARGET_MAIN_PATH",
            Rule::TerminatePlacement => "TERMINATE_PLACEMENT",
            Rule::TerminateStatus => "TERMINATE_STATUS",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// One reported violation: a machine-addressable location path, the rule that
/// fired, a human message, and the severity the mode policy settled on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub path: String,
    pub rule: Rule,
    pub message: String,
    pub severity: Severity,
}

impl Issue {
    /// New issue with the rule's intended severity (error). The sink may
    /// remap it to a warning before filing it.
    pub fn new(path: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Issue {
            path: path.into(),
            rule,
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} (at '{}')", self.rule, self.message, self.path)
    }
}

impl std::error::Error for Issue {}

/// Parse-phase failure. Validation itself never returns an error: a parsed
/// `Flow` always produces a report.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("failed to parse flow JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

//! Injected validation configuration: the step-type catalog and the numeric
//! and placement limits. Rules only ever read these through the two traits so
//! the hosting service can swap in tenant-specific policy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Answers "is this type string known?". Read-only for the duration of a
/// validation call.
pub trait StepTypeRegistry {
    fn is_known_step_type(&self, step_type: &str) -> bool;
}

/// Numeric and policy limits consumed by the branching, decision, GOTO and
/// TERMINATE rules.
pub trait ConstraintProvider {
    fn max_parallel_paths(&self) -> usize;
    fn max_decision_outcomes(&self) -> usize;
    fn max_branch_nesting_depth(&self) -> usize;
    fn is_goto_allowed_in(&self, container_type: &str) -> bool;
    fn is_terminate_allowed_in(&self, container_type: &str) -> bool;
    fn must_branch_fit_single_milestone(&self) -> bool;
    fn must_goto_target_main_path(&self) -> bool;
    fn is_valid_terminate_status(&self, status: &str) -> bool;
}

// =============================================================================
// DEFAULT IMPLEMENTATIONS
// =============================================================================

/// Set-backed catalog of known step type strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTypeCatalog {
    pub known_types: HashSet<String>,
}

impl StepTypeCatalog {
    pub fn new(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        StepTypeCatalog {
            known_types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StepTypeCatalog {
    fn default() -> Self {
        StepTypeCatalog::new([
            "TASK",
            "APPROVAL",
            "FORM",
            "NOTIFICATION",
            "SINGLE_CHOICE_BRANCH",
            "DECISION",
            "GOTO",
            "GOTO_DESTINATION",
            "TERMINATE",
        ])
    }
}

impl StepTypeRegistry for StepTypeCatalog {
    fn is_known_step_type(&self, step_type: &str) -> bool {
        self.known_types.contains(step_type)
    }
}

/// Platform limits for flow structure. The defaults match the hosted plan;
/// deserialize a different set for other tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConstraints {
    pub max_parallel_paths: usize,
    pub max_decision_outcomes: usize,
    pub max_branch_nesting_depth: usize,
    pub goto_containers: HashSet<String>,
    pub terminate_containers: HashSet<String>,
    pub branch_single_milestone: bool,
    pub goto_targets_main_path: bool,
    pub terminate_statuses: HashSet<String>,
}

impl Default for FlowConstraints {
    fn default() -> Self {
        let containers: HashSet<String> = ["DECISION", "SINGLE_CHOICE_BRANCH"]
            .into_iter()
            .map(String::from)
            .collect();
        FlowConstraints {
            max_parallel_paths: 5,
            max_decision_outcomes: 5,
            max_branch_nesting_depth: 3,
            goto_containers: containers.clone(),
            terminate_containers: containers,
            branch_single_milestone: true,
            goto_targets_main_path: true,
            terminate_statuses: ["COMPLETED", "CANCELLED", "REJECTED"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ConstraintProvider for FlowConstraints {
    fn max_parallel_paths(&self) -> usize {
        self.max_parallel_paths
    }

    fn max_decision_outcomes(&self) -> usize {
        self.max_decision_outcomes
    }

    fn max_branch_nesting_depth(&self) -> usize {
        self.max_branch_nesting_depth
    }

    fn is_goto_allowed_in(&self, container_type: &str) -> bool {
        self.goto_containers.contains(container_type)
    }

    fn is_terminate_allowed_in(&self, container_type: &str) -> bool {
        self.terminate_containers.contains(container_type)
    }

    fn must_branch_fit_single_milestone(&self) -> bool {
        self.branch_single_milestone
    }

    fn must_goto_target_main_path(&self) -> bool {
        self.goto_targets_main_path
    }

    fn is_valid_terminate_status(&self, status: &str) -> bool {
        self.terminate_statuses.contains(status)
    }
}

//! Rust types for the declarative flow document produced by the builder.
//!
//! These types are the serde target for the editor/generator JSON. The step
//! union is internally tagged on `type`; any type string outside the five
//! structural kinds lands in `Step::Other` with the raw string preserved, so
//! documents with unknown step types stay representable and the step-type
//! rule can flag them instead of the parser rejecting the document.

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL FLOW
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub flow_id: Option<String>,
    pub name: Option<String>,
    /// Main path. A missing or non-array value deserializes to `None` so the
    /// structural rule reports it instead of the parse phase throwing.
    #[serde(default, deserialize_with = "lenient_steps")]
    pub steps: Option<Vec<Step>>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub assignee_placeholders: Vec<AssigneePlaceholder>,
    /// Editor settings, carried through untouched; validation never reads them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl Flow {
    /// The top-level step sequence, empty when `steps` is absent.
    pub fn main_path(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or(&[])
    }
}

fn lenient_steps<'de, D>(deserializer: D) -> Result<Option<Vec<Step>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub milestone_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneePlaceholder {
    pub placeholder_id: Option<String>,
    pub name: Option<String>,
}

// =============================================================================
// STEP — tagged union over the structural step kinds
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Step {
    #[serde(rename = "SINGLE_CHOICE_BRANCH")]
    Branch(StepBase<BranchConfig>),
    #[serde(rename = "DECISION")]
    Decision(StepBase<DecisionConfig>),
    #[serde(rename = "GOTO")]
    Goto(StepBase<GotoConfig>),
    #[serde(rename = "GOTO_DESTINATION")]
    GotoDestination(StepBase<GotoDestinationConfig>),
    #[serde(rename = "TERMINATE")]
    Terminate(StepBase<TerminateConfig>),
    /// Any other step kind: plain catalog steps (TASK, APPROVAL, ...) as well
    /// as type strings nobody has registered.
    #[serde(untagged)]
    Other(StepBase<OtherConfig>),
}

/// Fields common to every step kind, with the kind-specific config flattened
/// alongside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepBase<C> {
    pub step_id: Option<String>,
    pub name: Option<String>,
    pub milestone_id: Option<String>,
    pub assignee: Option<ReferenceValue>,
    pub assignees: Option<ReferenceValue>,
    pub reviewer: Option<ReferenceValue>,
    pub signers: Option<ReferenceValue>,
    #[serde(flatten)]
    pub config: C,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    #[serde(default)]
    pub paths: Vec<BranchPath>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoConfig {
    pub target_goto_destination_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GotoDestinationConfig {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminateConfig {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherConfig {
    #[serde(rename = "type", default)]
    pub step_type: String,
}

impl Step {
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Step::Branch(s) => s.step_id.as_deref(),
            Step::Decision(s) => s.step_id.as_deref(),
            Step::Goto(s) => s.step_id.as_deref(),
            Step::GotoDestination(s) => s.step_id.as_deref(),
            Step::Terminate(s) => s.step_id.as_deref(),
            Step::Other(s) => s.step_id.as_deref(),
        }
    }

    pub fn milestone_id(&self) -> Option<&str> {
        match self {
            Step::Branch(s) => s.milestone_id.as_deref(),
            Step::Decision(s) => s.milestone_id.as_deref(),
            Step::Goto(s) => s.milestone_id.as_deref(),
            Step::GotoDestination(s) => s.milestone_id.as_deref(),
            Step::Terminate(s) => s.milestone_id.as_deref(),
            Step::Other(s) => s.milestone_id.as_deref(),
        }
    }

    pub fn step_type(&self) -> &str {
        match self {
            Step::Branch(_) => "SINGLE_CHOICE_BRANCH",
            Step::Decision(_) => "DECISION",
            Step::Goto(_) => "GOTO",
            Step::GotoDestination(_) => "GOTO_DESTINATION",
            Step::Terminate(_) => "TERMINATE",
            Step::Other(s) => &s.config.step_type,
        }
    }

    /// The four assignment fields in declaration order, named for path
    /// construction.
    pub fn assignment_fields(&self) -> [(&'static str, Option<&ReferenceValue>); 4] {
        match self {
            Step::Branch(s) => assignment_fields_of(s),
            Step::Decision(s) => assignment_fields_of(s),
            Step::Goto(s) => assignment_fields_of(s),
            Step::GotoDestination(s) => assignment_fields_of(s),
            Step::Terminate(s) => assignment_fields_of(s),
            Step::Other(s) => assignment_fields_of(s),
        }
    }
}

fn assignment_fields_of<C>(base: &StepBase<C>) -> [(&'static str, Option<&ReferenceValue>); 4] {
    [
        ("assignee", base.assignee.as_ref()),
        ("assignees", base.assignees.as_ref()),
        ("reviewer", base.reviewer.as_ref()),
        ("signers", base.signers.as_ref()),
    ]
}

// =============================================================================
// BRANCH PATHS AND DECISION OUTCOMES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPath {
    pub path_id: Option<String>,
    pub condition: Option<Condition>,
    pub conditions: Option<Vec<Condition>>,
    pub condition_logic: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub outcome_id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: Option<String>,
    pub field: Option<String>,
    pub value: Option<serde_json::Value>,
}

// =============================================================================
// ASSIGNMENT REFERENCES
// =============================================================================

/// An assignment field holds either one reference or a collection of them.
/// Anything else (the generator occasionally emits nulls or bare strings
/// mid-edit) falls into `Other` and is skipped by the reference rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceValue {
    One(Reference),
    Many(Vec<Reference>),
    Other(serde_json::Value),
}

impl ReferenceValue {
    /// Well-formed references only; malformed shapes yield nothing.
    pub fn references(&self) -> &[Reference] {
        match self {
            ReferenceValue::One(r) => std::slice::from_ref(r),
            ReferenceValue::Many(rs) => rs,
            ReferenceValue::Other(_) => &[],
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ReferenceValue::Many(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub mode: Option<String>,
    pub placeholder_id: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl Reference {
    pub fn is_placeholder(&self) -> bool {
        self.mode.as_deref() == Some("PLACEHOLDER")
    }
}

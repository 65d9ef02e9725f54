//! Parse phase: JSON → `Flow`.

use crate::document::Flow;
use crate::error::FlowError;
use crate::validate::{self, ValidateOptions, ValidationReport};

/// Deserialize a flow JSON string into a `Flow` document.
pub fn parse(json: &str) -> Result<Flow, FlowError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and validate in one step, against the default configuration.
pub fn parse_and_validate(
    json: &str,
    options: &ValidateOptions,
) -> Result<ValidationReport, FlowError> {
    let flow = parse(json)?;
    Ok(validate::validate(&flow, options))
}

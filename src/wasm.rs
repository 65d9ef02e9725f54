//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::error::{Issue, Rule};
use crate::validate::{self, ValidateOptions, ValidationReport};

/// Validate a flow JSON against the default configuration.
/// Returns a `{valid, errors, warnings}` report object.
#[wasm_bindgen]
pub fn validate_flow(flow_json: &str, options_json: &str) -> JsValue {
    let report = validate_flow_inner(flow_json, options_json);
    serde_wasm_bindgen::to_value(&report).unwrap_or(JsValue::NULL)
}

fn validate_flow_inner(flow_json: &str, options_json: &str) -> ValidationReport {
    let options = serde_json::from_str::<ValidateOptions>(options_json).unwrap_or_default();
    let flow = match crate::parse::parse(flow_json) {
        Ok(flow) => flow,
        Err(e) => {
            // Not even tree-shaped; surface it as a report instead of
            // throwing across the boundary.
            return ValidationReport {
                valid: false,
                errors: vec![Issue::new("", Rule::RequiredField, e.to_string())],
                warnings: vec![],
            };
        }
    };
    validate::validate(&flow, &options)
}

use serde_json::Value;

use crate::error::{Result, ScenarioError};
use crate::models::ScenarioResponse;

const REQUIRED_FIELDS: [&str; 3] = ["scenario", "user_description", "expected_outcome"];

/// Parse the raw text returned by the model into a [`ScenarioResponse`].
///
/// Anything that is not a JSON object with string values for the required
/// fields is rejected. `scenario_id` may be missing or null.
pub fn parse_scenario_response(text: &str) -> Result<ScenarioResponse> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        ScenarioError::invalid_response(format!("response is not valid JSON: {}", e))
    })?;

    let object = value.as_object().ok_or_else(|| {
        ScenarioError::invalid_response(format!(
            "expected a JSON object, got {}",
            json_type(&value)
        ))
    })?;

    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        match object.get(field) {
            Some(Value::String(_)) => {}
            Some(other) => errors.push(format!(
                "field '{}' must be a string, got {}",
                field,
                json_type(other)
            )),
            None => errors.push(format!("missing field '{}'", field)),
        }
    }

    match object.get("scenario_id") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => errors.push(format!(
            "field 'scenario_id' must be a string, got {}",
            json_type(other)
        )),
    }

    if !errors.is_empty() {
        return Err(ScenarioError::invalid_response(errors.join("; ")));
    }

    serde_json::from_value(value).map_err(|e| ScenarioError::invalid_response(e.to_string()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

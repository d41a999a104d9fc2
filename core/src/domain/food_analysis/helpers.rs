use serde_json::{Map, Value};

use crate::domain::common::entities::app_errors::CoreError;

/// Turn taxonomy tags like `en:gluten-free` into display labels (`Gluten Free`).
pub fn clean_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let item = item.as_ref();
            let item = item.strip_prefix("en:").unwrap_or(item);
            title_case(&item.replace('-', " "))
        })
        .collect()
}

/// Labels that read like marketing claims: "... Free" or "No ...".
pub fn marketing_claims(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .filter(|label| label.contains("Free") || label.starts_with("No "))
        .cloned()
        .collect()
}

/// Uppercase the first letter of every word, lowercase the rest. A word starts
/// after any non-alphabetic character.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_alpha = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            out.push(c);
            previous_is_alpha = false;
        }
    }

    out
}

/// Strip a markdown code fence (optionally tagged `json`) around a model answer.
pub fn clean_json_text(text: &str) -> String {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim().to_string()
}

/// Parse a model answer as a JSON object. This is the whole contract for
/// generated verdicts unless strict validation is on.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, CoreError> {
    let cleaned = clean_json_text(raw);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(CoreError::GenerationFailed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(CoreError::GenerationFailed(format!(
            "response is not valid JSON: {}",
            e
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

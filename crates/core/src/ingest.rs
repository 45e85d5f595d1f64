use crate::domain::contract::SnapshotPairInput;
use crate::domain::snapshot::SnapshotPair;
use crate::error::{PulseError, Result};
use serde_json::Value;

/// Accepts the bare `{today, yesterday}` object, or the same object wrapped in an
/// `{"input": ...}` envelope.
pub fn parse_input(text: &str) -> Result<SnapshotPairInput> {
    let value = serde_json::from_str::<Value>(text.trim())
        .map_err(|e| PulseError::MalformedInput(e.to_string()))?;
    parse_input_value(value)
}

pub fn parse_input_value(value: Value) -> Result<SnapshotPairInput> {
    let value = unwrap_envelope(value);
    if !value.is_object() {
        return Err(PulseError::MalformedInput(format!(
            "expected a JSON object, got {value}"
        )));
    }
    serde_json::from_value::<SnapshotPairInput>(value)
        .map_err(|e| PulseError::MalformedInput(e.to_string()))
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if !map.contains_key("today") && !map.contains_key("yesterday") =>
        {
            match map.remove("input") {
                Some(inner) => inner,
                None => Value::Object(map),
            }
        }
        other => other,
    }
}

pub fn ingest(input: &SnapshotPairInput) -> Result<SnapshotPair> {
    input.validate_and_into_pair()
}

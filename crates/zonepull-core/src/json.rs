//! Conversion from decoded wire values to JSON for the side outputs.

use zonepull_protocol::Value;

/// Converts a decoded [`Value`] into a [`serde_json::Value`].
///
/// Everything scalar stays a string: the wire format is untyped text,
/// so no numeric guessing is done here.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Text(text) => serde_json::Value::String(text.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(key, entry)| (key.clone(), value_to_json(entry)))
                .collect(),
        ),
    }
}

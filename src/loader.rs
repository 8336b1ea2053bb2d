// Collection snapshots: JSON arrays, REST envelopes and JSONL

use crate::record::Record;
use eyre::{Context, Result, eyre};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Envelope key most REST list endpoints wrap their payload in
const DATA_KEY: &str = "data";

/// Load a collection of `T` from a file, preserving record order
///
/// Accepted layouts:
/// - a JSON array of records
/// - an envelope object `{"data": [...]}` or `{"<collection>": [...]}`
/// - JSON Lines, one record per line
///
/// Records that fail to decode are skipped with a warning.
pub fn load_collection<T: Record>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read collection file {}", path.display()))?;

    let records = parse_collection::<T>(&content, T::collection_name())
        .wrap_err_with(|| format!("Failed to parse collection file {}", path.display()))?;

    info!(
        file = ?path,
        collection = T::collection_name(),
        count = records.len(),
        "Loaded collection"
    );

    Ok(records)
}

/// Parse collection text; see `load_collection` for the accepted layouts
pub fn parse_collection<T: DeserializeOwned>(content: &str, envelope_key: &str) -> Result<Vec<T>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(elements)) => Ok(decode_elements(elements)),
        Ok(Value::Object(mut object)) => {
            for key in [DATA_KEY, envelope_key] {
                match object.remove(key) {
                    Some(Value::Array(elements)) => return Ok(decode_elements(elements)),
                    Some(other) => {
                        object.insert(key.to_string(), other);
                    }
                    None => {}
                }
            }
            // A lone object is a single-line JSONL file
            Ok(decode_elements(vec![Value::Object(object)]))
        }
        Ok(other) => Err(eyre!(
            "Unsupported collection document: expected array, object or JSON lines, got {}",
            kind(&other)
        )),
        Err(_) => parse_json_lines(content),
    }
}

fn parse_json_lines<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();
    let mut valid_lines = 0usize;

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(line = line_num + 1, error = ?e, "Failed to parse JSON, skipping");
                continue;
            }
        };
        valid_lines += 1;

        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = line_num + 1, error = ?e, "Failed to decode record, skipping");
            }
        }
    }

    if valid_lines == 0 {
        return Err(eyre!("Not a JSON document or JSON lines file"));
    }

    Ok(records)
}

fn decode_elements<T: DeserializeOwned>(elements: Vec<Value>) -> Vec<T> {
    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(index, error = ?e, "Failed to decode record, skipping");
            }
        }
    }
    records
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

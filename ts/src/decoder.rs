//! Decoding of single task objects
//!
//! The decoder is the authority on validity: the accumulator only guarantees
//! that braces balance. Only the recognized keys (`type`, `task`, `link`,
//! `components`, `component`, `steps`, `step`) populate fields; anything else
//! the model adds is ignored, including any attempt to set `completed`.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::model::{Category, Component, ItemId, Step, Task};

/// Why one candidate object was rejected
///
/// Every variant is non-fatal: the object is dropped and the stream continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid field {field}: expected {expected}")]
    InvalidField { field: String, expected: &'static str },
}

impl DecodeError {
    /// Stable short name for logs and machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedJson(_) => "malformed_json",
            DecodeError::MissingRequiredField(_) => "missing_required_field",
            DecodeError::InvalidField { .. } => "invalid_field",
        }
    }
}

/// Converts raw object text into [`Task`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskDecoder;

impl TaskDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode one object, assigning fresh ids and clearing every `completed` flag
    pub fn decode(&self, raw: &str) -> Result<Task, DecodeError> {
        debug!(raw_len = raw.len(), "TaskDecoder::decode: called");

        // Parsing through `Value` keeps the last of any duplicated keys, which
        // the model produces occasionally ("step": .., "step": ..).
        let value: Value = serde_json::from_str(raw).map_err(|e| DecodeError::MalformedJson(e.to_string()))?;
        let Value::Object(fields) = value else {
            debug!("TaskDecoder::decode: top-level value is not an object");
            return Err(DecodeError::MalformedJson("expected a JSON object".to_string()));
        };

        let task = required_text(&fields, "task", "task")?;
        let category = optional_text(&fields, "type")?.and_then(|t| Category::parse(&t));
        let link = optional_text(&fields, "link")?.filter(|l| !l.trim().is_empty());

        let steps = optional_list(&fields, "steps", |entry, path| {
            required_text(entry, "step", &format!("{}.step", path)).map(Step::new)
        })?;
        let components = optional_list(&fields, "components", |entry, path| {
            required_text(entry, "component", &format!("{}.component", path)).map(Component::new)
        })?;

        debug!(
            %task,
            ?category,
            steps = steps.as_ref().map_or(0, Vec::len),
            components = components.as_ref().map_or(0, Vec::len),
            "TaskDecoder::decode: decoded task"
        );

        Ok(Task {
            id: ItemId::new(),
            category,
            task,
            completed: false,
            link,
            steps,
            components,
        })
    }
}

fn required_text(fields: &Map<String, Value>, key: &str, path: &str) -> Result<String, DecodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(DecodeError::MissingRequiredField(path.to_string())),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(DecodeError::MissingRequiredField(path.to_string()))
        }
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(DecodeError::InvalidField {
            field: path.to_string(),
            expected: "a string",
        }),
    }
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, DecodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(DecodeError::InvalidField {
            field: key.to_string(),
            expected: "a string",
        }),
    }
}

fn optional_list<T>(
    fields: &Map<String, Value>,
    key: &str,
    decode_entry: impl Fn(&Map<String, Value>, &str) -> Result<T, DecodeError>,
) -> Result<Option<Vec<T>>, DecodeError> {
    let entries = match fields.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(DecodeError::InvalidField {
                field: key.to_string(),
                expected: "an array",
            });
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let path = format!("{}[{}]", key, index);
            match entry {
                Value::Object(entry) => decode_entry(entry, &path),
                _ => Err(DecodeError::InvalidField {
                    field: path,
                    expected: "an object",
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Render a task in the wire form the model is asked to produce
///
/// Ids and completion state are local and never encoded.
pub fn encode(task: &Task) -> String {
    let mut fields = Map::new();
    fields.insert("task".to_string(), Value::from(task.task.as_str()));
    if let Some(category) = task.category {
        fields.insert("type".to_string(), Value::from(category.as_str()));
    }
    if let Some(link) = &task.link {
        fields.insert("link".to_string(), Value::from(link.as_str()));
    }
    if let Some(components) = &task.components {
        let entries = components
            .iter()
            .map(|c| wire_entry("component", &c.component))
            .collect();
        fields.insert("components".to_string(), Value::Array(entries));
    }
    if let Some(steps) = &task.steps {
        let entries = steps.iter().map(|s| wire_entry("step", &s.step)).collect();
        fields.insert("steps".to_string(), Value::Array(entries));
    }
    Value::Object(fields).to_string()
}

fn wire_entry(key: &str, text: &str) -> Value {
    let mut entry = Map::new();
    entry.insert(key.to_string(), Value::from(text));
    Value::Object(entry)
}

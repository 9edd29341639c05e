//! Top-level field diff between a live resource and a desired document

use ciam_domain::{CiamError, Result};
use serde_json::{Map, Value};

/// One top-level field whose desired value differs from the live one.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    /// `None` when the field is absent on the live resource.
    pub current: Option<Value>,
    pub desired: Value,
}

/// Fields of `desired` that differ from `current`, sorted by name.
///
/// Fields present only in `current` are ignored; apply never removes data.
///
/// # Errors
///
/// `CiamError::InvalidInput` if `desired` is not a JSON object.
pub fn changed_fields(current: &Value, desired: &Value) -> Result<Vec<FieldChange>> {
    let desired = desired
        .as_object()
        .ok_or_else(|| CiamError::InvalidInput("desired document must be a JSON object".into()))?;
    let empty = Map::new();
    let current = current.as_object().unwrap_or(&empty);

    let mut changes: Vec<FieldChange> = desired
        .iter()
        .filter(|(field, value)| current.get(*field) != Some(*value))
        .map(|(field, value)| FieldChange {
            field: field.clone(),
            current: current.get(field).cloned(),
            desired: value.clone(),
        })
        .collect();
    changes.sort_by(|a, b| a.field.cmp(&b.field));
    Ok(changes)
}

/// PATCH body carrying only the changed fields.
pub fn patch_body(changes: &[FieldChange]) -> Value {
    Value::Object(changes.iter().map(|c| (c.field.clone(), c.desired.clone())).collect())
}

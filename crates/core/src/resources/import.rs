//! Validation of user import files: `{"type": "users", "users": [...]}`

use ciam_domain::{CiamError, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct UserImportFile {
    pub users: Vec<Value>,
}

/// Parse and validate one import document.
///
/// # Errors
///
/// `CiamError::InvalidInput` describing the first schema violation, or
/// `CiamError::Serialization` for malformed JSON.
pub fn parse_user_import(raw: &str) -> Result<UserImportFile> {
    let data: Value =
        serde_json::from_str(raw).map_err(|e| CiamError::Serialization(format!("invalid JSON: {e}")))?;

    let object = data
        .as_object()
        .ok_or_else(|| CiamError::InvalidInput("file must contain a JSON object".into()))?;

    match object.get("type").and_then(Value::as_str) {
        Some("users") => {}
        other => {
            return Err(CiamError::InvalidInput(format!(
                "expected type 'users', got '{}'",
                other.unwrap_or("none")
            )))
        }
    }

    let users = match object.get("users") {
        None => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(_) => return Err(CiamError::InvalidInput("field 'users' must be an array".into())),
    };

    if let Some(position) = users.iter().position(|u| !u.is_object()) {
        return Err(CiamError::InvalidInput(format!("users[{position}] must be a JSON object")));
    }

    Ok(UserImportFile { users })
}

//! Operation descriptors consumed by the request pipeline

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

use crate::constants::JSON_CONTENT_TYPE;
use crate::errors::{CiamError, Result};
use crate::types::credential::CredentialClass;

/// HTTP verbs used against the resource API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one API call, defined by a resource handler.
///
/// `path` is a template such as `/users/{id}`; placeholders are filled from
/// [`CallParams::path_params`] when the pipeline renders the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub requires_store_header: bool,
    pub credential_class: CredentialClass,
    pub content_type: String,
    pub accept: String,
}

impl Operation {
    /// A General-class, store-scoped JSON operation.
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            requires_store_header: true,
            credential_class: CredentialClass::General,
            content_type: JSON_CONTENT_TYPE.to_string(),
            accept: JSON_CONTENT_TYPE.to_string(),
        }
    }

    #[must_use]
    pub const fn with_store_header(mut self, required: bool) -> Self {
        self.requires_store_header = required;
        self
    }

    #[must_use]
    pub const fn with_credential_class(mut self, class: CredentialClass) -> Self {
        self.credential_class = class;
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Substitute `{name}` placeholders in the path template.
    ///
    /// # Errors
    ///
    /// Returns `CiamError::InvalidInput` if a placeholder has no value or a
    /// brace is left unterminated.
    pub fn render_path(&self, params: &BTreeMap<String, String>) -> Result<String> {
        let mut rendered = String::with_capacity(self.path.len());
        let mut rest = self.path.as_str();

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                CiamError::InvalidInput(format!("unterminated placeholder in '{}'", self.path))
            })?;
            let name = &after[..close];
            let value = params.get(name).ok_or_else(|| {
                CiamError::InvalidInput(format!(
                    "operation '{}' needs path parameter '{name}'",
                    self.name
                ))
            })?;
            rendered.push_str(&encode(value));
            rest = &after[close + 1..];
        }
        rendered.push_str(rest);
        Ok(rendered)
    }
}

/// Per-call inputs supplied alongside an [`Operation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallParams {
    /// Explicit store id; the caller resolves defaults before handing it over.
    pub store_id: Option<String>,
    pub path_params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl CallParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_store_id(mut self, store_id: Option<String>) -> Self {
        self.store_id = store_id;
        self
    }

    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

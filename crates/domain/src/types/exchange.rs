//! A single request/response (or error) pair as observed by the pipeline.
//!
//! Exchanges carry raw, unredacted data and exist only long enough to be
//! projected into an [`AuditEntry`](crate::types::audit::AuditEntry).

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::credential::CredentialClass;
use crate::types::operation::HttpMethod;

/// Body of a server reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    /// Parse `raw` as JSON, falling back to text.
    pub fn from_text(raw: String) -> Self {
        if raw.trim().is_empty() {
            return Self::Empty;
        }
        serde_json::from_str(&raw).map_or(Self::Text(raw), Self::Json)
    }

    /// JSON view of the body: text is wrapped as a JSON string, empty is null.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Text(text) => Value::String(text.clone()),
            Self::Empty => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

/// What came back: a reply (any status) or a failure before one arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    Response(ExchangeResponse),
    Failed { kind: String, message: String },
}

/// One attempt of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub operation: String,
    pub attempt: u32,
    pub credential_class: CredentialClass,
    pub params: Option<Value>,
    pub request: ExchangeRequest,
    pub outcome: ExchangeOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Exchange {
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    pub const fn status(&self) -> Option<u16> {
        match &self.outcome {
            ExchangeOutcome::Response(response) => Some(response.status),
            ExchangeOutcome::Failed { .. } => None,
        }
    }
}

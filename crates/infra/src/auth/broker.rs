//! OAuth2 client-credentials token broker
//!
//! Two exchange shapes, one per credential class:
//! - General: `Authorization: Basic base64(id:secret)` with body
//!   `grant_type=client_credentials`
//! - ClientOps: body `grant_type`, `client_id`, `client_secret`, no Basic
//!   header
//!
//! Both are form-encoded and bounded by the HTTP client timeout. Any
//! non-2xx status, non-JSON body or missing field is an auth failure
//! carrying the status and a redacted body excerpt. With an
//! [`AuditRecorder`] attached, each exchange is also written to the audit
//! artifact as `token_request:<class>`.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ciam_core::audit::redaction::redacted_excerpt;
use ciam_core::audit::AuditRecorder;
use ciam_core::auth::TokenExchanger;
use ciam_core::time::Clock;
use ciam_domain::constants::{FORM_CONTENT_TYPE, GRANT_TYPE_CLIENT_CREDENTIALS, JSON_CONTENT_TYPE};
use ciam_domain::{
    AuthFailure, CacheKey, CiamError, Credential, CredentialClass, Exchange, ExchangeOutcome,
    ExchangeRequest, ExchangeResponse, HttpMethod, ResponseBody, Result, Token,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::form_urlencoded;

use crate::api::ApiError;
use crate::config::Endpoints;
use crate::http::{header_pairs, HttpClient};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Value,
    #[serde(default)]
    token_type: Option<String>,
}

/// Token broker backed by the provider's token endpoints.
pub struct HttpTokenBroker {
    http: HttpClient,
    endpoints: Arc<Endpoints>,
    clock: Arc<dyn Clock>,
    audit: Option<AuditRecorder>,
}

impl HttpTokenBroker {
    pub fn new(http: HttpClient, endpoints: Arc<Endpoints>, clock: Arc<dyn Clock>) -> Self {
        Self { http, endpoints, clock, audit: None }
    }

    /// Record every token exchange (`token_request:<class>`) through `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditRecorder) -> Self {
        self.audit = Some(audit);
        self
    }

    fn parse(&self, credential: &Credential, status: StatusCode, body: &str) -> Result<Token> {
        let class = credential.class();
        if !status.is_success() {
            return Err(auth_failure(
                class,
                Some(status),
                format!("token endpoint returned {status}"),
                body,
            ));
        }

        let parsed: TokenResponse = serde_json::from_str(body).map_err(|err| {
            auth_failure(class, Some(status), format!("malformed token response: {err}"), body)
        })?;

        let expires_in = expires_in_secs(&parsed.expires_in).ok_or_else(|| {
            auth_failure(class, Some(status), "token response has an invalid expires_in".into(), body)
        })?;

        if parsed.access_token.trim().is_empty() {
            return Err(auth_failure(class, Some(status), "token response has an empty access_token".into(), body));
        }

        Ok(Token::new(
            parsed.access_token,
            parsed.token_type,
            self.clock.now() + Duration::seconds(expires_in),
            CacheKey::new(credential.target(), class),
        ))
    }

    fn record(
        &self,
        credential: &Credential,
        request: ExchangeRequest,
        outcome: ExchangeOutcome,
        started_at: DateTime<Utc>,
    ) {
        let Some(audit) = &self.audit else {
            return;
        };
        audit.record(&Exchange {
            operation: operation_name(credential.class()),
            attempt: 1,
            credential_class: credential.class(),
            params: None,
            request,
            outcome,
            started_at,
            finished_at: self.clock.now(),
        });
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenBroker {
    #[instrument(skip(self, credential), fields(target = %credential.target(), class = %credential.class()))]
    async fn acquire(&self, credential: &Credential) -> Result<Token> {
        let class = credential.class();
        let url = self.endpoints.token_url(credential.target(), class)?;
        let operation = operation_name(class);
        let (headers, form) = token_request_parts(credential);

        let mut builder = self.http.request(Method::POST, url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let builder = builder.body(form.clone());
        let exchange_request = ExchangeRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(Value::String(form)),
        };

        let started_at = self.clock.now();
        let response = match self.http.send(builder).await {
            Ok(response) => response,
            Err(err) => {
                warn!(operation = %operation, error = %err, "token exchange failed before a response");
                self.record(credential, exchange_request, failed_outcome(&err, self.http.timeout()), started_at);
                return Err(err);
            }
        };

        let status = response.status();
        let response_headers = header_pairs(response.headers());
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                let err = auth_failure(class, Some(status), format!("failed to read token response: {}", err.without_url()), "");
                self.record(credential, exchange_request, failed_outcome(&err, self.http.timeout()), started_at);
                return Err(err);
            }
        };

        let outcome = ExchangeOutcome::Response(ExchangeResponse {
            status: status.as_u16(),
            headers: response_headers,
            body: ResponseBody::from_text(body.clone()),
        });
        self.record(credential, exchange_request, outcome, started_at);

        match self.parse(credential, status, &body) {
            Ok(token) => {
                info!(operation = %operation, status = status.as_u16(), expires_at = %token.expires_at(), "token exchange completed");
                Ok(token)
            }
            Err(err) => {
                warn!(operation = %operation, status = status.as_u16(), error = %err, "token exchange rejected");
                Err(err)
            }
        }
    }
}

fn operation_name(class: CredentialClass) -> String {
    format!("token_request:{class}")
}

/// Headers and form body for one exchange.
///
/// General authenticates with a Basic header; ClientOps sends the pair in
/// the body.
fn token_request_parts(credential: &Credential) -> (Vec<(String, String)>, String) {
    let mut headers = vec![
        (ACCEPT.as_str().to_string(), JSON_CONTENT_TYPE.to_string()),
        (CONTENT_TYPE.as_str().to_string(), FORM_CONTENT_TYPE.to_string()),
    ];
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS);

    match credential.class() {
        CredentialClass::General => {
            let basic = STANDARD.encode(format!("{}:{}", credential.client_id(), credential.client_secret()));
            headers.push((AUTHORIZATION.as_str().to_string(), format!("Basic {basic}")));
        }
        CredentialClass::ClientOps => {
            form.append_pair("client_id", credential.client_id());
            form.append_pair("client_secret", credential.client_secret());
        }
    }
    (headers, form.finish())
}

fn failed_outcome(err: &CiamError, timeout: std::time::Duration) -> ExchangeOutcome {
    let err = ApiError::from_domain(err.clone(), timeout);
    ExchangeOutcome::Failed { kind: err.kind().to_string(), message: err.to_string() }
}

/// `expires_in` arrives as a JSON number or a numeric string.
fn expires_in_secs(value: &Value) -> Option<i64> {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64),
        _ => None,
    }?;
    (secs >= 0).then_some(secs)
}

fn auth_failure(class: CredentialClass, status: Option<StatusCode>, message: String, body: &str) -> CiamError {
    let excerpt = redacted_excerpt(body);
    CiamError::Auth(AuthFailure {
        class,
        status: status.map(|s| s.as_u16()),
        message,
        body_excerpt: (!excerpt.is_empty()).then_some(excerpt),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn expires_in_accepts_numbers_and_strings() {
        assert_eq!(expires_in_secs(&json!(3600)), Some(3600));
        assert_eq!(expires_in_secs(&json!("3600")), Some(3600));
        assert_eq!(expires_in_secs(&json!(3599.9)), Some(3599));
        assert_eq!(expires_in_secs(&json!("soon")), None);
        assert_eq!(expires_in_secs(&json!(-5)), None);
        assert_eq!(expires_in_secs(&Value::Null), None);
    }

    #[test]
    fn auth_failure_excerpt_is_redacted() {
        let err = auth_failure(
            CredentialClass::General,
            Some(StatusCode::BAD_REQUEST),
            "bad".into(),
            r#"{"error":"invalid_client","client_secret":"leaked"}"#,
        );
        let text = err.to_string();
        assert!(text.contains("HTTP 400"));
        assert!(text.contains("invalid_client"));
        assert!(!text.contains("leaked"));
    }
}

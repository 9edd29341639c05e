//! Authenticated request pipeline
//!
//! One `execute` call:
//! 1. resolves the base URL for the target
//! 2. checks the store-scope header can be satisfied (before any network call)
//! 3. obtains a token for the operation's credential class
//! 4. sends the request with bearer, content headers and optional store header
//! 5. on a 401, forces one token refresh and re-sends exactly once
//! 6. classifies the reply and audits every attempt, including failures

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ciam_core::audit::AuditRecorder;
use ciam_core::auth::TokenCache;
use ciam_core::time::Clock;
use ciam_domain::constants::STORE_HEADER;
use ciam_domain::{
    CacheKey, CallParams, Exchange, ExchangeOutcome, ExchangeRequest, ExchangeResponse, HttpMethod,
    Operation, ResponseBody, Target, Token,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::ApiError;
use crate::config::Endpoints;
use crate::http::{header_pairs, HttpClient};

/// Successful (2xx) reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Body as JSON; raw text becomes a JSON string, empty becomes null.
    pub fn json(&self) -> Value {
        self.body.to_value()
    }
}

struct PreparedRequest {
    method: HttpMethod,
    url: String,
    store_id: Option<String>,
}

/// Executes operations against the resource API.
pub struct RequestPipeline {
    http: HttpClient,
    endpoints: Arc<Endpoints>,
    tokens: Arc<TokenCache>,
    audit: AuditRecorder,
    clock: Arc<dyn Clock>,
}

impl RequestPipeline {
    pub fn new(
        http: HttpClient,
        endpoints: Arc<Endpoints>,
        tokens: Arc<TokenCache>,
        audit: AuditRecorder,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { http, endpoints, tokens, audit, clock }
    }

    pub const fn audit(&self) -> &AuditRecorder {
        &self.audit
    }

    /// Run one operation.
    ///
    /// # Errors
    ///
    /// - `Config` for an unmapped target, a missing store id or bad path
    ///   parameters (no network activity happens)
    /// - `Credential`/`Auth` when no token can be obtained
    /// - `Network`/`Timeout`/`Protocol` for transport failures
    /// - `Status` for non-2xx replies (after the single 401 retry)
    #[instrument(skip(self, operation, params), fields(operation = %operation.name, target = %target))]
    pub async fn execute(
        &self,
        operation: &Operation,
        target: Target,
        params: &CallParams,
    ) -> Result<ApiResponse, ApiError> {
        let started_at = self.clock.now();
        let prepared = match self.prepare(operation, target, params) {
            Ok(prepared) => prepared,
            Err(err) => {
                let url = operation.path.clone();
                self.record_failure(operation, params, 1, url, &err, started_at);
                return Err(err);
            }
        };

        let key = CacheKey::new(target, operation.credential_class);
        let token = match self.tokens.get_or_refresh(key).await {
            Ok(token) => token,
            Err(err) => {
                let err = ApiError::from_domain(err, self.http.timeout());
                self.record_failure(operation, params, 1, prepared.url.clone(), &err, started_at);
                return Err(err);
            }
        };

        let first = self.attempt(operation, params, &prepared, &token, 1).await;
        if !matches!(first, Err(ApiError::Status { status, .. }) if status == StatusCode::UNAUTHORIZED.as_u16()) {
            return first;
        }

        info!("resource API rejected the token; refreshing once");
        let retry_started = self.clock.now();
        let fresh = match self.tokens.refresh_rejected(key, &token).await {
            Ok(token) => token,
            Err(err) => {
                let err = ApiError::from_domain(err, self.http.timeout());
                self.record_failure(operation, params, 2, prepared.url.clone(), &err, retry_started);
                return Err(err);
            }
        };
        self.attempt(operation, params, &prepared, &fresh, 2).await
    }

    fn prepare(
        &self,
        operation: &Operation,
        target: Target,
        params: &CallParams,
    ) -> Result<PreparedRequest, ApiError> {
        let base = self
            .endpoints
            .api_base_url(target)
            .map_err(|err| ApiError::from_domain(err, self.http.timeout()))?;

        let store_id = if operation.requires_store_header {
            let store_id = params
                .store_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ApiError::Config(format!(
                        "operation '{}' requires a store id; pass --store-id or set a default with `ciam config use`",
                        operation.name
                    ))
                })?;
            Some(store_id.to_string())
        } else {
            None
        };

        let path = operation
            .render_path(&params.path_params)
            .map_err(|err| ApiError::from_domain(err, self.http.timeout()))?;

        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|err| ApiError::Config(format!("invalid request URL '{base}{path}': {err}")))?;
        if !params.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&params.query);
        }

        Ok(PreparedRequest { method: operation.method, url: url.to_string(), store_id })
    }

    async fn attempt(
        &self,
        operation: &Operation,
        params: &CallParams,
        prepared: &PreparedRequest,
        token: &Token,
        attempt: u32,
    ) -> Result<ApiResponse, ApiError> {
        let started_at = self.clock.now();

        let mut headers = vec![
            (AUTHORIZATION.as_str().to_string(), format!("Bearer {}", token.access_token())),
            (CONTENT_TYPE.as_str().to_string(), operation.content_type.clone()),
            (ACCEPT.as_str().to_string(), operation.accept.clone()),
        ];
        if let Some(store_id) = &prepared.store_id {
            headers.push((STORE_HEADER.to_string(), store_id.clone()));
        }

        let mut builder = self.http.request(to_reqwest_method(prepared.method), &prepared.url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &params.body {
            builder = builder.body(body.to_string());
        }

        debug!(attempt, method = %prepared.method, "sending API request");
        let (outcome, result) = match self.http.send(builder).await {
            Ok(response) => {
                let status = response.status().as_u16();
                let response_headers = header_pairs(response.headers());

                match response.text().await {
                    Ok(text) => {
                        let body = ResponseBody::from_text(text);
                        let result = if (200..300).contains(&status) {
                            Ok(ApiResponse { status, body: body.clone() })
                        } else {
                            Err(ApiError::from_status(status, &body.to_value()))
                        };
                        let outcome = ExchangeOutcome::Response(ExchangeResponse {
                            status,
                            headers: response_headers,
                            body,
                        });
                        (outcome, result)
                    }
                    Err(err) => {
                        let err = ApiError::Protocol(format!("failed to read response body: {}", err.without_url()));
                        (failed_outcome(&err), Err(err))
                    }
                }
            }
            Err(err) => {
                let err = ApiError::from_domain(err, self.http.timeout());
                (failed_outcome(&err), Err(err))
            }
        };

        match &result {
            Ok(response) => debug!(attempt, status = response.status, "API request succeeded"),
            Err(err) => warn!(attempt, kind = err.kind(), status = ?err.status(), "API request failed"),
        }

        self.audit.record(&Exchange {
            operation: operation.name.clone(),
            attempt,
            credential_class: operation.credential_class,
            params: params_echo(params),
            request: ExchangeRequest {
                method: prepared.method,
                url: prepared.url.clone(),
                headers,
                body: params.body.clone(),
            },
            outcome,
            started_at,
            finished_at: self.clock.now(),
        });

        result
    }

    fn record_failure(
        &self,
        operation: &Operation,
        params: &CallParams,
        attempt: u32,
        url: String,
        err: &ApiError,
        started_at: DateTime<Utc>,
    ) {
        self.audit.record(&Exchange {
            operation: operation.name.clone(),
            attempt,
            credential_class: operation.credential_class,
            params: params_echo(params),
            request: ExchangeRequest {
                method: operation.method,
                url,
                headers: Vec::new(),
                body: params.body.clone(),
            },
            outcome: failed_outcome(err),
            started_at,
            finished_at: self.clock.now(),
        });
    }
}

fn failed_outcome(err: &ApiError) -> ExchangeOutcome {
    ExchangeOutcome::Failed { kind: err.kind().to_string(), message: err.to_string() }
}

fn params_echo(params: &CallParams) -> Option<Value> {
    let mut echo = serde_json::Map::new();
    if let Some(store_id) = &params.store_id {
        echo.insert("store_id".into(), Value::String(store_id.clone()));
    }
    if !params.path_params.is_empty() {
        echo.insert(
            "path".into(),
            Value::Object(params.path_params.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()),
        );
    }
    if !params.query.is_empty() {
        echo.insert(
            "query".into(),
            Value::Object(params.query.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()),
        );
    }
    (!echo.is_empty()).then_some(Value::Object(echo))
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

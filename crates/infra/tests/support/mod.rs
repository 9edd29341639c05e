//! Shared fixtures for pipeline and broker integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use ciam_core::audit::{AuditRecorder, InMemoryAuditSink};
use ciam_core::auth::TokenCache;
use ciam_core::time::{Clock, SystemClock};
use ciam_domain::{AuditEntry, CredentialClass, Environment, Region, Target};
use ciam_infra::auth::{EnvCredentialStore, HttpTokenBroker};
use ciam_infra::config::Endpoints;
use ciam_infra::http::HttpClient;
use ciam_infra::RequestPipeline;
use wiremock::MockServer;

pub const TOKEN_PATH: &str = "/oauth/token";
pub const CLIENTOPS_TOKEN_PATH: &str = "/clientops/token";

pub const CLIENT_ID: &str = "abc123";
pub const CLIENT_SECRET: &str = "s3cr3t-value";

pub fn target() -> Target {
    Target::new(Region::Us, Environment::Qa)
}

/// Endpoints pointing every URL at the mock server.
pub fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints::standard()
        .with_api_base_url(server.uri())
        .with_token_url(format!("{}{TOKEN_PATH}", server.uri()))
        .with_clientops_token_url(format!("{}{CLIENTOPS_TOKEN_PATH}", server.uri()))
}

/// Both classes for [`target`], with the same fixed id/secret.
pub fn credentials() -> EnvCredentialStore {
    let schema = [(target(), CredentialClass::General), (target(), CredentialClass::ClientOps)];
    let general = CredentialClass::General.env_keys(&target());
    let clientops = CredentialClass::ClientOps.env_keys(&target());
    let lookup = move |name: &str| {
        if name == general.client_id || name == clientops.client_id {
            Some(CLIENT_ID.to_string())
        } else if name == general.client_secret || name == clientops.client_secret {
            Some(CLIENT_SECRET.to_string())
        } else {
            None
        }
    };
    EnvCredentialStore::require(&schema, &lookup).expect("test credentials are complete")
}

pub fn http() -> HttpClient {
    HttpClient::builder().no_proxy().build().expect("client builds")
}

pub fn broker(server: &MockServer) -> HttpTokenBroker {
    HttpTokenBroker::new(http(), Arc::new(endpoints(server)), Arc::new(SystemClock))
}

/// A fully wired pipeline plus the sink it records into.
pub struct Harness {
    pub pipeline: RequestPipeline,
    pub audit: InMemoryAuditSink,
    pub tokens: Arc<TokenCache>,
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with(endpoints(server), http())
}

/// Pipeline over explicit endpoints and client. The broker and the pipeline
/// share one audit sink.
pub fn harness_with(endpoints: Endpoints, http: HttpClient) -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let endpoints = Arc::new(endpoints);
    let audit = InMemoryAuditSink::new();
    let recorder = AuditRecorder::new(Arc::new(audit.clone()), false);
    let broker = HttpTokenBroker::new(http.clone(), Arc::clone(&endpoints), Arc::clone(&clock))
        .with_audit(recorder.clone());
    let tokens = Arc::new(TokenCache::new(Arc::new(credentials()), Arc::new(broker), Arc::clone(&clock)));
    let pipeline = RequestPipeline::new(http, endpoints, Arc::clone(&tokens), recorder, clock);
    Harness { pipeline, audit, tokens }
}

/// Audit entries for one operation, in call order.
pub fn entries_for(audit: &InMemoryAuditSink, operation: &str) -> Vec<AuditEntry> {
    audit.entries().into_iter().filter(|e| e.operation == operation).collect()
}

pub fn token_body(access_token: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "expires_in": 3600,
        "token_type": "Bearer",
    })
}

//! Exchange → audit entry projection

use ciam_domain::{
    AuditEntry, AuditError, AuditMeta, AuditRequest, AuditResponse, Exchange, ExchangeOutcome,
};

use super::redaction::{redact_headers, redact_payload, redact_url, redact_value};

/// Build the redacted audit entry for one exchange.
///
/// `verbose` only adds timing and parameter metadata; it never lifts
/// redaction.
pub fn project(exchange: &Exchange, verbose: bool) -> AuditEntry {
    let request = AuditRequest {
        method: exchange.request.method.to_string(),
        url: redact_url(&exchange.request.url),
        headers: redact_headers(&exchange.request.headers),
        body: exchange.request.body.as_ref().map(redact_payload),
    };

    let (response, error) = match &exchange.outcome {
        ExchangeOutcome::Response(response) => (
            Some(AuditResponse {
                status: response.status,
                headers: redact_headers(&response.headers),
                body: redact_payload(&response.body.to_value()),
            }),
            None,
        ),
        ExchangeOutcome::Failed { kind, message } => {
            (None, Some(AuditError { kind: kind.clone(), message: message.clone() }))
        }
    };

    let meta = verbose.then(|| AuditMeta {
        started_at: exchange.started_at,
        finished_at: exchange.finished_at,
        duration_ms: exchange.duration_ms(),
        attempt: exchange.attempt,
        credential_class: exchange.credential_class.to_string(),
        params: exchange.params.as_ref().map(redact_value),
    });

    AuditEntry {
        timestamp: exchange.started_at,
        operation: exchange.operation.clone(),
        request,
        response,
        error,
        meta,
    }
}

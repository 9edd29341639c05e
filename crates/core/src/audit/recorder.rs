//! Audit recorder: projects exchanges and appends them, never failing the call

use std::path::PathBuf;
use std::sync::Arc;

use ciam_domain::Exchange;
use tracing::warn;

use super::ports::AuditSink;
use super::projection::project;

/// Records pipeline exchanges to a sink.
///
/// Sink failures are reported through tracing and swallowed; they never
/// become the operation's error.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
    verbose: bool,
}

impl AuditRecorder {
    pub fn new(sink: Arc<dyn AuditSink>, verbose: bool) -> Self {
        Self { sink, verbose }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn record(&self, exchange: &Exchange) {
        let entry = project(exchange, self.verbose);
        if let Err(err) = self.sink.append(&entry) {
            warn!(operation = %exchange.operation, error = %err, "failed to write audit entry");
        }
    }

    /// Path of the artifact, once something was written.
    pub fn location(&self) -> Option<PathBuf> {
        self.sink.location()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ciam_domain::{
        AuditEntry, CiamError, CredentialClass, ExchangeOutcome, ExchangeRequest, HttpMethod,
        Result,
    };

    use super::*;
    use crate::audit::memory::InMemoryAuditSink;

    struct BrokenSink;

    impl AuditSink for BrokenSink {
        fn append(&self, _entry: &AuditEntry) -> Result<()> {
            Err(CiamError::Io("disk full".into()))
        }
    }

    fn failed_exchange() -> Exchange {
        let now = Utc::now();
        Exchange {
            operation: "users.list".into(),
            attempt: 1,
            credential_class: CredentialClass::General,
            params: None,
            request: ExchangeRequest {
                method: HttpMethod::Get,
                url: "https://api.test/users".into(),
                headers: vec![],
                body: None,
            },
            outcome: ExchangeOutcome::Failed { kind: "network".into(), message: "refused".into() },
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn sink_failures_are_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(BrokenSink), false);
        recorder.record(&failed_exchange());
        assert!(recorder.location().is_none());
    }

    #[test]
    fn records_failed_calls() {
        let sink = InMemoryAuditSink::new();
        let recorder = AuditRecorder::new(Arc::new(sink.clone()), false);
        recorder.record(&failed_exchange());
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].error.as_ref().map(|e| e.kind.as_str()), Some("network"));
        assert!(entries[0].response.is_none());
    }
}

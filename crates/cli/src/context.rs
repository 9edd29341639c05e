//! Application wiring
//!
//! [`AppContext`] holds what every command needs (home directory, the CLI
//! config and runtime settings). [`Session`] is built on demand by commands
//! that talk to the provider and owns the token cache for the process.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ciam_core::audit::AuditRecorder;
use ciam_core::auth::{CredentialSource, TokenCache};
use ciam_core::time::{Clock, SystemClock};
use ciam_domain::{CiamError, CliConfig, CredentialClass, Result, Target};
use ciam_infra::auth::{EnvCredentialStore, HttpTokenBroker};
use ciam_infra::config::{home_dir, process_env, ConfigStore, RuntimeSettings};
use ciam_infra::history::HistoryStore;
use ciam_infra::http::HttpClient;
use ciam_infra::{JsonlAuditSink, RequestPipeline};
use tracing::debug;

/// How strictly credentials are checked when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Fail before any command logic if a variable is missing.
    Eager,
    /// Report missing variables per class when they are used.
    Lenient,
}

pub struct AppContext {
    pub home: PathBuf,
    pub config_store: ConfigStore,
    pub config: CliConfig,
    pub settings: RuntimeSettings,
    pub verbose: bool,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    /// Read home, config file and runtime settings from the process environment.
    ///
    /// # Errors
    /// `CiamError::Config` for an unusable home directory or invalid settings.
    pub fn load(verbose: bool) -> Result<Self> {
        let home = home_dir(&process_env)?;
        let config_store = ConfigStore::in_home(&home);
        let config = config_store.load();
        let settings = RuntimeSettings::from_lookup(&process_env)?;
        debug!(home = %home.display(), ?config, "loaded CLI context");

        Ok(Self { home, config_store, config, settings, verbose, started_at: Utc::now() })
    }

    pub fn history(&self) -> HistoryStore {
        HistoryStore::in_home(&self.home)
    }

    /// Start a provider session for the configured target.
    ///
    /// # Errors
    /// `Config` without a configured target, `MissingCredential` under
    /// [`CredentialCheck::Eager`], or an HTTP client that cannot be built.
    pub fn session(&self, classes: &[CredentialClass], check: CredentialCheck) -> Result<Session> {
        let target = self.config.require_target()?;
        let schema: Vec<_> = classes.iter().map(|&class| (target, class)).collect();
        let credentials = Arc::new(match check {
            CredentialCheck::Eager => EnvCredentialStore::require(&schema, &process_env)?,
            CredentialCheck::Lenient => EnvCredentialStore::load(&schema, &process_env),
        });

        let http = HttpClient::builder()
            .timeout(self.settings.http_timeout)
            .accept_invalid_certs(self.settings.insecure_tls)
            .build()?;
        let endpoints = Arc::new(self.settings.endpoints.clone());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let sink = JsonlAuditSink::new(&self.settings.output_dir, self.started_at);
        let audit = AuditRecorder::new(Arc::new(sink), self.verbose);

        let broker = HttpTokenBroker::new(http.clone(), Arc::clone(&endpoints), Arc::clone(&clock));
        // The unmasked token view (lenient sessions) leaves no audit artifact.
        let broker = match check {
            CredentialCheck::Eager => broker.with_audit(audit.clone()),
            CredentialCheck::Lenient => broker,
        };
        let tokens = Arc::new(TokenCache::new(
            Arc::clone(&credentials) as Arc<dyn CredentialSource>,
            Arc::new(broker),
            Arc::clone(&clock),
        ));
        let pipeline = RequestPipeline::new(http, endpoints, Arc::clone(&tokens), audit, Arc::clone(&clock));

        Ok(Session { target, pipeline, tokens, credentials, clock })
    }

    /// Store id for store-scoped commands: explicit flag, then the default.
    ///
    /// # Errors
    /// `CiamError::Config` when neither is set.
    pub fn require_store_id(&self, explicit: Option<&str>) -> Result<String> {
        self.config.resolve_store_id(explicit).ok_or_else(|| {
            CiamError::Config(
                "Store ID is required. Provide --store-id or set a default with `ciam config use`".into(),
            )
        })
    }
}

/// Per-process provider session: one token cache, one audit artifact.
pub struct Session {
    pub target: Target,
    pub pipeline: RequestPipeline,
    pub tokens: Arc<TokenCache>,
    pub credentials: Arc<EnvCredentialStore>,
    pub clock: Arc<dyn Clock>,
}

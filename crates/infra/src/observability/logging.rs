//! Tracing initialisation for the CLI binary
//!
//! ## Environment Variables
//! - `CIAM_LOG`: filter directives (falls back to `RUST_LOG`)
//! - `CIAM_LOG_FORMAT`: `json` for structured output, anything else for text

use ciam_domain::constants::{ENV_LOG, ENV_LOG_FORMAT};
use tracing_subscriber::EnvFilter;

use crate::config::EnvLookup;

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        match lookup(ENV_LOG_FORMAT) {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Filter directives: explicit env first, else `warn` (`info` when verbose).
pub fn filter_directives(lookup: EnvLookup<'_>, verbose: bool) -> String {
    lookup(ENV_LOG)
        .or_else(|| lookup("RUST_LOG"))
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| if verbose { "info" } else { "warn" }.to_string())
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(lookup: EnvLookup<'_>, verbose: bool) {
    let filter = EnvFilter::try_new(filter_directives(lookup, verbose))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    // Subscriber already set elsewhere (e.g. integration tests); ignore.
    let _ = match LogFormat::from_lookup(lookup) {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Text => builder.with_target(false).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_warn_and_info_when_verbose() {
        let none = |_: &str| None;
        assert_eq!(filter_directives(&none, false), "warn");
        assert_eq!(filter_directives(&none, true), "info");
    }

    #[test]
    fn ciam_log_wins_over_rust_log() {
        let lookup = |name: &str| match name {
            "CIAM_LOG" => Some("ciam_infra=debug".to_string()),
            "RUST_LOG" => Some("trace".to_string()),
            _ => None,
        };
        assert_eq!(filter_directives(&lookup, false), "ciam_infra=debug");
    }

    #[test]
    fn json_format_is_opt_in() {
        let json = |name: &str| (name == "CIAM_LOG_FORMAT").then(|| "JSON".to_string());
        assert_eq!(LogFormat::from_lookup(&json), LogFormat::Json);
        assert_eq!(LogFormat::from_lookup(&|_: &str| None), LogFormat::Text);
    }
}

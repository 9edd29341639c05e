//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// Token lifecycle
/// Minimum remaining lifetime (seconds) for a cached token to be handed out.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// Request shaping
pub const STORE_HEADER: &str = "X-Store-Id";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const USER_AGENT: &str = concat!("ciam-cli/", env!("CARGO_PKG_VERSION"));

// Redaction
pub const REDACTED_PLACEHOLDER: &str = "***REDACTED***";
/// Field and header names (compared case-insensitively) whose values never
/// reach the audit artifact.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "client_secret",
    "access_token",
    "refresh_token",
    "id_token",
    "token",
    "password",
    "cookie",
    "set-cookie",
];
pub const BODY_EXCERPT_MAX_CHARS: usize = 256;

// Files
pub const CONFIG_FILE_NAME: &str = ".config-ciam-cli";
pub const HISTORY_FILE_NAME: &str = ".ciam-cli-history.jsonl";
pub const AUDIT_FILE_PREFIX: &str = "output-";
pub const AUDIT_FILE_EXTENSION: &str = "jsonl";
pub const HISTORY_MAX_LIST: usize = 100;

// Environment variable names
pub const ENV_HOME: &str = "CIAM_HOME";
pub const ENV_API_BASE_URL: &str = "CIAM_API_BASE_URL";
pub const ENV_TOKEN_URL: &str = "CIAM_TOKEN_URL";
pub const ENV_CLIENTOPS_TOKEN_URL: &str = "CIAM_CLIENTOPS_TOKEN_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "CIAM_HTTP_TIMEOUT_SECS";
pub const ENV_INSECURE_TLS: &str = "CIAM_INSECURE_TLS";
pub const ENV_OUTPUT_DIR: &str = "CIAM_OUTPUT_DIR";
pub const ENV_LOG: &str = "CIAM_LOG";
pub const ENV_LOG_FORMAT: &str = "CIAM_LOG_FORMAT";

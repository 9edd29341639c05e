//! Secret redaction by field name.
//!
//! A single pure transform over headers, JSON bodies, URLs and raw text.
//! Names are matched case-insensitively against
//! [`SENSITIVE_FIELDS`](ciam_domain::constants::SENSITIVE_FIELDS); matching
//! values are replaced with the fixed placeholder at any nesting depth.

use std::collections::BTreeMap;

use ciam_domain::constants::{BODY_EXCERPT_MAX_CHARS, REDACTED_PLACEHOLDER, SENSITIVE_FIELDS};
use serde_json::{Map, Value};
use url::Url;

pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE_FIELDS.iter().any(|field| field.eq_ignore_ascii_case(name.trim()))
}

pub fn redact_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive(name) { REDACTED_PLACEHOLDER.to_string() } else { value.clone() };
            (name.clone(), value)
        })
        .collect()
}

pub fn redact_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    let inner = if is_sensitive(key) {
                        Value::String(REDACTED_PLACEHOLDER.to_string())
                    } else {
                        redact_value(inner)
                    };
                    (key.clone(), inner)
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        other => other.clone(),
    }
}

/// Redact sensitive query parameters. Unparsable URLs are returned as-is.
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if url.query().is_none() {
        return raw.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_sensitive(&k) { REDACTED_PLACEHOLDER.to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

/// Redact a raw text body.
///
/// JSON and form-encoded text is redacted by field; anything else is kept.
pub fn redact_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        redact_value(&value).to_string()
    } else if looks_form_encoded(trimmed) {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(url::form_urlencoded::parse(trimmed.as_bytes()).map(|(k, v)| {
                let v = if is_sensitive(&k) { REDACTED_PLACEHOLDER.into() } else { v };
                (k, v)
            }))
            .finish()
    } else {
        raw.to_string()
    }
}

/// Redact an audit payload: structured JSON by field, JSON strings as raw
/// text bodies.
pub fn redact_payload(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(redact_text(text)),
        other => redact_value(other),
    }
}

/// Redacted, length-bounded rendition of a raw body for error messages.
pub fn redacted_excerpt(raw: &str) -> String {
    truncate_chars(redact_text(raw).trim(), BODY_EXCERPT_MAX_CHARS)
}

fn looks_form_encoded(text: &str) -> bool {
    !text.is_empty() && text.contains('=') && !text.contains(char::is_whitespace)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bearer_header_never_survives() {
        let headers = vec![
            ("Authorization".to_string(), "Bearer abc123".to_string()),
            ("X-Store-Id".to_string(), "store-1".to_string()),
        ];
        let redacted = redact_headers(&headers);
        assert_eq!(redacted["Authorization"], REDACTED_PLACEHOLDER);
        assert_eq!(redacted["X-Store-Id"], "store-1");
        assert!(!format!("{redacted:?}").contains("abc123"));
    }

    #[test]
    fn header_match_ignores_case() {
        assert!(is_sensitive("AUTHORIZATION"));
        assert!(is_sensitive("Set-Cookie"));
        assert!(!is_sensitive("tokens"));
        assert!(!is_sensitive("token_type"));
    }

    #[test]
    fn nested_body_fields_are_redacted() {
        let body = json!({
            "name": "svc",
            "credentials": {"client_secret": "s3cret", "client_id": "cid"},
            "items": [{"token": "t0k"}, {"Password": "pw"}],
            "access_token": {"nested": "object"}
        });
        let redacted = redact_value(&body);
        let text = redacted.to_string();
        for secret in ["s3cret", "t0k", "pw", "nested"] {
            assert!(!text.contains(secret), "{secret} leaked: {text}");
        }
        assert_eq!(redacted["name"], "svc");
        assert_eq!(redacted["credentials"]["client_id"], "cid");
    }

    #[test]
    fn query_parameters_are_redacted() {
        let url = redact_url("https://api.test/users?token=abc123&page=2");
        assert!(!url.contains("abc123"));
        assert!(url.contains("page=2"));
        assert_eq!(redact_url("not a url"), "not a url");
    }

    #[test]
    fn excerpt_redacts_json_and_form_bodies() {
        let json_excerpt = redacted_excerpt(r#"{"error":"invalid_client","client_secret":"xyz"}"#);
        assert!(json_excerpt.contains("invalid_client"));
        assert!(!json_excerpt.contains("xyz"));

        let form_excerpt = redacted_excerpt("grant_type=client_credentials&client_secret=xyz");
        assert!(!form_excerpt.contains("xyz"));
        assert!(form_excerpt.contains("grant_type=client_credentials"));
    }

    #[test]
    fn excerpt_is_bounded() {
        let long = "x".repeat(BODY_EXCERPT_MAX_CHARS * 2);
        let excerpt = redacted_excerpt(&long);
        assert_eq!(excerpt.chars().count(), BODY_EXCERPT_MAX_CHARS + 3);
    }

    #[test]
    fn text_payloads_are_redacted_by_field() {
        let form = redact_payload(&json!("access_token=leaked-abc&client_secret=leaked-s&scope=read"));
        let text = form.as_str().unwrap();
        assert!(!text.contains("leaked"), "{text}");
        assert!(text.contains("scope=read"));

        let plain = redact_payload(&json!("service unavailable"));
        assert_eq!(plain, json!("service unavailable"));

        let structured = redact_payload(&json!({"token": "t0k"}));
        assert_eq!(structured["token"], REDACTED_PLACEHOLDER);
    }
}

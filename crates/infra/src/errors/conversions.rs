//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use ciam_domain::CiamError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CiamError);

impl From<InfraError> for CiamError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CiamError> for InfraError {
    fn from(value: CiamError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCiamError {
    fn into_ciam(self) -> CiamError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CiamError */
/* -------------------------------------------------------------------------- */

impl IntoCiamError for HttpError {
    fn into_ciam(self) -> CiamError {
        let target = self.url().map(|u| format!("{}://{}{}", u.scheme(), u.host_str().unwrap_or(""), u.path()));
        let at = target.map(|t| format!(" ({t})")).unwrap_or_default();
        // Only the query-free origin above may reach a message.
        let err = self.without_url();

        if err.is_timeout() {
            return CiamError::Timeout(format!("HTTP request timed out{at}"));
        }

        if err.is_connect() {
            return CiamError::Network(format!("HTTP connection failure{at}"));
        }

        if err.is_builder() {
            return CiamError::Config(format!("invalid HTTP request{at}: {err}"));
        }

        if err.is_decode() || err.is_body() {
            return CiamError::Protocol(format!("malformed HTTP response{at}: {err}"));
        }

        CiamError::Network(err.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ciam())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → CiamError */
/* -------------------------------------------------------------------------- */

impl IntoCiamError for IoError {
    fn into_ciam(self) -> CiamError {
        CiamError::Io(self.to_string())
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_ciam())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CiamError */
/* -------------------------------------------------------------------------- */

impl IntoCiamError for JsonError {
    fn into_ciam(self) -> CiamError {
        CiamError::Serialization(format!("JSON error at line {}: {self}", self.line()))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_ciam())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

//! Process exit codes

use ciam_domain::CiamError;
use ciam_infra::{ApiError, ApiErrorCategory};

pub const CONFIG: u8 = 2;
pub const AUTH: u8 = 3;
pub const API: u8 = 4;
pub const OTHER: u8 = 1;

/// `2` config/credential, `3` auth, `4` api/network, `1` anything else.
pub fn code_for(err: &anyhow::Error) -> u8 {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return match api.category() {
            ApiErrorCategory::Config | ApiErrorCategory::Credential => CONFIG,
            ApiErrorCategory::Auth => AUTH,
            ApiErrorCategory::Network | ApiErrorCategory::Protocol | ApiErrorCategory::Status => API,
        };
    }
    match err.downcast_ref::<CiamError>() {
        Some(domain) if domain.is_configuration() => CONFIG,
        Some(CiamError::Auth(_)) => AUTH,
        Some(domain) if domain.is_transport() || matches!(domain, CiamError::Protocol(_)) => API,
        _ => OTHER,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ciam_domain::{AuthFailure, CredentialClass};
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_each_category() {
        let config = anyhow::Error::from(CiamError::Config("no target".into()));
        let missing = anyhow::Error::from(ApiError::Credential(CiamError::Config("x".into())));
        let auth = anyhow::Error::from(CiamError::Auth(AuthFailure {
            class: CredentialClass::General,
            status: Some(401),
            message: "rejected".into(),
            body_excerpt: None,
        }));
        let status = anyhow::Error::from(ApiError::Status { status: 404, body: json!({}) });
        let timeout = anyhow::Error::from(ApiError::Timeout(Duration::from_secs(10)));
        let other = anyhow::anyhow!("2 of 3 user lookup(s) failed");

        assert_eq!(code_for(&config), CONFIG);
        assert_eq!(code_for(&missing), CONFIG);
        assert_eq!(code_for(&auth), AUTH);
        assert_eq!(code_for(&status), API);
        assert_eq!(code_for(&timeout), API);
        assert_eq!(code_for(&other), OTHER);
    }
}

use std::time::Duration;

use ciam_domain::constants::{DEFAULT_HTTP_TIMEOUT_SECS, USER_AGENT};
use ciam_domain::CiamError;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// HTTP client with a bounded timeout and TLS verification on by default.
///
/// Requests are sent exactly once; retry policy belongs to callers.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, CiamError> {
        Self::builder().build()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, CiamError> {
        let request = builder.build().map_err(|err| CiamError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %redacted_origin(&url), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                let message = err.to_string().replace(url.as_str(), &redacted_origin(&url));
                debug!(%method, error = %message, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Response headers as owned name/value pairs, for audit exchanges.
pub fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), value.to_str().unwrap_or("<non-ascii>").to_string()))
        .collect()
}

fn redacted_origin(url: &reqwest::Url) -> String {
    format!("{}://{}{}", url.scheme(), url.host_str().unwrap_or(""), url.path())
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    accept_invalid_certs: bool,
    use_system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: Some(USER_AGENT.to_string()),
            default_headers: None,
            accept_invalid_certs: false,
            use_system_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Disable TLS certificate verification (self-signed test environments).
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Ignore `HTTP(S)_PROXY` settings.
    pub fn no_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    pub fn build(self) -> Result<HttpClient, CiamError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if self.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| CiamError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(timeout: Duration) -> HttpClient {
        HttpClient::builder().timeout(timeout).no_proxy().build().expect("http client")
    }

    #[tokio::test]
    async fn sends_exactly_once_even_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(Duration::from_secs(2));
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn applies_default_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(Duration::from_secs(2));
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(400)))
            .mount(&server)
            .await;

        let client = client(Duration::from_millis(50));
        let err = client.send(client.request(Method::GET, server.uri())).await.unwrap_err();
        assert!(matches!(err, CiamError::Timeout(_)), "{err:?}");
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}

//! HTTP client utilities and retry logic.
//!
//! [`ServiceClient`] is the base API client every resource binding talks
//! through. It owns the `reqwest` connection pool, credentials, URL building,
//! status mapping and retries for idempotent verbs.

use crate::config::{ApiKey, OnAppConfig};
use crate::query::QueryParams;
use crate::request::{ApiRequester, Payload};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

const USER_AGENT: &str = concat!("onapp-core/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
///
/// Only idempotent requests are ever retried, and only for transient
/// failures (see [`Error::is_retryable`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt-1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay = self.initial_delay.saturating_mul(multiplier);

        std::cmp::min(delay, self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Accept invalid TLS certificates (self-signed control panels)
    pub accept_invalid_certs: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            accept_invalid_certs: false,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Accept or reject invalid TLS certificates.
    #[must_use]
    pub const fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct BasicAuth {
    username: String,
    password: ApiKey,
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    http: ClientConfig,
    retry: RetryPolicy,
    user_agent: String,
    auth: Option<BasicAuth>,
}

impl ServiceClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL does not parse.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            http: ClientConfig::new().with_timeout(timeout),
            retry: RetryPolicy::new(),
            user_agent: USER_AGENT.to_string(),
            auth: None,
        })
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http = config;
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password: ApiKey::new(password),
        });
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let http = reqwest::Client::builder()
            .timeout(self.http.timeout)
            .pool_idle_timeout(self.http.pool_idle_timeout)
            .pool_max_idle_per_host(self.http.pool_max_idle_per_host)
            .danger_accept_invalid_certs(self.http.accept_invalid_certs)
            .gzip(self.http.enable_compression)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
            retry: self.retry,
            auth: self.auth,
        })
    }
}

/// Asynchronous base client for one control panel.
///
/// Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    auth: Option<BasicAuth>,
}

impl ServiceClient {
    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ServiceClientBuilder::new(base_url, Duration::from_secs(DEFAULT_TIMEOUT))?.build()
    }

    /// Construct a client from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL does not parse, or
    /// [`Error::ConfigError`] if only one of `username` and `api_key` is set.
    pub fn from_config(config: &OnAppConfig) -> Result<Self> {
        let mut builder = ServiceClientBuilder::new(&config.base_url, config.timeout())?
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries))
            .with_http_config(
                ClientConfig::new()
                    .with_timeout(config.timeout())
                    .with_accept_invalid_certs(!config.tls_verify),
            );

        match (&config.username, &config.api_key) {
            (Some(username), Some(api_key)) => {
                builder = builder.with_basic_auth(username.clone(), api_key.expose());
            }
            (None, None) => {}
            (Some(_), None) => {
                return Err(Error::ConfigError(
                    "username is set but api_key is missing".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(Error::ConfigError(
                    "api_key is set but username is missing".to_string(),
                ));
            }
        }

        builder.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolve `path` against the base URL, keeping any base path prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the joined URL is invalid.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request, mapping failures and retrying transient ones.
    ///
    /// `configure` adds headers and bodies; it runs once per attempt.
    /// `map_status` turns a non-success status and its body text into an error.
    ///
    /// # Errors
    ///
    /// Returns the mapped error of the final attempt.
    pub async fn execute_with_retry<C, M>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        configure: C,
        map_status: M,
    ) -> Result<Response>
    where
        C: Fn(RequestBuilder) -> RequestBuilder,
        M: Fn(StatusCode, String) -> Error,
    {
        let url = self.endpoint_url(path)?;
        let retries = if is_idempotent(&method) {
            self.retry.max_retries
        } else {
            0
        };

        let mut attempt = 0;
        loop {
            debug!(method = %method, url = %url, attempt, "sending request");

            let mut request = self.http.request(method.clone(), url.clone());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(auth) = &self.auth {
                request = request.basic_auth(&auth.username, Some(auth.password.expose()));
            }

            let outcome = match configure(request).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    map_status(status, body_or_read_error(response.text().await))
                }
                Err(err) => Error::from(err),
            };

            if attempt >= retries || !outcome.is_retryable() {
                return Err(outcome);
            }

            attempt += 1;
            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                method = %method,
                url = %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %outcome,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ApiRequester for ServiceClient {
    async fn request(&self, method: Method, path: &str, payload: Payload) -> Result<Value> {
        let query = match &payload {
            Payload::Query(params) => QueryParams::from_value(params).into_pairs(),
            Payload::None | Payload::Body(_) => Vec::new(),
        };
        let body = match &payload {
            Payload::Body(body) => Some(body),
            Payload::None | Payload::Query(_) => None,
        };

        let response = self
            .execute_with_retry(
                method,
                path,
                &query,
                |mut request| {
                    request = request.header("Accept", "application/json");
                    if let Some(payload) = body {
                        request = request.json(payload);
                    }
                    request
                },
                map_status_to_error,
            )
            .await?;

        let text = response.text().await?;
        trace!(path, bytes = text.len(), "received response");
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })
    }
}

fn body_or_read_error(body: reqwest::Result<String>) -> String {
    body.unwrap_or_else(|err| format!("<failed to read response body: {err}>"))
}

fn is_idempotent(method: &Method) -> bool {
    [
        Method::GET,
        Method::HEAD,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]
    .contains(method)
}

/// Map a non-success status and response text to an [`Error`].
#[must_use]
pub fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Unauthorized(format!("OnApp authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::UNPROCESSABLE_ENTITY => Error::ValidationError(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("OnApp temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServerError(format!("OnApp server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("OnApp error {status}: {text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new()
            .with_max_retries(2)
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
    }

    fn test_client(server: &MockServer, retry: RetryPolicy) -> ServiceClient {
        ServiceClientBuilder::new(server.uri(), Duration::from_secs(5))
            .unwrap()
            .with_retry_policy(retry)
            .build()
            .unwrap()
    }

    #[test]
    fn test_retry_policy_delay_calculation() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(0));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(4000));

        // Capped at max_delay
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(5000));
        assert_eq!(policy.delay_for_attempt(12), Duration::from_millis(5000));
    }

    #[test]
    fn test_retry_policy_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_retries, 0);
        assert!(!policy.has_retries());
        assert!(RetryPolicy::default().has_retries());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_accept_invalid_certs(true)
            .with_compression(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(config.accept_invalid_certs);
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = ServiceClient::new("https://cloud.example.com/onapp").unwrap();
        assert_eq!(client.base_url().as_str(), "https://cloud.example.com/onapp/");

        let url = client.endpoint_url("/virtual_machines/7.json").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.example.com/onapp/virtual_machines/7.json"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ServiceClient::new("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_config_carries_retries() {
        let config = OnAppConfig::new("https://cloud.example.com")
            .unwrap()
            .with_max_retries(7);
        let client = ServiceClient::from_config(&config).unwrap();
        assert_eq!(client.retry_policy().max_retries, 7);
    }

    #[test]
    fn test_from_config_rejects_half_credentials() {
        let base = OnAppConfig::new("https://cloud.example.com").unwrap();

        let mut config = base.clone();
        config.username = Some("admin".to_string());
        let err = ServiceClient::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("api_key")));

        let mut config = base.clone();
        config.api_key = Some(ApiKey::new("secret"));
        let err = ServiceClient::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("username")));

        assert!(ServiceClient::from_config(&base).is_ok());
    }

    #[test]
    fn test_unreadable_body_keeps_read_error() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let text = body_or_read_error(Err(err));
        assert!(text.starts_with("<failed to read response body: "));
        assert!(text.len() > "<failed to read response body: >".len());

        assert_eq!(body_or_read_error(Ok("gone".to_string())), "gone");
    }

    #[test]
    fn test_status_mapping() {
        let text = || "body".to_string();
        assert!(matches!(
            map_status_to_error(StatusCode::NOT_FOUND, text()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::BAD_REQUEST, text()),
            Error::BadRequest(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::FORBIDDEN, text()),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::UNPROCESSABLE_ENTITY, text()),
            Error::ValidationError(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::SERVICE_UNAVAILABLE, text()),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, text()),
            Error::ServerError(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::IM_A_TEAPOT, text()),
            Error::HttpError(_)
        ));
    }

    #[tokio::test]
    async fn request_sends_basic_auth_and_parses_json() {
        let server = MockServer::start().await;
        // admin:secret
        Mock::given(method("GET"))
            .and(path("/users.json"))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"user": {"id": 1}}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ServiceClientBuilder::new(server.uri(), Duration::from_secs(5))
            .unwrap()
            .with_basic_auth("admin", "secret")
            .build()
            .unwrap();

        let value = client
            .request(Method::GET, "/users.json", Payload::None)
            .await
            .unwrap();
        assert_eq!(value, json!([{"user": {"id": 1}}]));
    }

    #[tokio::test]
    async fn request_sends_body_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/things.json"))
            .and(body_json(json!({"thing": {"size": 3}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"thing": {"id": 9}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/things/9/move.json"))
            .and(query_param("thing[to]", "shelf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::no_retry());
        let created = client
            .request(
                Method::POST,
                "/things.json",
                Payload::Body(json!({"thing": {"size": 3}})),
            )
            .await
            .unwrap();
        assert_eq!(created["thing"]["id"], 9);

        client
            .request(
                Method::POST,
                "/things/9/move.json",
                Payload::Query(json!({"thing": {"to": "shelf"}})),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_body_parses_to_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/things/9.json"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::no_retry());
        let value = client
            .request(Method::DELETE, "/things/9.json", Payload::None)
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::no_retry());
        let err = client
            .request(Method::GET, "/broken.json", Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn idempotent_requests_retry_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky.json"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry());
        let value = client
            .request(Method::GET, "/flaky.json", Payload::None)
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn post_is_never_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/flaky.json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry());
        let err = client
            .request(Method::POST, "/flaky.json", Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.json"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry());
        let err = client
            .request(Method::GET, "/missing.json", Payload::None)
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotFound("missing".to_string()));
    }
}

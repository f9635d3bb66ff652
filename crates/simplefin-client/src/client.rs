//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use crate::access_url::AccessUrl;
use crate::api::{AccountsApi, AuthApi};
use crate::error::{Error, Result};
use crate::retry::{RetryConfig, send_with_retry};

/// Default timeout for a whole request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for establishing a connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long idle pooled connections are kept alive.
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Idle connections kept per host.
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 50;

/// SimpleFIN API client.
///
/// Cheap to clone; clones share one connection pool. The pool is released
/// when the last clone is dropped.
///
/// # Example
///
/// ```no_run
/// use simplefin_client::{AccountsQuery, SimplefinClient};
///
/// # async fn example() -> simplefin_client::Result<()> {
/// let client = SimplefinClient::new()?;
///
/// let access = client.auth().exchange("aHR0cHM6Ly9...").await?;
/// let set = client
///     .accounts()
///     .fetch(&access, &AccountsQuery::new().pending(true))
///     .await?;
/// println!("{} accounts", set.accounts.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SimplefinClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) retry: RetryConfig,
}

impl SimplefinClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Wrap an existing HTTP client, keeping the default retry policy.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                retry: RetryConfig::default(),
            }),
        }
    }

    /// Retry policy applied to the accounts fetch.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the setup-token exchange.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the accounts endpoint.
    pub fn accounts(&self) -> AccountsApi {
        AccountsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// POST with no body, sent exactly once.
    ///
    /// Claim URLs are single-use: a retry after the bridge redeemed the token
    /// would only earn a 403 and hide the first failure.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<reqwest::Response> {
        let response = self.inner.http.post(url.clone()).send().await?;

        tracing::debug!(host = ?url.host_str(), status = %response.status(), "POST");
        Ok(response)
    }

    /// GET expecting JSON, authenticated with the access URL's credentials.
    pub(crate) async fn get_json_authed(
        &self,
        url: Url,
        access: &AccessUrl,
    ) -> Result<reqwest::Response> {
        let http = &self.inner.http;
        let response = send_with_retry(&self.inner.retry, || {
            http.get(url.clone())
                .header(ACCEPT, HeaderValue::from_static("application/json"))
                .basic_auth(access.user(), Some(access.pass()))
                .send()
        })
        .await?;

        tracing::debug!(url = %url, status = %response.status(), "GET");
        Ok(response)
    }
}

/// Read the body as text, mapping the status with `endpoint` when not 200.
pub(crate) async fn body_if_ok(response: reqwest::Response, endpoint: &'static str) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status != reqwest::StatusCode::OK {
        return Err(Error::api(status, body, endpoint));
    }
    Ok(body)
}

/// Builder for creating a SimplefinClient.
#[derive(Debug)]
pub struct ClientBuilder {
    http: Option<reqwest::Client>,
    timeout: Duration,
    connect_timeout: Duration,
    pool_idle_timeout: Duration,
    pool_max_idle_per_host: usize,
    user_agent: Option<String>,
    retry: RetryConfig,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            http: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            user_agent: None,
            retry: RetryConfig::default(),
        }
    }

    /// Use a caller-supplied HTTP client.
    ///
    /// Timeout, pool and user-agent settings on this builder are ignored
    /// when a client is supplied; the retry policy still applies to the
    /// accounts fetch.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set how long idle connections stay pooled.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set the maximum idle connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the retry policy for the accounts fetch. The claim POST is never
    /// retried.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SimplefinClient> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".to_string()));
        }

        let http = match self.http {
            Some(http) => http,
            None => {
                let user_agent = self
                    .user_agent
                    .unwrap_or_else(|| format!("simplefin-client/{}", env!("CARGO_PKG_VERSION")));

                reqwest::Client::builder()
                    .user_agent(user_agent)
                    .timeout(self.timeout)
                    .connect_timeout(self.connect_timeout)
                    .pool_idle_timeout(self.pool_idle_timeout)
                    .pool_max_idle_per_host(self.pool_max_idle_per_host)
                    .build()?
            }
        };

        Ok(SimplefinClient {
            inner: Arc::new(ClientInner {
                http,
                retry: self.retry,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::new();
        assert!(builder.http.is_none());
        assert_eq!(builder.timeout, Duration::from_secs(60));
        assert_eq!(builder.connect_timeout, Duration::from_secs(5));
        assert_eq!(builder.pool_idle_timeout, Duration::from_secs(60));
        assert_eq!(builder.pool_max_idle_per_host, 50);
        assert_eq!(builder.retry.max_retries, 1);
    }

    #[test]
    fn test_build_default_client() {
        let client = SimplefinClient::new().unwrap();
        assert_eq!(client.retry_config().max_retries, 1);
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ClientBuilder::new().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_with_supplied_client() {
        let client = ClientBuilder::new()
            .http_client(reqwest::Client::new())
            .retry(RetryConfig::disabled())
            .build()
            .unwrap();
        assert_eq!(client.retry_config().max_retries, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let client = SimplefinClient::with_http_client(reqwest::Client::new());
        let other = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &other.inner));
    }
}

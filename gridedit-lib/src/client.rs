//! HTTP client for the persistence endpoint

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::{DEFAULT_ENDPOINT_PATH, GridConfig};
use crate::editor::CellChange;
use crate::error::ApiError;
use crate::persist::ChangeSink;
use crate::response::ApplyResponse;

/// Posts committed cell changes to the persistence endpoint.
///
/// Each change is sent as one form-encoded `POST` with the fields
/// `table_name`, `columnLabel`, `rowLabel` and `newValue`. Any 2xx answer is
/// a success; any other status or a transport failure is an [`ApiError`].
/// Nothing is retried.
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use gridedit_lib::ApplyClient;
///
/// let client = ApplyClient::builder()
///     .url("http://localhost:5000")
///     .build()?;
///
/// client.apply(&change).await?;
/// ```
#[derive(Clone)]
pub struct ApplyClient {
    inner: Arc<ApplyClientInner>,
}

struct ApplyClientInner {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ApplyClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ApplyClientBuilder<Missing> {
        ApplyClientBuilder::new()
    }

    /// Returns the full endpoint URL changes are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Posts one change and waits for the answer.
    pub async fn apply(&self, change: &CellChange) -> Result<ApplyResponse, ApiError> {
        let mut request = self
            .inner
            .http_client
            .post(self.inner.endpoint.clone())
            .form(change);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_success() {
            Ok(ApplyResponse::from_body(status.as_u16(), &body))
        } else {
            Err(ApiError::http(status.as_u16(), body))
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

#[async_trait]
impl ChangeSink for ApplyClient {
    async fn apply(&self, change: &CellChange) -> Result<ApplyResponse, ApiError> {
        ApplyClient::apply(self, change).await
    }
}

impl std::fmt::Debug for ApplyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ApplyClient`].
///
/// The base URL is required and enforced at compile time; it is parsed and
/// joined with the endpoint path in [`build`](ApplyClientBuilder::build).
///
/// # Example
///
/// ```ignore
/// let client = ApplyClient::builder()
///     .url("http://localhost:5000")
///     .endpoint_path("/apply_changes")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct ApplyClientBuilder<U> {
    url: U,
    endpoint_path: String,
    timeout: Option<Duration>,
}

impl ApplyClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout: None,
        }
    }

    /// Sets the base URL of the server hosting the endpoint.
    ///
    /// # Example
    ///
    /// ```ignore
    /// .url("http://localhost:5000")
    /// ```
    pub fn url(self, url: impl Into<String>) -> ApplyClientBuilder<Set<String>> {
        ApplyClientBuilder {
            url: Set(url.into()),
            endpoint_path: self.endpoint_path,
            timeout: self.timeout,
        }
    }
}

impl Default for ApplyClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ApplyClientBuilder<U> {
    /// Applies the endpoint path and request timeout from a [`GridConfig`].
    pub fn config(mut self, config: &GridConfig) -> Self {
        self.endpoint_path = config.endpoint_path.clone();
        self.timeout = config.request_timeout;
        self
    }

    /// Sets the endpoint path.
    ///
    /// Resolved under the base URL's path, with or without a leading `/`.
    /// Defaults to `/apply_changes`.
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl ApplyClientBuilder<Set<String>> {
    /// Builds the [`ApplyClient`].
    ///
    /// Fails if the base URL does not parse or cannot be joined with the
    /// endpoint path, or if the HTTP client cannot be created.
    pub fn build(self) -> Result<ApplyClient, ApiError> {
        let mut base = Url::parse(&self.url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(self.endpoint_path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.endpoint_path, e)))?;

        let http_client = Client::builder().build()?;

        Ok(ApplyClient {
            inner: Arc::new(ApplyClientInner {
                endpoint,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

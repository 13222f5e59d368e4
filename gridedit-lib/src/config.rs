//! Grid configuration

use std::time::Duration;

use crate::filter::FilterMode;

/// Default path of the persistence endpoint, relative to the base URL.
pub const DEFAULT_ENDPOINT_PATH: &str = "/apply_changes";

/// Configuration shared by the persistence client and the grid.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridedit_lib::GridConfig;
/// use gridedit_lib::filter::FilterMode;
///
/// let config = GridConfig::default()
///     .with_request_timeout(Duration::from_secs(10))
///     .with_filter_mode(FilterMode::Combined);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    /// Path the change form is posted to.
    ///
    /// Default: `/apply_changes`
    pub endpoint_path: String,

    /// Per-request timeout.
    ///
    /// Default: none (a request runs until the transport gives up)
    pub request_timeout: Option<Duration>,

    /// How filter controls combine.
    ///
    /// Default: [`FilterMode::Independent`]
    pub filter_mode: FilterMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            request_timeout: None,
            filter_mode: FilterMode::Independent,
        }
    }
}

impl GridConfig {
    /// Sets the endpoint path.
    pub fn with_endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the filter mode.
    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }
}

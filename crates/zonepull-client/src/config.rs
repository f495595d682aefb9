//! API client configuration.

use std::time::Duration;

use url::Url;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Endpoint URL the requests are POSTed to.
    pub url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// Whether to verify TLS certificates. On by default; legacy
    /// endpoints with broken chains need [`ApiConfig::with_insecure_tls`].
    pub verify_tls: bool,

    /// Whether to log the rendered request and raw reply text.
    pub debug: bool,

    /// User agent string.
    pub user_agent: String,
}

impl ApiConfig {
    /// Default timeout in milliseconds.
    pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

    /// Creates a configuration for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url.as_ref())?;
        Ok(Self {
            url: parsed,
            timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            verify_tls: true,
            debug: false,
            user_agent: format!("zonepull/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the request timeout in milliseconds.
    pub fn with_timeout_ms(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    /// Disables TLS certificate verification.
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Enables wire-text debug logging.
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the endpoint URL as a string.
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}

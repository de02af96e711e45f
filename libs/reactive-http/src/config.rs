use std::time::Duration;

/// Default User-Agent string sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("clean-reactive-http/", env!("CARGO_PKG_VERSION"));

/// Default response body limit (10 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Maximum body preview size for error messages (8KB).
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Transport security policy for outbound URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
    /// Both `http://` and `https://` URLs are accepted
    #[default]
    AllowInsecureHttp,
    /// Only `https://` URLs are accepted
    TlsOnly,
}

/// Configuration of an [`HttpService`](crate::HttpService)
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    /// Upper bound for one request, from dispatch until the response head arrives
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// User-Agent header added when the request carries none
    pub user_agent: String,
    /// Maximum decoded response body size
    pub max_body_size: usize,
    /// Capacity of the request buffer in front of the client
    pub buffer_capacity: usize,
    /// Which URL schemes are accepted
    pub transport: TransportSecurity,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            buffer_capacity: 1024,
            transport: TransportSecurity::AllowInsecureHttp,
        }
    }
}

impl HttpServiceConfig {
    /// Config that rejects plain `http://` URLs
    #[must_use]
    pub fn tls_only() -> Self {
        Self {
            transport: TransportSecurity::TlsOnly,
            ..Self::default()
        }
    }

    /// Same config with a different request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

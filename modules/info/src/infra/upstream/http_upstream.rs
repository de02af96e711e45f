use std::time::Duration;

use async_trait::async_trait;
use reactive_http::{HttpBuilder, HttpError, HttpService, HttpServiceConfig};
use tracing::instrument;

use crate::domain::upstream::UpstreamPort;

/// Fetches one fixed URL as text through [`HttpService`].
pub struct HttpUpstream {
    http: HttpService,
    url: String,
}

impl HttpUpstream {
    /// # Errors
    /// Fails when called outside a tokio runtime or when the TLS
    /// connector cannot be built
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let http = HttpService::new(HttpServiceConfig::default().with_timeout(timeout))?;
        Ok(Self::with_service(http, url))
    }

    #[must_use]
    pub fn with_service(http: HttpService, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UpstreamPort for HttpUpstream {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_text(&self) -> anyhow::Result<String> {
        let request = HttpBuilder::get(self.url.as_str());
        Ok(self.http.fetch::<String>(&request).await?)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn fetches_body_as_text() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("<html>page</html>");
        });

        let upstream = HttpUpstream::new(server.url("/page"), Duration::from_secs(5)).unwrap();
        assert_eq!(upstream.fetch_text().await.unwrap(), "<html>page</html>");
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(503).body("down");
        });

        let upstream = HttpUpstream::new(server.url("/page"), Duration::from_secs(5)).unwrap();
        let err = upstream.fetch_text().await.unwrap_err();
        let http_err = err.downcast_ref::<HttpError>().unwrap();
        assert_eq!(http_err.status(), Some(http::StatusCode::SERVICE_UNAVAILABLE));
    }
}

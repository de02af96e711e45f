use crate::error::HttpError;
use http::header::USER_AGENT;
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Adds a `User-Agent` header to requests that do not carry one
#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    value: HeaderValue,
}

impl UserAgentLayer {
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if `user_agent` is not a valid header value
    pub fn try_new(user_agent: impl AsRef<str>) -> Result<Self, HttpError> {
        Ok(Self {
            value: HeaderValue::from_str(user_agent.as_ref())?,
        })
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            value: self.value.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    value: HeaderValue,
}

impl<S, B> Service<Request<B>> for UserAgentService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.headers_mut()
            .entry(USER_AGENT)
            .or_insert_with(|| self.value.clone());
        self.inner.call(req)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::{ServiceExt, service_fn};

    async fn seen_user_agent(req: Request<()>) -> Result<Option<String>, Infallible> {
        Ok(req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned))
    }

    #[tokio::test]
    async fn test_adds_missing_user_agent() {
        let svc = UserAgentLayer::try_new("clean-reactive-http/test")
            .unwrap()
            .layer(service_fn(seen_user_agent));

        let req = Request::builder().uri("http://h/").body(()).unwrap();
        let seen = svc.oneshot(req).await.unwrap();
        assert_eq!(seen.as_deref(), Some("clean-reactive-http/test"));
    }

    #[tokio::test]
    async fn test_keeps_caller_user_agent() {
        let svc = UserAgentLayer::try_new("clean-reactive-http/test")
            .unwrap()
            .layer(service_fn(seen_user_agent));

        let req = Request::builder()
            .uri("http://h/")
            .header(USER_AGENT, "caller/2.0")
            .body(())
            .unwrap();
        let seen = svc.oneshot(req).await.unwrap();
        assert_eq!(seen.as_deref(), Some("caller/2.0"));
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(UserAgentLayer::try_new("bad\nagent").is_err());
    }
}

use crate::config::{HttpServiceConfig, TransportSecurity};
use crate::error::{HttpError, InvalidUriKind};
use crate::layers::UserAgentLayer;
use crate::request::HttpRequest;
use crate::response::{FromBody, ResponseBody, checked_body};
use crate::tls;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

/// Future type of the type-erased inner service
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Buffered service in front of the hyper client
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// Sends [`HttpRequest`]s and decodes their responses.
///
/// Request flow (outer to inner):
///   Buffer -> ErrorMapping -> Timeout -> `UserAgent` -> Decompression -> hyper client
///
/// Redirects are not followed: a 3xx surfaces as `HttpError::Redirection`.
/// There is no retry and no backoff.
///
/// `HttpService` is `Clone + Send + Sync`; clones share one buffer worker
/// and one connection pool.
///
/// Three call styles share the same send path:
/// - [`fetch`](Self::fetch) awaits the result,
/// - [`spawn_fetch`](Self::spawn_fetch) runs it as a task and hands back a `JoinHandle`,
/// - [`fetch_blocking`](Self::fetch_blocking) parks the calling thread until it completes.
#[derive(Clone)]
pub struct HttpService {
    service: BufferedService,
    max_body_size: usize,
    transport: TransportSecurity,
    runtime: Handle,
}

impl fmt::Debug for HttpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpService")
            .field("max_body_size", &self.max_body_size)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl HttpService {
    /// Build the service on the current tokio runtime.
    ///
    /// The runtime handle is kept so that [`spawn_fetch`](Self::spawn_fetch)
    /// and [`fetch_blocking`](Self::fetch_blocking) can reach it later.
    ///
    /// # Errors
    /// - `HttpError::NoRuntime` when called outside a tokio runtime
    /// - `HttpError::Tls` if the TLS connector cannot be initialized
    /// - `HttpError::InvalidHeaderValue` if the configured user agent is invalid
    pub fn new(config: HttpServiceConfig) -> Result<Self, HttpError> {
        let runtime = Handle::try_current().map_err(|_| HttpError::NoRuntime)?;

        if config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::debug!("plain http:// URLs are allowed for outbound requests");
        }

        let timeout = config.request_timeout;
        let https = tls::build_https_connector(config.transport, config.connect_timeout)?;

        // pool_timer is required for pool_idle_timeout to work
        let hyper_client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build::<_, Full<Bytes>>(https);

        let ua_layer = UserAgentLayer::try_new(config.user_agent)?;

        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(ua_layer)
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(map_decompression_response)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout))
            .boxed_clone();

        let service: BufferedService = Buffer::new(service, config.buffer_capacity.max(1));

        Ok(Self {
            service,
            max_body_size: config.max_body_size,
            transport: config.transport,
            runtime,
        })
    }

    /// Send `request` and decode the body into `T`.
    ///
    /// # Errors
    /// Returns `HttpError` for invalid URLs or headers, transport failures,
    /// timeouts, non-2xx statuses and bodies that do not decode into `T`.
    pub async fn fetch<T: FromBody>(&self, request: &HttpRequest) -> Result<T, HttpError> {
        let response = self.send(request).await?;
        let body = checked_body(response, self.max_body_size).await?;
        T::from_body(body)
    }

    /// Run [`fetch`](Self::fetch) as a task on the runtime the service was built on.
    #[must_use]
    pub fn spawn_fetch<T: FromBody>(
        &self,
        request: HttpRequest,
    ) -> JoinHandle<Result<T, HttpError>> {
        let this = self.clone();
        self.runtime
            .spawn(async move { this.fetch::<T>(&request).await })
    }

    /// Blocking form of [`fetch`](Self::fetch).
    ///
    /// Must be called from a thread outside the runtime, and the runtime must
    /// be multi-threaded so its workers keep driving IO meanwhile.
    ///
    /// # Errors
    /// Returns `HttpError::BlockingInAsyncContext` when called from async code,
    /// otherwise the same errors as [`fetch`](Self::fetch).
    pub fn fetch_blocking<T: FromBody>(&self, request: &HttpRequest) -> Result<T, HttpError> {
        if Handle::try_current().is_ok() {
            return Err(HttpError::BlockingInAsyncContext);
        }
        self.runtime.block_on(self.fetch(request))
    }

    async fn send(&self, request: &HttpRequest) -> Result<Response<ResponseBody>, HttpError> {
        let uri = validate_url(request.url(), self.transport)?;
        let http_request = request.to_http_request(uri)?;

        match request.request_body() {
            Some(body) => tracing::info!(
                method = %request.method(),
                url = %request.url(),
                body = %body,
                "sending request"
            ),
            None => tracing::info!(
                method = %request.method(),
                url = %request.url(),
                "sending request"
            ),
        }

        let mut service = self.service.clone();
        try_acquire_buffer_slot(&mut service).await?;
        service.call(http_request).await.map_err(map_buffer_error)
    }
}

/// Parse `url` and check its scheme against the transport policy
fn validate_url(url: &str, transport: TransportSecurity) -> Result<http::Uri, HttpError> {
    let uri: http::Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::ParseError,
            reason: e.to_string(),
        })?;

    if uri.authority().is_none() {
        return Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingAuthority,
            reason: "missing host/authority".to_owned(),
        });
    }

    match (uri.scheme_str(), transport) {
        (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
        (Some("http"), TransportSecurity::TlsOnly) => Err(HttpError::InvalidScheme {
            scheme: "http".to_owned(),
            reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
        }),
        (Some(scheme), _) => Err(HttpError::InvalidScheme {
            scheme: scheme.to_owned(),
            reason: "only http:// and https:// schemes are supported".to_owned(),
        }),
        (None, _) => Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingScheme,
            reason: "missing scheme".to_owned(),
        }),
    }
}

fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(other) => HttpError::Transport(other),
    }
}

fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(
                error = %err,
                "buffer worker closed unexpectedly; service unavailable"
            );
            HttpError::ServiceClosed
        }
    }
}

/// Fail fast with `HttpError::Overloaded` when the buffer has no free slot.
async fn try_acquire_buffer_slot(service: &mut BufferedService) -> Result<(), HttpError> {
    use std::task::Poll;

    let poll_result = std::future::poll_fn(|cx| match service.poll_ready(cx) {
        Poll::Ready(result) => Poll::Ready(Some(result)),
        Poll::Pending => Poll::Ready(None),
    })
    .await;

    match poll_result {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(map_buffer_error(e)),
        None => Err(HttpError::Overloaded),
    }
}

fn map_decompression_response<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    let boxed_body: ResponseBody = body.map_err(Into::into).boxed();
    Response::from_parts(parts, boxed_body)
}

use crate::config::ERROR_BODY_PREVIEW_LIMIT;
use crate::error::HttpError;
use bytes::Bytes;
use http::Response;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

/// Type alias for the boxed response body that supports decompression.
///
/// This type can hold either a raw body or a decompressed body (gzip/br/deflate).
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Target shape of a decoded response body.
///
/// `String` and `Bytes` receive the body as-is; [`Json<T>`] deserializes it.
pub trait FromBody: Sized + Send + 'static {
    /// Decode a fully read, successful response body
    ///
    /// # Errors
    /// Returns an error if the bytes do not match the target shape
    fn from_body(body: Bytes) -> Result<Self, HttpError>;
}

impl FromBody for String {
    fn from_body(body: Bytes) -> Result<Self, HttpError> {
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl FromBody for Bytes {
    fn from_body(body: Bytes) -> Result<Self, HttpError> {
        Ok(body)
    }
}

impl FromBody for () {
    fn from_body(_body: Bytes) -> Result<Self, HttpError> {
        Ok(())
    }
}

/// JSON-decoded response body. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + Send + 'static> FromBody for Json<T> {
    fn from_body(body: Bytes) -> Result<Self, HttpError> {
        Ok(Json(serde_json::from_slice(&body)?))
    }
}

/// Check the status and read the body within `max_body_size`.
///
/// 3xx turns into `HttpError::Redirection`; 4xx and 5xx into
/// `HttpError::HttpStatus` with a bounded preview of the error body.
pub async fn checked_body(
    response: Response<ResponseBody>,
    max_body_size: usize,
) -> Result<Bytes, HttpError> {
    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        return Err(HttpError::Redirection { status, location });
    }

    if status.is_client_error() || status.is_server_error() {
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        // BodyTooLarge must not hide the status error
        let preview_limit = max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let body_preview = match read_body_limited(response, preview_limit).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };

        return Err(HttpError::HttpStatus {
            status,
            body_preview,
            content_type,
        });
    }

    read_body_limited(response, max_body_size).await
}

/// Read the (possibly decompressed) body, enforcing the byte limit on
/// decoded data.
pub async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let (_parts, body) = response.into_parts();

    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}

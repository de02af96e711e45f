use crate::error::HttpError;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HeaderName, HeaderValue};
use http::{Method, Request, Uri};
use http_body_util::Full;
use mime::Mime;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Request payload.
///
/// The wire encoding is picked at send time from the request media type.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent verbatim regardless of media type
    Text(String),
    /// Serialized as JSON, or URL-encoded when the media type is a form
    Json(Value),
    /// Ordered form fields
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Build a JSON body from any serializable value.
    ///
    /// Object members that serialize to `null` (unset `Option` fields) are
    /// left out, at every depth. Array elements are kept as-is. Use
    /// `RequestBody::from(Value)` to send a value verbatim.
    ///
    /// # Errors
    /// Returns `HttpError::Json` if the value cannot be represented as JSON
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HttpError> {
        let mut value = serde_json::to_value(value)?;
        drop_null_members(&mut value);
        Ok(Self::Json(value))
    }

    /// Build a form body from key/value pairs
    #[must_use]
    pub fn form<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Encode the body for the given media type
    ///
    /// # Errors
    /// Returns `HttpError::Json` or `HttpError::FormEncode` when the value has
    /// no representation in the requested encoding.
    pub fn encode(&self, media_type: &Mime) -> Result<Bytes, HttpError> {
        let as_form = is_form(media_type);
        match self {
            Self::Text(text) => Ok(Bytes::from(text.clone())),
            Self::Json(value) if as_form => encode_value_as_form(value),
            Self::Json(value) => Ok(Bytes::from(serde_json::to_vec(value)?)),
            Self::Form(fields) if as_form => Ok(Bytes::from(serde_urlencoded::to_string(fields)?)),
            Self::Form(fields) => {
                let object: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                Ok(Bytes::from(serde_json::to_vec(&object)?))
            }
        }
    }
}

fn drop_null_members(value: &mut Value) {
    match value {
        Value::Object(members) => {
            members.retain(|_, member| !member.is_null());
            members.values_mut().for_each(drop_null_members);
        }
        Value::Array(items) => items.iter_mut().for_each(drop_null_members),
        _ => {}
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl fmt::Display for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Json(value) => write!(f, "{value}"),
            Self::Form(fields) => {
                let mut first = true;
                for (k, v) in fields {
                    if !first {
                        f.write_str("&")?;
                    }
                    first = false;
                    write!(f, "{k}={v}")?;
                }
                Ok(())
            }
        }
    }
}

fn is_form(media_type: &Mime) -> bool {
    media_type.type_() == mime::APPLICATION && media_type.subtype() == mime::WWW_FORM_URLENCODED
}

/// Objects become `key=value` pairs with scalars stringified; nested values
/// are written as compact JSON. Anything that is not an object is rejected
/// by the form serializer.
fn encode_value_as_form(value: &Value) -> Result<Bytes, HttpError> {
    let Value::Object(map) = value else {
        return Ok(Bytes::from(serde_urlencoded::to_string(value)?));
    };
    let pairs: Vec<(&str, String)> = map
        .iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.as_str(), v)
        })
        .collect();
    Ok(Bytes::from(serde_urlencoded::to_string(pairs)?))
}

/// A fully described outbound request.
///
/// Built by [`HttpBuilder`](crate::HttpBuilder) and refined with the chainable
/// setters below; the media type defaults to `application/json`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    url: String,
    method: Method,
    body: Option<RequestBody>,
    media_type: Mime,
    headers: Option<BTreeMap<String, String>>,
    cookies: Option<BTreeMap<String, String>>,
}

impl HttpRequest {
    /// Create a request with no body, headers or cookies
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            media_type: mime::APPLICATION_JSON,
            headers: None,
            cookies: None,
        }
    }

    /// Replace the body
    #[must_use]
    pub fn body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn json_media_content(self) -> Self {
        self.custom_content(mime::APPLICATION_JSON)
    }

    #[must_use]
    pub fn form_url_media_content(self) -> Self {
        self.custom_content(mime::APPLICATION_WWW_FORM_URLENCODED)
    }

    #[must_use]
    pub fn custom_content(mut self, media_type: Mime) -> Self {
        self.media_type = media_type;
        self
    }

    /// Replace all headers; `None` clears them
    #[must_use]
    pub fn headers(mut self, headers: Option<BTreeMap<String, String>>) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace all cookies; `None` clears them
    #[must_use]
    pub fn cookies(mut self, cookies: Option<BTreeMap<String, String>>) -> Self {
        self.cookies = cookies;
        self
    }

    #[must_use]
    pub fn add_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn media_type(&self) -> &Mime {
        &self.media_type
    }

    #[must_use]
    pub fn header_map(&self) -> Option<&BTreeMap<String, String>> {
        self.headers.as_ref()
    }

    #[must_use]
    pub fn cookie_map(&self) -> Option<&BTreeMap<String, String>> {
        self.cookies.as_ref()
    }

    /// All cookies joined into one `Cookie` header value, `None` when empty
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookies.as_ref().filter(|c| !c.is_empty())?;
        let joined = cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }

    /// Convert into a hyper request aimed at an already validated URI.
    ///
    /// `Content-Type` follows the media type unless a custom header overrides it.
    ///
    /// # Errors
    /// Returns header or body encoding errors.
    pub fn to_http_request(&self, uri: Uri) -> Result<Request<Full<Bytes>>, HttpError> {
        let mut builder = Request::builder().method(self.method.clone()).uri(uri);

        let custom_headers = self.headers.iter().flatten();
        let has_content_type = self
            .headers
            .iter()
            .flatten()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        if !has_content_type {
            builder = builder.header(CONTENT_TYPE, self.media_type.as_ref());
        }

        for (name, value) in custom_headers {
            let name = HeaderName::try_from(name.as_str())?;
            let value = HeaderValue::try_from(value.as_str())?;
            builder = builder.header(name, value);
        }

        if let Some(cookie) = self.cookie_header() {
            builder = builder.header(COOKIE, HeaderValue::try_from(cookie)?);
        }

        let body = match &self.body {
            Some(body) => body.encode(&self.media_type)?,
            None => Bytes::new(),
        };

        Ok(builder.body(Full::new(body))?)
    }
}

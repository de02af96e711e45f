use crate::error::HttpError;
use crate::request::{HttpRequest, RequestBody};
use http::Method;

/// Factory for [`HttpRequest`]s.
///
/// An instance is bound to a base URI and resolves relative paths against it;
/// the associated functions build requests from absolute URLs.
///
/// ```ignore
/// let api = HttpBuilder::create("http://localhost:8080/");
/// let req = api.get_with_path("/infos").add_header("X-Trace", "1");
/// let infos: Json<Vec<Info>> = service.fetch(&req).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBuilder {
    base_uri: String,
}

impl HttpBuilder {
    #[must_use]
    pub fn create(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Join `base` and `path` with exactly one slash between them.
    #[must_use]
    pub fn build_url(base: &str, path: &str) -> String {
        match (base.ends_with('/'), path.starts_with('/')) {
            (true, true) => format!("{base}{}", &path[1..]),
            (false, false) => format!("{base}/{path}"),
            _ => format!("{base}{path}"),
        }
    }

    #[must_use]
    pub fn get_with_path(&self, path: &str) -> HttpRequest {
        Self::get(Self::build_url(&self.base_uri, path))
    }

    #[must_use]
    pub fn post_with_path(&self, path: &str, body: Option<RequestBody>) -> HttpRequest {
        Self::post(Self::build_url(&self.base_uri, path), body)
    }

    #[must_use]
    pub fn delete_with_path(&self, path: &str) -> HttpRequest {
        Self::delete(Self::build_url(&self.base_uri, path))
    }

    #[must_use]
    pub fn put_with_path(&self, path: &str, body: Option<RequestBody>) -> HttpRequest {
        Self::put(Self::build_url(&self.base_uri, path), body)
    }

    /// Relative-path form of [`HttpBuilder::from`].
    ///
    /// # Errors
    /// Returns `HttpError::UnknownMethod` for verbs other than get/post/delete/put
    pub fn from_with_path(
        &self,
        method: &str,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<HttpRequest, HttpError> {
        Self::from(method, Self::build_url(&self.base_uri, path), body)
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> HttpRequest {
        HttpRequest::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>, body: Option<RequestBody>) -> HttpRequest {
        HttpRequest::new(Method::POST, url).body(body)
    }

    #[must_use]
    pub fn delete(url: impl Into<String>) -> HttpRequest {
        HttpRequest::new(Method::DELETE, url)
    }

    #[must_use]
    pub fn put(url: impl Into<String>, body: Option<RequestBody>) -> HttpRequest {
        HttpRequest::new(Method::PUT, url).body(body)
    }

    /// Build a request from a verb name, matched case-insensitively.
    ///
    /// The body is dropped for `get` and `delete`.
    ///
    /// # Errors
    /// Returns `HttpError::UnknownMethod` carrying the verb as given
    pub fn from(
        method: &str,
        url: impl Into<String>,
        body: Option<RequestBody>,
    ) -> Result<HttpRequest, HttpError> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::get(url)),
            "post" => Ok(Self::post(url, body)),
            "delete" => Ok(Self::delete(url)),
            "put" => Ok(Self::put(url, body)),
            _ => Err(HttpError::UnknownMethod(method.to_owned())),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_with_single_slash() {
        assert_eq!(HttpBuilder::build_url("http://h/", "/p"), "http://h/p");
        assert_eq!(HttpBuilder::build_url("http://h", "p"), "http://h/p");
        assert_eq!(HttpBuilder::build_url("http://h/", "p"), "http://h/p");
        assert_eq!(HttpBuilder::build_url("http://h", "/p"), "http://h/p");
    }

    #[test]
    fn test_build_url_empty_path() {
        assert_eq!(HttpBuilder::build_url("http://h", ""), "http://h/");
        assert_eq!(HttpBuilder::build_url("http://h/", ""), "http://h/");
    }

    #[test]
    fn test_with_path_methods() {
        let builder = HttpBuilder::create("http://localhost:8080/");

        let req = builder.get_with_path("/infos");
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.url(), "http://localhost:8080/infos");

        let req = builder.post_with_path("infos", Some("x".into()));
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.request_body(), Some(&RequestBody::from("x")));

        let req = builder.put_with_path("/infos/1", None);
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.url(), "http://localhost:8080/infos/1");

        let req = builder.delete_with_path("/infos/1");
        assert_eq!(req.method(), Method::DELETE);
    }

    #[test]
    fn test_from_is_case_insensitive() {
        for verb in ["get", "GET", "Get"] {
            let req = HttpBuilder::from(verb, "http://h/x", None).unwrap();
            assert_eq!(req.method(), Method::GET);
        }
        let req = HttpBuilder::from("pUt", "http://h/x", Some("b".into())).unwrap();
        assert_eq!(req.method(), Method::PUT);
        assert!(req.request_body().is_some());
    }

    #[test]
    fn test_from_drops_body_for_get_and_delete() {
        let req = HttpBuilder::from("get", "http://h/x", Some("b".into())).unwrap();
        assert!(req.request_body().is_none());
        let req = HttpBuilder::from("DELETE", "http://h/x", Some("b".into())).unwrap();
        assert!(req.request_body().is_none());
    }

    #[test]
    fn test_from_unknown_method() {
        let err = HttpBuilder::from("PATCH", "http://h/x", None).unwrap_err();
        assert!(matches!(err, HttpError::UnknownMethod(ref m) if m == "PATCH"));
    }

    #[test]
    fn test_from_with_path() {
        let builder = HttpBuilder::create("http://h");
        let req = builder.from_with_path("post", "items", None).unwrap();
        assert_eq!(req.url(), "http://h/items");
        assert!(builder.from_with_path("head", "items", None).is_err());
    }
}

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound HTTP for clean-reactive.
//!
//! [`HttpBuilder`] describes requests (method, URL, body, media type, headers,
//! cookies) and [`HttpService`] sends them through a hyper client behind a
//! small tower stack:
//! - rustls TLS with webpki roots (plain `http://` allowed unless `TlsOnly`)
//! - connection pooling
//! - per-request timeout
//! - User-Agent header injection
//! - transparent response decompression (gzip, brotli, deflate)
//!
//! Responses with a 3xx, 4xx or 5xx status become errors; 2xx bodies decode
//! into any [`FromBody`] target: `String`, `Bytes` or [`Json<T>`].
//!
//! # Example
//!
//! ```ignore
//! use reactive_http::{HttpBuilder, HttpService, HttpServiceConfig, Json};
//!
//! let service = HttpService::new(HttpServiceConfig::default())?;
//! let api = HttpBuilder::create("https://example.com/api");
//!
//! let text: String = service.fetch(&api.get_with_path("/status")).await?;
//! let Json(items): Json<Vec<Item>> = service.fetch(&api.get_with_path("items")).await?;
//! ```

mod builder;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod service;
mod tls;

pub use builder::HttpBuilder;
pub use config::{
    DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, ERROR_BODY_PREVIEW_LIMIT, HttpServiceConfig,
    TransportSecurity,
};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{UserAgentLayer, UserAgentService};
pub use mime::{self, Mime};
pub use request::{HttpRequest, RequestBody};
pub use response::{FromBody, Json, ResponseBody};
pub use service::HttpService;

//! Transport abstraction used by the service client.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Method, Url};
use serde_json::Value;
use thiserror::Error;

/// A single request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, query string included.
    pub url: Url,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Builds a request without a body.
    #[must_use]
    pub const fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw reply returned by a [`Transport`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Errors raised by a transport before a status code is available.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    /// Human readable description of the failure.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error from any displayable failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Future returned by transport operations.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + 'a>>;

/// Authenticated request dispatch against the Block Storage service.
///
/// Implementations own authentication, connection pooling and any retry
/// policy; the client above them issues exactly one dispatch per call.
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw reply.
    fn dispatch(&self, request: ApiRequest) -> TransportFuture<'_>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn dispatch(&self, request: ApiRequest) -> TransportFuture<'_> {
        (**self).dispatch(request)
    }
}

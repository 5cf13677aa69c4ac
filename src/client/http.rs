//! `reqwest`-backed transport.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

use super::transport::{ApiRequest, RawResponse, Transport, TransportError, TransportFuture};
use crate::config::{BlockStorageConfig, ConfigError};

// Header names must be lowercase for `HeaderName::from_static`.
const AUTH_TOKEN_HEADER: &str = "x-auth-token";
const API_VERSION_HEADER: &str = "openstack-api-version";
const USER_AGENT: &str = concat!("cinder-volumes/", env!("CARGO_PKG_VERSION"));

/// Transport that sends requests over HTTP with a pre-issued token.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with the given token, optional microversion and
    /// per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the token or microversion cannot
    /// be used as a header value, or when the HTTP client cannot be built.
    pub fn new(
        auth_token: &str,
        api_version: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(auth_token.trim())
            .map_err(|err| ConfigError::Parse(format!("auth_token: {err}")))?;
        token.set_sensitive(true);
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(version) = api_version {
            let value = HeaderValue::from_str(&format!("volume {}", version.trim()))
                .map_err(|err| ConfigError::Parse(format!("volume_api_version: {err}")))?;
            headers.insert(HeaderName::from_static(API_VERSION_HEADER), value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::Parse(err.to_string()))?;
        Ok(Self { client })
    }

    /// Builds a transport from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or headers are invalid.
    pub fn from_config(config: &BlockStorageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            &config.auth_token,
            config.volume_api_version.as_deref(),
            config.request_timeout(),
        )
    }
}

impl Transport for HttpTransport {
    fn dispatch(&self, request: ApiRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, request.url);
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|err| TransportError::new(err.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|err| TransportError::new(err.to_string()))?;
            Ok(RawResponse::new(status, body.to_vec()))
        })
    }
}

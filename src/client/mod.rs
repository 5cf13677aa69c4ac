//! Service client wrapping a transport and the Block Storage endpoint.

mod http;
mod transport;

use reqwest::{Method, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::BlockStorageConfig;
use crate::error::VolumeError;

pub use http::HttpTransport;
pub use transport::{ApiRequest, RawResponse, Transport, TransportError, TransportFuture};

/// Client bound to one Block Storage endpoint.
///
/// The client holds no per-call state and may be shared between tasks.
#[derive(Clone, Debug)]
pub struct ServiceClient<T> {
    transport: T,
    endpoint: Url,
}

impl ServiceClient<HttpTransport> {
    /// Builds an HTTP-backed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Config`] when the configuration is invalid.
    pub fn from_config(config: &BlockStorageConfig) -> Result<Self, VolumeError> {
        let transport = HttpTransport::from_config(config)?;
        let endpoint = config.endpoint()?;
        Ok(Self::new(transport, endpoint))
    }
}

impl<T: Transport> ServiceClient<T> {
    /// Creates a client for the given endpoint.
    #[must_use]
    pub const fn new(transport: T, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Appends path segments to the endpoint, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidUrl`] when the endpoint cannot carry a
    /// path (for example a `data:` URL).
    pub fn service_url(&self, segments: &[&str]) -> Result<Url, VolumeError> {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        {
            let mut path = url.path_segments_mut().map_err(|()| VolumeError::InvalidUrl {
                url: self.endpoint.to_string(),
                message: String::from("endpoint cannot be a base"),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Dispatches a request, racing it against `cancel`, and checks the
    /// reply status against `ok_codes`.
    ///
    /// A 404 is reported as [`VolumeError::NotFound`] unless listed in
    /// `ok_codes`.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Cancelled`] when `cancel` fires first,
    /// [`VolumeError::Transport`] for transport failures, and
    /// [`VolumeError::NotFound`] or [`VolumeError::UnexpectedStatus`] for
    /// rejected status codes.
    pub async fn send(
        &self,
        cancel: &CancellationToken,
        request: ApiRequest,
        ok_codes: &[u16],
    ) -> Result<RawResponse, VolumeError> {
        if cancel.is_cancelled() {
            return Err(VolumeError::Cancelled);
        }

        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%method, %url, "dispatching block storage request");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(VolumeError::Cancelled),
            result = self.transport.dispatch(request) => result.map_err(|err| VolumeError::Transport {
                message: err.message,
            })?,
        };

        if ok_codes.contains(&response.status) {
            debug!(%method, %url, status = response.status, "request succeeded");
            return Ok(response);
        }

        warn!(%method, %url, status = response.status, "unexpected response status");
        if response.status == 404 {
            return Err(VolumeError::NotFound {
                url: url.to_string(),
            });
        }
        Err(VolumeError::UnexpectedStatus {
            method: method.to_string(),
            url: url.to_string(),
            status: response.status,
            body: response.body_text(),
        })
    }

    /// Issues a `GET` and parses the JSON reply.
    pub(crate) async fn get_json(
        &self,
        cancel: &CancellationToken,
        url: Url,
    ) -> Result<Value, VolumeError> {
        let response = self
            .send(cancel, ApiRequest::new(Method::GET, url), &[200])
            .await?;
        parse_body(&response)
    }

    /// Issues a request carrying a JSON body and parses the JSON reply.
    pub(crate) async fn send_json(
        &self,
        cancel: &CancellationToken,
        method: Method,
        url: Url,
        body: Value,
        ok_codes: &[u16],
    ) -> Result<Value, VolumeError> {
        let request = ApiRequest::new(method, url).with_body(body);
        let response = self.send(cancel, request, ok_codes).await?;
        parse_body(&response)
    }
}

fn parse_body(response: &RawResponse) -> Result<Value, VolumeError> {
    serde_json::from_slice(&response.body).map_err(|err| VolumeError::decode("response body", err))
}

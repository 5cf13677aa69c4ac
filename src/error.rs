//! Error types for the Block Storage volumes client.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised by volume operations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum VolumeError {
    /// Raised when the transport fails to deliver a request or read a reply.
    #[error("transport error: {message}")]
    Transport {
        /// Message reported by the transport.
        message: String,
    },
    /// Raised when a response body does not have the expected shape.
    #[error("failed to decode {context}: {message}")]
    Decode {
        /// What was being decoded (for example `volumes`).
        context: String,
        /// Parser error message.
        message: String,
    },
    /// Raised when request options cannot be serialised into a body.
    #[error("failed to encode {context}: {message}")]
    Encode {
        /// What was being encoded (for example `update options`).
        context: String,
        /// Serialiser error message.
        message: String,
    },
    /// Raised when extraction targets a location the decoder may not mutate.
    #[error("cannot extract into {target}: destination is not addressable")]
    InvalidDestination {
        /// Type name of the rejected destination.
        target: &'static str,
    },
    /// Raised when the service answers 404.
    #[error("resource not found: {url}")]
    NotFound {
        /// URL that was requested.
        url: String,
    },
    /// Raised when the service answers with a status the operation does not
    /// accept.
    #[error("{method} {url} returned unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP method of the request.
        method: String,
        /// URL that was requested.
        url: String,
        /// Status code returned by the service.
        status: u16,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },
    /// Raised when request options are missing a required field.
    #[error("invalid volume request: missing {0}")]
    Validation(String),
    /// Raised when polling options cannot drive a wait loop.
    #[error("invalid wait options: {0}")]
    InvalidWait(String),
    /// Raised when the caller cancels an in-flight operation.
    #[error("operation cancelled")]
    Cancelled,
    /// Raised when polling exceeds its deadline.
    #[error("timeout waiting for {action} on volume {volume_id}")]
    Timeout {
        /// Action being waited on.
        action: String,
        /// Volume identifier.
        volume_id: String,
    },
    /// Raised when a polled volume reports an error status.
    #[error("volume {volume_id} entered status {status}")]
    VolumeInError {
        /// Volume identifier.
        volume_id: String,
        /// Status reported by the service.
        status: String,
    },
    /// Raised when a URL cannot be built from the endpoint or a cursor.
    #[error("invalid url {url}: {message}")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Parser error message.
        message: String,
    },
    /// Raised when client configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
}

impl VolumeError {
    pub(crate) fn decode(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            context: context.to_owned(),
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            context: context.to_owned(),
            message: err.to_string(),
        }
    }

    /// Returns `true` when the error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<ConfigError> for VolumeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Block Storage client configuration derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "OS",
    discovery(
        app_name = "cinder-volumes",
        env_var = "CINDER_VOLUMES_CONFIG_PATH",
        config_file_name = "cinder-volumes.toml",
        dotfile_name = ".cinder-volumes.toml",
        project_file_name = "cinder-volumes.toml"
    )
)]
pub struct BlockStorageConfig {
    /// Block Storage v3 endpoint including the project path, for example
    /// `https://cinder.example.com:8776/v3/<project-id>`. Service catalogue
    /// resolution is out of scope, so the endpoint must be supplied directly.
    pub volume_endpoint: String,
    /// Pre-issued Keystone token sent as `X-Auth-Token`.
    pub auth_token: String,
    /// Optional microversion sent as `OpenStack-API-Version: volume <value>`.
    pub volume_api_version: Option<String>,
    /// Per-request timeout in seconds. Defaults to 30.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

const CONFIG_FILE: &str = "cinder-volumes.toml";

impl BlockStorageConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to {CONFIG_FILE}",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags in
    /// that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("cinder-volumes")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty,
    /// [`ConfigError::InvalidEndpoint`] when the endpoint is not an absolute
    /// HTTP(S) URL, and [`ConfigError::InvalidTimeout`] for a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.volume_endpoint,
            &FieldMetadata::new(
                "Block Storage endpoint",
                "OS_VOLUME_ENDPOINT",
                "volume_endpoint",
            ),
        )?;
        Self::require_field(
            &self.auth_token,
            &FieldMetadata::new("authentication token", "OS_AUTH_TOKEN", "auth_token"),
        )?;
        if self
            .volume_api_version
            .as_deref()
            .is_some_and(|version| version.trim().is_empty())
        {
            return Err(ConfigError::MissingField(format!(
                "volume API microversion must not be blank: unset OS_VOLUME_API_VERSION or \
                 fix volume_api_version in {CONFIG_FILE}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.endpoint().map(|_| ())
    }

    /// Parses the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the value does not parse
    /// or does not use an HTTP scheme.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self.volume_endpoint.trim();
        let url = Url::parse(raw).map_err(|err| ConfigError::InvalidEndpoint {
            endpoint: raw.to_owned(),
            message: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: raw.to_owned(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates the endpoint cannot be used as a base URL.
    #[error("invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint {
        /// Endpoint text as configured.
        endpoint: String,
        /// Parser error message.
        message: String,
    },
    /// Indicates a zero request timeout.
    #[error("request_timeout_secs must be greater than zero")]
    InvalidTimeout,
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

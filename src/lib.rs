//! Client for the OpenStack Block Storage v3 volumes API.
//!
//! The crate lists, fetches, creates, updates and deletes volumes over a
//! pluggable [`Transport`]. Listings are paged lazily through [`Pager`];
//! response bodies decode into [`Volume`] records, optionally merged with
//! extension field sets such as [`VolumeTenantExt`] and [`VolumeHostExt`].
//!
//! ```no_run
//! use cinder_volumes::{BlockStorageConfig, ServiceClient, volumes};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BlockStorageConfig::load_without_cli_args()?;
//! let client = ServiceClient::from_config(&config)?;
//! let cancel = CancellationToken::new();
//! let page = volumes::list(&client, &volumes::ListOpts::default())?
//!     .all_pages(&cancel)
//!     .await?;
//! for volume in volumes::extract_volumes(&page)? {
//!     println!("{} {}", volume.id, volume.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod test_support;
pub mod volumes;

pub use client::{HttpTransport, ServiceClient, Transport};
pub use config::{BlockStorageConfig, ConfigError};
pub use error::VolumeError;
pub use extract::{Destination, Extract};
pub use pagination::{Page, Pager};
pub use volumes::{Volume, VolumeHostExt, VolumeResult, VolumeStatus, VolumeTenantExt};

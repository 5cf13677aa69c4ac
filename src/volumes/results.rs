//! Decoding of volume responses.

use serde_json::Value;

use super::types::Volume;
use crate::error::VolumeError;
use crate::extract::{Destination, Extract, extract_into};
use crate::pagination::Page;

const SINGLE_ENVELOPE: &str = "volume";

/// Reply of a single-volume operation, decoded lazily.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeResult {
    body: Value,
}

impl VolumeResult {
    /// Wraps a decoded response body.
    #[must_use]
    pub const fn new(body: Value) -> Self {
        Self { body }
    }

    /// Raw response body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Decodes the `volume` envelope into a [`Volume`].
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Decode`] when the envelope is missing or
    /// malformed.
    pub fn extract(&self) -> Result<Volume, VolumeError> {
        let mut volume = Volume::default();
        self.extract_into(&mut volume)?;
        Ok(volume)
    }

    /// Decodes the `volume` envelope into `dest`, which may be a tuple of
    /// extension field sets.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidDestination`] when `dest` is not
    /// addressable and [`VolumeError::Decode`] when the body is malformed.
    pub fn extract_into<D: Destination>(&self, dest: D) -> Result<(), VolumeError> {
        extract_into(&self.body, SINGLE_ENVELOPE, dest)
    }
}

/// Decodes every volume on a page.
///
/// # Errors
///
/// Returns [`VolumeError::Decode`] when the page body is malformed.
pub fn extract_volumes(page: &Page) -> Result<Vec<Volume>, VolumeError> {
    let mut volumes = Vec::new();
    extract_volumes_into(page, &mut volumes)?;
    Ok(volumes)
}

/// Decodes every record on a page into `dest`.
///
/// # Errors
///
/// Returns [`VolumeError::InvalidDestination`] when `dest` is not
/// addressable and [`VolumeError::Decode`] when the page body is malformed.
pub fn extract_volumes_into<D, T>(page: &Page, dest: D) -> Result<(), VolumeError>
where
    D: Destination<Target = Vec<T>>,
    T: Extract,
{
    extract_into(page.body(), page.collection(), dest)
}

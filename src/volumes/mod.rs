//! Block Storage v3 volumes: records, request options and operations.
//!
//! Listing returns a [`Pager`](crate::pagination::Pager); single-volume
//! operations return a [`VolumeResult`] that decodes on demand, either into a
//! plain [`Volume`] or into a tuple merging extension field sets.

mod requests;
mod results;
mod types;
mod wire;

pub use requests::{
    CreateOpts, DeleteOpts, ListOpts, SchedulerHints, SortDir, UpdateOpts, WaitOptions, create,
    delete, get, list, update, wait_for_status,
};
pub use results::{VolumeResult, extract_volumes, extract_volumes_into};
pub use types::{Attachment, ReplicationStatus, Volume, VolumeHostExt, VolumeStatus, VolumeTenantExt};

crate::impl_extract!(Volume, VolumeTenantExt, VolumeHostExt);

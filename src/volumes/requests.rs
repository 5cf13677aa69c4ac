//! Request options and operations for the volumes resource.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::results::VolumeResult;
use super::types::{Volume, VolumeStatus};
use crate::client::{ApiRequest, ServiceClient, Transport};
use crate::error::VolumeError;
use crate::pagination::Pager;

const RESOURCE: &str = "volumes";
const SCHEDULER_HINTS_KEY: &str = "OS-SCH-HNT:scheduler_hints";

/// Direction of a sorted listing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDir {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDir {
    /// Returns the query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters and paging controls for [`list`].
///
/// Unset fields are left out of the query string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListOpts {
    /// List volumes of every project (admin only).
    pub all_tenants: bool,
    /// Only volumes carrying all of these metadata pairs.
    pub metadata: BTreeMap<String, String>,
    /// Only volumes with this name.
    pub name: Option<String>,
    /// Only volumes in this status.
    pub status: Option<VolumeStatus>,
    /// Only volumes owned by this project; sent as `project_id`.
    pub tenant_id: Option<String>,
    /// Attribute to sort by.
    pub sort_key: Option<String>,
    /// Sort direction.
    pub sort_dir: Option<SortDir>,
    /// Maximum number of volumes per page.
    pub limit: Option<u32>,
    /// Number of volumes to skip.
    pub offset: Option<u32>,
    /// Identifier of the last volume of the previous page.
    pub marker: Option<String>,
}

impl ListOpts {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.all_tenants {
            pairs.push(("all_tenants", String::from("true")));
        }
        if !self.metadata.is_empty() {
            pairs.push(("metadata", encode_metadata(&self.metadata)));
        }
        push_opt(&mut pairs, "name", self.name.as_deref());
        push_opt(
            &mut pairs,
            "status",
            self.status.as_ref().map(VolumeStatus::as_str),
        );
        push_opt(&mut pairs, "project_id", self.tenant_id.as_deref());
        push_opt(&mut pairs, "sort_key", self.sort_key.as_deref());
        push_opt(&mut pairs, "sort_dir", self.sort_dir.map(SortDir::as_str));
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        push_opt(&mut pairs, "marker", self.marker.as_deref());
        pairs
    }

    /// Applies the options to `url` as query parameters.
    pub fn apply(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(pairs);
    }
}

fn push_opt(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(text) = value.filter(|text| !text.is_empty()) {
        pairs.push((key, text.to_owned()));
    }
}

fn encode_metadata(metadata: &BTreeMap<String, String>) -> String {
    let entries: Vec<String> = metadata
        .iter()
        .map(|(key, value)| format!("'{key}':'{value}'"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Options for [`create`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CreateOpts {
    /// Size in GiB. Required unless the volume has a source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Display description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Volume type name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume_type: String,
    /// Availability zone.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub availability_zone: String,
    /// Consistency group to join.
    #[serde(rename = "consistencygroup_id", skip_serializing_if = "String::is_empty")]
    pub consistency_group_id: String,
    /// Snapshot to create the volume from.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub snapshot_id: String,
    /// Volume to clone.
    #[serde(rename = "source_volid", skip_serializing_if = "String::is_empty")]
    pub source_vol_id: String,
    /// Backup to restore.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backup_id: String,
    /// Image to write onto the volume.
    #[serde(rename = "imageRef", skip_serializing_if = "String::is_empty")]
    pub image_id: String,
    /// Free-form metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Allow attaching to several instances.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multiattach: bool,
}

impl CreateOpts {
    fn has_source(&self) -> bool {
        [
            &self.snapshot_id,
            &self.source_vol_id,
            &self.backup_id,
            &self.image_id,
        ]
        .iter()
        .any(|field| !field.is_empty())
    }

    /// Checks that the options describe a creatable volume.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Validation`] naming `size` when no size is
    /// given and the volume has no snapshot, source volume, backup or image.
    pub fn validate(&self) -> Result<(), VolumeError> {
        if self.size.is_none() && !self.has_source() {
            return Err(VolumeError::Validation(String::from("size")));
        }
        Ok(())
    }

    fn to_body(&self) -> Result<Map<String, Value>, VolumeError> {
        let volume =
            serde_json::to_value(self).map_err(|err| VolumeError::encode("create options", err))?;
        let mut body = Map::new();
        body.insert(String::from("volume"), volume);
        Ok(body)
    }
}

/// Placement hints for the scheduler, sent alongside [`CreateOpts`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SchedulerHints {
    /// Place on a different backend than these volumes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub different_host: Vec<String>,
    /// Place on the same backend as these volumes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_host: Vec<String>,
    /// Place near this compute instance.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub local_to_instance: String,
    /// Raw scheduler query expression.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    /// Additional driver-specific hints.
    #[serde(flatten)]
    pub additional: BTreeMap<String, Value>,
}

/// Options for [`update`].
///
/// `None` leaves a field untouched; `Some(String::new())` clears it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct UpdateOpts {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New display description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Options for [`delete`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DeleteOpts {
    /// Delete the volume's snapshots too.
    pub cascade: bool,
}

/// Polling cadence for [`wait_for_status`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitOptions {
    /// Pause between polls.
    pub poll_interval: Duration,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Lists volumes with full details.
///
/// Nothing is fetched until the returned pager is driven.
///
/// # Errors
///
/// Returns [`VolumeError::InvalidUrl`] when the listing URL cannot be built.
pub fn list<'a, T: Transport>(
    client: &'a ServiceClient<T>,
    opts: &ListOpts,
) -> Result<Pager<'a, T>, VolumeError> {
    let mut url = client.service_url(&[RESOURCE, "detail"])?;
    opts.apply(&mut url);
    Ok(Pager::new(client, url, RESOURCE))
}

/// Fetches one volume.
///
/// # Errors
///
/// Returns [`VolumeError::NotFound`] for unknown identifiers and propagates
/// transport, status and cancellation errors.
pub async fn get<T: Transport>(
    client: &ServiceClient<T>,
    cancel: &CancellationToken,
    id: &str,
) -> Result<VolumeResult, VolumeError> {
    let url = client.service_url(&[RESOURCE, id])?;
    let body = client.get_json(cancel, url).await?;
    Ok(VolumeResult::new(body))
}

/// Requests a new volume. The service answers before the volume is usable;
/// see [`wait_for_status`].
///
/// # Errors
///
/// Returns [`VolumeError::Validation`] before any request when the options
/// are incomplete, then propagates transport, status and cancellation
/// errors.
pub async fn create<T: Transport>(
    client: &ServiceClient<T>,
    cancel: &CancellationToken,
    opts: &CreateOpts,
    hints: Option<&SchedulerHints>,
) -> Result<VolumeResult, VolumeError> {
    opts.validate()?;
    let mut body = opts.to_body()?;
    if let Some(scheduler_hints) = hints {
        let encoded = serde_json::to_value(scheduler_hints)
            .map_err(|err| VolumeError::encode("scheduler hints", err))?;
        body.insert(SCHEDULER_HINTS_KEY.to_owned(), encoded);
    }

    let url = client.service_url(&[RESOURCE])?;
    let reply = client
        .send_json(cancel, Method::POST, url, Value::Object(body), &[202])
        .await?;
    Ok(VolumeResult::new(reply))
}

/// Changes a volume's name, description or metadata.
///
/// # Errors
///
/// Returns [`VolumeError::Encode`] when the options cannot be serialised and
/// propagates transport, status, decode and cancellation errors.
pub async fn update<T: Transport>(
    client: &ServiceClient<T>,
    cancel: &CancellationToken,
    id: &str,
    opts: &UpdateOpts,
) -> Result<VolumeResult, VolumeError> {
    let url = client.service_url(&[RESOURCE, id])?;
    let volume =
        serde_json::to_value(opts).map_err(|err| VolumeError::encode("update options", err))?;
    let mut body = Map::new();
    body.insert(String::from("volume"), volume);
    let reply = client
        .send_json(cancel, Method::PUT, url, Value::Object(body), &[200])
        .await?;
    Ok(VolumeResult::new(reply))
}

/// Deletes a volume.
///
/// # Errors
///
/// Returns [`VolumeError::NotFound`] for unknown identifiers and propagates
/// transport, status and cancellation errors.
pub async fn delete<T: Transport>(
    client: &ServiceClient<T>,
    cancel: &CancellationToken,
    id: &str,
    opts: &DeleteOpts,
) -> Result<(), VolumeError> {
    let mut url = client.service_url(&[RESOURCE, id])?;
    if opts.cascade {
        url.query_pairs_mut().append_pair("cascade", "true");
    }
    client
        .send(cancel, ApiRequest::new(Method::DELETE, url), &[202, 204])
        .await?;
    Ok(())
}

/// Polls a volume until it reports `status`.
///
/// # Errors
///
/// Returns [`VolumeError::InvalidWait`] before any request when the poll
/// interval is zero. A timeout too large to represent means no deadline.
/// Returns [`VolumeError::VolumeInError`] as soon as the volume reports an
/// error status other than `status`, [`VolumeError::Timeout`] when the next
/// poll would land past the deadline, and [`VolumeError::Cancelled`] when
/// `cancel` fires, including during the pause between polls.
pub async fn wait_for_status<T: Transport>(
    client: &ServiceClient<T>,
    cancel: &CancellationToken,
    id: &str,
    status: &VolumeStatus,
    options: &WaitOptions,
) -> Result<Volume, VolumeError> {
    if options.poll_interval.is_zero() {
        return Err(VolumeError::InvalidWait(String::from(
            "poll interval must be greater than zero",
        )));
    }
    // `None` means the timeout lies beyond what `Instant` can represent.
    let deadline = Instant::now().checked_add(options.timeout);
    loop {
        let volume = get(client, cancel, id).await?.extract()?;
        if &volume.status == status {
            return Ok(volume);
        }
        if volume.status.is_error() {
            return Err(VolumeError::VolumeInError {
                volume_id: id.to_owned(),
                status: volume.status.to_string(),
            });
        }
        debug!(volume_id = id, current = %volume.status, target = %status, "volume not ready");

        if poll_overruns(deadline, options.poll_interval) {
            return Err(VolumeError::Timeout {
                action: format!("status {status}"),
                volume_id: id.to_owned(),
            });
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(VolumeError::Cancelled),
            () = sleep(options.poll_interval) => {}
        }
    }
}

fn poll_overruns(deadline: Option<Instant>, poll_interval: Duration) -> bool {
    deadline.is_some_and(|limit| {
        Instant::now()
            .checked_add(poll_interval)
            .is_none_or(|next_poll| next_poll > limit)
    })
}

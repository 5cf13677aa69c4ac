//! Volume records as returned by the Block Storage v3 API.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{loose_bool, null_as_default, optional_timestamp};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value not known to this client, preserved verbatim.
            Unknown(String),
            /// The field was absent or empty.
            #[default]
            Unset,
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unknown(value) => value.as_str(),
                    Self::Unset => "",
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $wire => Self::$variant, )+
                    "" => Self::Unset,
                    _ => Self::Unknown(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(raw) => raw,
                    other => other.as_str().to_owned(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Lifecycle status reported by the service.
    VolumeStatus {
        /// The volume is being created.
        Creating => "creating",
        /// The volume is ready to attach.
        Available => "available",
        /// The volume is reserved for attachment.
        Reserved => "reserved",
        /// The volume is attaching to an instance.
        Attaching => "attaching",
        /// The volume is detaching from an instance.
        Detaching => "detaching",
        /// The volume is attached to an instance.
        InUse => "in-use",
        /// The volume is locked for maintenance.
        Maintenance => "maintenance",
        /// The volume is being deleted.
        Deleting => "deleting",
        /// The volume is awaiting a transfer.
        AwaitingTransfer => "awaiting-transfer",
        /// Creation failed.
        Error => "error",
        /// Deletion failed.
        ErrorDeleting => "error_deleting",
        /// A backup is being taken.
        BackingUp => "backing-up",
        /// A backup is being restored onto the volume.
        RestoringBackup => "restoring-backup",
        /// Backup failed.
        ErrorBackingUp => "error_backing-up",
        /// Backup restore failed.
        ErrorRestoring => "error_restoring",
        /// Extension failed.
        ErrorExtending => "error_extending",
        /// An image is being downloaded onto the volume.
        Downloading => "downloading",
        /// The volume is being uploaded to an image.
        Uploading => "uploading",
        /// The volume type is being changed.
        Retyping => "retyping",
        /// The volume is being extended.
        Extending => "extending",
    }
}

impl VolumeStatus {
    /// Returns `true` for any failure status (`error`, `error_deleting`, ...).
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.as_str().contains("error")
    }
}

string_enum! {
    /// Replication state reported by the service.
    ReplicationStatus {
        /// Replication is disabled.
        Disabled => "disabled",
        /// Replication is enabled.
        Enabled => "enabled",
        /// The backend cannot replicate.
        NotCapable => "not-capable",
        /// Replication is failing.
        Error => "error",
        /// Replica data is being copied.
        Copying => "copying",
        /// A failover is in progress.
        FailingOver => "failing-over",
        /// The volume has failed over.
        FailedOver => "failed-over",
    }
}

/// A mount of a volume onto a compute instance.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Attachment {
    /// When the attachment was made.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub attached_at: Option<DateTime<Utc>>,
    /// Attachment identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachment_id: String,
    /// Device path on the instance (for example `/dev/vdc`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub device: String,
    /// Compute host the instance runs on.
    #[serde(default, deserialize_with = "null_as_default")]
    pub host_name: String,
    /// Identifier of the attachment record.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Instance the volume is attached to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_id: String,
    /// Attached volume.
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume_id: String,
}

/// A Block Storage volume.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Volume {
    /// Unique identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Lifecycle status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: VolumeStatus,
    /// Size in GiB.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    /// Availability zone.
    #[serde(default, deserialize_with = "null_as_default")]
    pub availability_zone: String,
    /// Creation time.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Instances the volume is attached to; empty when unattached.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Display description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Volume type name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume_type: String,
    /// Snapshot the volume was created from, or empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub snapshot_id: String,
    /// Volume the volume was cloned from, or empty.
    #[serde(default, deserialize_with = "null_as_default", rename = "source_volid")]
    pub source_vol_id: String,
    /// Backup the volume was restored from.
    #[serde(default)]
    pub backup_id: Option<String>,
    /// Free-form metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
    /// Owner user identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    /// Whether the volume is bootable. Sent by the API as a string.
    #[serde(default, deserialize_with = "loose_bool")]
    pub bootable: bool,
    /// Whether the volume is encrypted.
    #[serde(default, deserialize_with = "loose_bool")]
    pub encrypted: bool,
    /// Replication state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub replication_status: ReplicationStatus,
    /// Consistency group, or empty.
    #[serde(default, deserialize_with = "null_as_default", rename = "consistencygroup_id")]
    pub consistency_group_id: String,
    /// Whether the volume may attach to several instances.
    #[serde(default, deserialize_with = "loose_bool")]
    pub multiattach: bool,
    /// Metadata copied from the source image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume_image_metadata: HashMap<String, String>,
}

/// Tenant field contributed by the `os-vol-tenant-attr` extension.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VolumeTenantExt {
    /// Project owning the volume.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "os-vol-tenant-attr:tenant_id"
    )]
    pub tenant_id: String,
}

/// Host field contributed by the `os-vol-host-attr` extension.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VolumeHostExt {
    /// Storage node hosting the volume.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "os-vol-host-attr:host"
    )]
    pub host: String,
}

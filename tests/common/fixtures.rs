//! Canned Block Storage responses shared by the integration tests.
//!
//! Included with:
//!
//! ```rust
//! #[path = "common/fixtures.rs"]
//! mod fixtures;
//! ```

use serde_json::{Value, json};

/// Identifier used by the single-volume fixtures.
pub const VOLUME_ID: &str = "d32019d3-bc6e-4319-9c1d-6722fc136a22";

/// Project owning every fixture volume.
pub const TENANT_ID: &str = "304dc00909ac4d0da6c62d816bcb3459";

/// Backup the restore fixture is created from.
pub const BACKUP_ID: &str = "20c792f0-bb03-434f-b653-06ef238e337e";

/// URL of the second listing page advertised by [`list_page`].
pub const NEXT_PAGE_URL: &str = "http://cinder.test/v3/project/volumes/detail?marker=1";

/// First listed volume: attached, with host and tenant extension fields.
pub fn vol_001() -> Value {
    json!({
        "volume_type": "lvmdriver-1",
        "created_at": "2015-09-17T03:35:03.000000",
        "bootable": "false",
        "name": "vol-001",
        "os-vol-host-attr:host": "host-001",
        "encrypted": false,
        "os-vol-tenant-attr:tenant_id": TENANT_ID,
        "replication_status": "disabled",
        "description": null,
        "os-volume-replication:extended_status": null,
        "metadata": {"foo": "bar"},
        "status": "available",
        "attachments": [{
            "server_id": "83ec2e3b-4321-422b-8706-a84185f52a0a",
            "attachment_id": "05551600-a936-4d4a-ba42-79a037c1-c91a",
            "attached_at": "2016-08-06T14:48:20.000000",
            "host_name": "foobar",
            "volume_id": "d6cacb1a-8b59-4c88-ad90-d70ebb82bb75",
            "device": "/dev/vdc",
            "id": "d6cacb1a-8b59-4c88-ad90-d70ebb82bb75"
        }],
        "size": 75,
        "source_volid": null,
        "user_id": "ff1ce52c03ab433aaba9108c2e3ef541",
        "id": "289da7f8-6440-407c-9fb4-7db01ec49164",
        "links": [
            {"href": "http://cinder.test/v3/project/volumes/289da7f8", "rel": "self"}
        ],
        "multiattach": false,
        "snapshot_id": null,
        "os-volume-replication:driver_data": null,
        "consistencygroup_id": null,
        "availability_zone": "nova"
    })
}

/// Second listed volume: unattached, tenant only.
pub fn vol_002() -> Value {
    json!({
        "volume_type": "lvmdriver-1",
        "created_at": "2015-09-17T03:32:29.000000",
        "bootable": "false",
        "name": "vol-002",
        "encrypted": false,
        "os-vol-tenant-attr:tenant_id": TENANT_ID,
        "replication_status": "disabled",
        "description": null,
        "metadata": {},
        "status": "available",
        "attachments": [],
        "size": 75,
        "source_volid": null,
        "user_id": "ff1ce52c03ab433aaba9108c2e3ef541",
        "id": "96c3bda7-c82a-4f50-be73-ca7621794835",
        "multiattach": false,
        "snapshot_id": null,
        "consistencygroup_id": null,
        "availability_zone": "nova"
    })
}

/// Listing page holding both volumes and a cursor to [`NEXT_PAGE_URL`].
pub fn list_page() -> Value {
    json!({
        "volumes": [vol_001(), vol_002()],
        "volumes_links": [{"href": NEXT_PAGE_URL, "rel": "next"}]
    })
}

/// Listing page with no records.
pub fn empty_page() -> Value {
    json!({"volumes": []})
}

/// Listing page holding `records` and, when given, a cursor to `next`.
pub fn page_of(records: Vec<Value>, next: Option<&str>) -> Value {
    match next {
        Some(href) => json!({"volumes": records, "volumes_links": [{"href": href, "rel": "next"}]}),
        None => json!({"volumes": records}),
    }
}

/// Single-volume reply carrying tenant, host and image metadata.
pub fn get_response() -> Value {
    json!({
        "volume": {
            "volume_type": "lvmdriver-1",
            "created_at": "2015-09-17T03:32:29.000000",
            "bootable": "false",
            "name": "vol-001",
            "os-vol-host-attr:host": "host-001",
            "encrypted": false,
            "os-vol-tenant-attr:tenant_id": TENANT_ID,
            "replication_status": "disabled",
            "description": null,
            "metadata": {},
            "status": "available",
            "volume_image_metadata": {
                "container_format": "bare",
                "image_name": "centos"
            },
            "attachments": [{
                "server_id": "83ec2e3b-4321-422b-8706-a84185f52a0a",
                "attachment_id": "05551600-a936-4d4a-ba42-79a037c1-c91a",
                "attached_at": "2016-08-06T14:48:20.000000",
                "host_name": "foobar",
                "volume_id": VOLUME_ID,
                "device": "/dev/vdc",
                "id": VOLUME_ID
            }],
            "size": 75,
            "source_volid": null,
            "user_id": "ff1ce52c03ab433aaba9108c2e3ef541",
            "id": VOLUME_ID,
            "multiattach": false,
            "snapshot_id": null,
            "consistencygroup_id": null,
            "availability_zone": "nova"
        }
    })
}

/// Reply to a create request with an explicit size.
pub fn create_response() -> Value {
    json!({
        "volume": {
            "size": 75,
            "id": VOLUME_ID,
            "metadata": {},
            "created_at": "2015-09-17T03:32:29.044216",
            "encrypted": false,
            "bootable": "false",
            "availability_zone": "nova",
            "attachments": [],
            "user_id": "ff1ce52c03ab433aaba9108c2e3ef541",
            "status": "creating",
            "description": null,
            "volume_type": "lvmdriver-1",
            "name": "vol-001",
            "replication_status": "disabled",
            "consistencygroup_id": null,
            "source_volid": null,
            "snapshot_id": null,
            "multiattach": false
        }
    })
}

/// Reply to a create request restoring [`BACKUP_ID`]; the server picks the
/// size.
pub fn create_from_backup_response() -> Value {
    json!({
        "volume": {
            "id": VOLUME_ID,
            "status": "creating",
            "size": 30,
            "availability_zone": "nova",
            "created_at": "2023-09-12T10:06:06.000000",
            "updated_at": null,
            "name": "vol-001",
            "description": null,
            "volume_type": "lvmdriver-1",
            "snapshot_id": null,
            "source_volid": null,
            "metadata": {},
            "links": [],
            "user_id": "ff1ce52c03ab433aaba9108c2e3ef541",
            "bootable": "false",
            "encrypted": false,
            "replication_status": null,
            "consistencygroup_id": null,
            "multiattach": false,
            "attachments": [],
            "backup_id": BACKUP_ID
        }
    })
}

/// Reply to an update renaming the volume to `vol-002`.
pub fn update_response() -> Value {
    json!({
        "volume": {
            "name": "vol-002",
            "id": VOLUME_ID,
            "status": "available"
        }
    })
}

/// Minimal single-volume reply reporting `status`.
pub fn status_response(status: &str) -> Value {
    json!({"volume": {"id": VOLUME_ID, "status": status}})
}

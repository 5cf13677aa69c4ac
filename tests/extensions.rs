//! Extension-field merging and destination checks on decoded replies.

#[path = "common/fixtures.rs"]
mod fixtures;

use std::rc::Rc;
use std::sync::Arc;

use cinder_volumes::extract::{Extract, extract_into};
use cinder_volumes::pagination::Page;
use cinder_volumes::test_support::ScriptedTransport;
use cinder_volumes::volumes::{self, Volume, VolumeHostExt, VolumeResult, VolumeTenantExt};
use cinder_volumes::{VolumeError, impl_extract};
use reqwest::Url;
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use fixtures::{TENANT_ID, VOLUME_ID, get_response, list_page};

#[derive(Debug, Default, Deserialize, PartialEq)]
struct MigrationExt {
    #[serde(rename = "os-vol-mig-status-attr:migstat", default)]
    migration_status: Option<String>,
}

impl_extract!(MigrationExt);

#[tokio::test]
async fn get_merges_tenant_extension_and_image_metadata() {
    let client = ScriptedTransport::new().into_client();
    client.transport().push_json(200, &get_response());

    let result = volumes::get(&client, &CancellationToken::new(), VOLUME_ID)
        .await
        .expect("get should succeed");
    let mut merged = <(Volume, VolumeTenantExt)>::default();
    result.extract_into(&mut merged).expect("merge");

    let (volume, tenant) = merged;
    assert_eq!(tenant.tenant_id, TENANT_ID);
    assert_eq!(
        volume.volume_image_metadata.get("image_name").map(String::as_str),
        Some("centos")
    );
}

#[test]
fn tenant_only_record_leaves_host_empty() {
    let raw = json!({"id": "v1", "os-vol-tenant-attr:tenant_id": "t1"});
    let (_, tenant, host) = <(Volume, VolumeTenantExt, VolumeHostExt)>::extract(&raw).expect("merge");
    assert_eq!(tenant.tenant_id, "t1");
    assert_eq!(host.host, "");
}

#[test]
fn host_only_record_leaves_tenant_empty() {
    let raw = json!({"id": "v1", "os-vol-host-attr:host": "node-1@lvm#pool"});
    let (_, tenant, host) = <(Volume, VolumeTenantExt, VolumeHostExt)>::extract(&raw).expect("merge");
    assert_eq!(tenant.tenant_id, "");
    assert_eq!(host.host, "node-1@lvm#pool");
}

#[test]
fn caller_defined_extensions_join_the_merge() {
    let raw = json!({"id": "v1", "os-vol-mig-status-attr:migstat": "migrating"});
    let (volume, migration) = <(Volume, MigrationExt)>::extract(&raw).expect("merge");
    assert_eq!(volume.id, "v1");
    assert_eq!(migration.migration_status.as_deref(), Some("migrating"));
}

#[rstest]
#[case::valid_reply(get_response())]
#[case::null_body(Value::Null)]
#[case::wrong_shape(json!({"volume": [1, 2, 3]}))]
#[case::missing_envelope(json!({}))]
fn aliased_destination_is_rejected_whatever_the_body(#[case] body: Value) {
    let result = VolumeResult::new(body);
    let shared = Arc::new(Volume::default());
    let mut alias = Arc::clone(&shared);

    let err = result
        .extract_into(&mut alias)
        .expect_err("aliased destination must be rejected");

    assert!(
        matches!(err, VolumeError::InvalidDestination { .. }),
        "unexpected error: {err}"
    );
    assert_eq!(*shared, Volume::default(), "shared value must stay untouched");
}

#[test]
fn unaliased_shared_handle_accepts_listing() {
    let url = Url::parse("http://cinder.test/v3/project/volumes/detail").expect("url");
    let page = Page::new(url, list_page(), "volumes");
    let mut dest: Rc<Vec<(Volume, VolumeHostExt)>> = Rc::default();

    volumes::extract_volumes_into(&page, &mut dest).expect("merge");

    let hosts: Vec<&str> = dest.iter().map(|(_, host)| host.host.as_str()).collect();
    assert_eq!(hosts, ["host-001", ""]);
}

#[test]
fn aliased_listing_destination_is_rejected() {
    let url = Url::parse("http://cinder.test/v3/project/volumes/detail").expect("url");
    let page = Page::new(url, list_page(), "volumes");
    let shared: Rc<Vec<Volume>> = Rc::default();
    let mut alias = Rc::clone(&shared);

    let err = volumes::extract_volumes_into(&page, &mut alias).expect_err("aliased");

    assert!(matches!(err, VolumeError::InvalidDestination { .. }));
}

#[test]
fn extract_into_names_missing_envelope() {
    let mut volume = Volume::default();
    let err = extract_into(&json!({"volumes": []}), "volume", &mut volume)
        .expect_err("missing envelope");
    assert!(matches!(err, VolumeError::Decode { ref context, .. } if context == "volume"));
}

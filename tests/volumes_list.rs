//! Listing, paging and record decoding against a scripted transport.

#[path = "common/fixtures.rs"]
mod fixtures;

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use cinder_volumes::test_support::ScriptedTransport;
use cinder_volumes::volumes::{
    self, Attachment, ListOpts, ReplicationStatus, SortDir, Volume, VolumeHostExt,
    VolumeStatus, VolumeTenantExt,
};
use cinder_volumes::{ServiceClient, VolumeError};
use rstest::{fixture, rstest};
use tokio_util::sync::CancellationToken;

use fixtures::{NEXT_PAGE_URL, TENANT_ID, empty_page, list_page, page_of, vol_001, vol_002};

#[fixture]
fn client() -> ServiceClient<ScriptedTransport> {
    ScriptedTransport::new().into_client()
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .expect("valid timestamp")
}

fn expected_volumes() -> Vec<Volume> {
    let base = Volume {
        availability_zone: String::from("nova"),
        status: VolumeStatus::Available,
        replication_status: ReplicationStatus::Disabled,
        size: 75,
        user_id: String::from("ff1ce52c03ab433aaba9108c2e3ef541"),
        volume_type: String::from("lvmdriver-1"),
        ..Volume::default()
    };
    vec![
        Volume {
            id: String::from("289da7f8-6440-407c-9fb4-7db01ec49164"),
            name: String::from("vol-001"),
            created_at: Some(utc(2015, 9, 17, 3, 35, 3)),
            metadata: HashMap::from([(String::from("foo"), String::from("bar"))]),
            attachments: vec![Attachment {
                server_id: String::from("83ec2e3b-4321-422b-8706-a84185f52a0a"),
                attachment_id: String::from("05551600-a936-4d4a-ba42-79a037c1-c91a"),
                attached_at: Some(utc(2016, 8, 6, 14, 48, 20)),
                host_name: String::from("foobar"),
                volume_id: String::from("d6cacb1a-8b59-4c88-ad90-d70ebb82bb75"),
                device: String::from("/dev/vdc"),
                id: String::from("d6cacb1a-8b59-4c88-ad90-d70ebb82bb75"),
            }],
            ..base.clone()
        },
        Volume {
            id: String::from("96c3bda7-c82a-4f50-be73-ca7621794835"),
            name: String::from("vol-002"),
            created_at: Some(utc(2015, 9, 17, 3, 32, 29)),
            ..base
        },
    ]
}

#[rstest]
#[tokio::test]
async fn each_page_decodes_listing_exactly(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());
    client.transport().push_json(200, &empty_page());

    let mut pages = 0;
    let mut decoded = Vec::new();
    volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .each_page(&CancellationToken::new(), |page| {
            pages += 1;
            decoded.extend(volumes::extract_volumes(page)?);
            Ok(true)
        })
        .await
        .expect("listing should succeed");

    assert_eq!(pages, 1, "the trailing empty page must not reach the handler");
    assert_eq!(decoded, expected_volumes());

    let urls: Vec<String> = client
        .transport()
        .requests()
        .into_iter()
        .map(|request| request.url.to_string())
        .collect();
    assert_eq!(
        urls,
        [
            "http://cinder.test/v3/project/volumes/detail",
            NEXT_PAGE_URL
        ]
    );
}

#[rstest]
#[tokio::test]
async fn all_pages_concatenates_records_in_order(client: ServiceClient<ScriptedTransport>) {
    let second = "http://cinder.test/v3/project/volumes/detail?marker=a";
    let third = "http://cinder.test/v3/project/volumes/detail?marker=b";
    client.transport().push_json(200, &page_of(vec![vol_001()], Some(second)));
    client.transport().push_json(200, &page_of(vec![vol_002()], Some(third)));
    client.transport().push_json(200, &empty_page());

    let page = volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .all_pages(&CancellationToken::new())
        .await
        .expect("drain pages");
    let ids: Vec<String> = volumes::extract_volumes(&page)
        .expect("decode")
        .into_iter()
        .map(|volume| volume.id)
        .collect();

    assert_eq!(
        ids,
        [
            "289da7f8-6440-407c-9fb4-7db01ec49164",
            "96c3bda7-c82a-4f50-be73-ca7621794835"
        ]
    );
    assert_eq!(client.transport().remaining(), 0);
}

#[rstest]
#[tokio::test]
async fn all_pages_merges_extension_fields(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());
    client.transport().push_json(200, &empty_page());

    let page = volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .all_pages(&CancellationToken::new())
        .await
        .expect("drain pages");
    let mut merged: Vec<(Volume, VolumeTenantExt, VolumeHostExt)> = Vec::new();
    volumes::extract_volumes_into(&page, &mut merged).expect("merge");

    let [(first, first_tenant, first_host), (_, second_tenant, second_host)] =
        merged.as_slice()
    else {
        panic!("expected two merged records, got {}", merged.len());
    };
    assert_eq!(first_host.host, "host-001");
    assert_eq!(second_host.host, "");
    assert_eq!(first_tenant.tenant_id, TENANT_ID);
    assert_eq!(second_tenant.tenant_id, TENANT_ID);
    assert_eq!(Some(first), expected_volumes().first());
}

#[rstest]
#[tokio::test]
async fn each_page_stops_when_handler_declines(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());
    client.transport().push_json(200, &empty_page());

    let mut pages = 0;
    volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .each_page(&CancellationToken::new(), |_| {
            pages += 1;
            Ok(false)
        })
        .await
        .expect("listing should succeed");

    assert_eq!(pages, 1);
    assert_eq!(client.transport().requests().len(), 1);
    assert_eq!(client.transport().remaining(), 1);
}

#[rstest]
#[tokio::test]
async fn each_page_stops_when_no_cursor(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &page_of(vec![vol_001()], None));

    let mut pages = 0;
    volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .each_page(&CancellationToken::new(), |_| {
            pages += 1;
            Ok(true)
        })
        .await
        .expect("listing should succeed");

    assert_eq!(pages, 1);
    assert_eq!(client.transport().requests().len(), 1);
}

#[rstest]
#[tokio::test]
async fn each_page_surfaces_handler_errors(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());

    let err = volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .each_page(&CancellationToken::new(), |_| {
            Err(VolumeError::Validation(String::from("handler")))
        })
        .await
        .expect_err("handler error should stop traversal");

    assert_eq!(err, VolumeError::Validation(String::from("handler")));
}

#[rstest]
#[tokio::test]
async fn all_pages_fails_without_partial_results(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());
    client.transport().push_status(500, "backend unavailable");

    let err = volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .all_pages(&CancellationToken::new())
        .await
        .expect_err("second page failure should surface");

    assert!(
        matches!(err, VolumeError::UnexpectedStatus { status: 500, .. }),
        "unexpected error: {err}"
    );
}

#[rstest]
#[tokio::test]
async fn listing_honours_cancellation(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = volumes::list(&client, &ListOpts::default())
        .expect("list url")
        .all_pages(&cancel)
        .await
        .expect_err("cancelled listing should fail");

    assert_eq!(err, VolumeError::Cancelled);
    assert!(client.transport().requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn list_sends_filters_as_query(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &empty_page());
    let opts = ListOpts {
        name: Some(String::from("vol-001")),
        status: Some(VolumeStatus::InUse),
        sort_dir: Some(SortDir::Asc),
        limit: Some(1),
        ..ListOpts::default()
    };

    let page = volumes::list(&client, &opts)
        .expect("list url")
        .all_pages(&CancellationToken::new())
        .await
        .expect("empty listing");

    assert!(page.is_empty().expect("collection is an array"));
    let requests = client.transport().requests();
    assert_eq!(
        requests.first().and_then(|request| request.url.query()),
        Some("name=vol-001&status=in-use&sort_dir=asc&limit=1")
    );
}

#[rstest]
#[tokio::test]
async fn next_page_walks_pages_lazily(client: ServiceClient<ScriptedTransport>) {
    client.transport().push_json(200, &list_page());
    client.transport().push_json(200, &page_of(vec![vol_002()], None));

    let cancel = CancellationToken::new();
    let mut pager = volumes::list(&client, &ListOpts::default()).expect("list url");
    assert!(client.transport().requests().is_empty(), "listing must be lazy");

    let first = pager.next_page(&cancel).await.expect("first page");
    assert!(first.is_some());
    assert_eq!(client.transport().requests().len(), 1);

    let second = pager.next_page(&cancel).await.expect("second page");
    assert_eq!(
        second.map(|page| volumes::extract_volumes(&page).expect("decode").len()),
        Some(1)
    );
    assert_eq!(pager.next_page(&cancel).await.expect("exhausted"), None);
    assert_eq!(client.transport().requests().len(), 2);
}

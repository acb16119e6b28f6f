use std::str::FromStr;
use std::time::Duration;
use futures::TryStreamExt;
use pinnotes::config::app_config::AppConfig;
use pinnotes::config::app_config::data::AppConfigData;
use pinnotes::content_store::{ContentStore, ContentStoreError, IpfsContentStore};
use pinnotes::data::Cid;
use test_utils::{unreachable_api_url, MockIpfsNode};

fn make_store(api_url: String) -> IpfsContentStore {
    make_store_with(AppConfigData {
        ipfs_api_url: api_url,
        store_timeout_ms: 500,
        ..AppConfigData::default()
    })
}

fn make_store_with(config: AppConfigData) -> IpfsContentStore {
    let config = AppConfig::try_from(config).expect("invalid test config");
    IpfsContentStore::new(&config).expect("failed to create store")
}

async fn list_pinned(store: &IpfsContentStore) -> Result<Vec<Cid>, ContentStoreError> {
    store.list_pinned().await?.try_collect().await
}

#[tokio::test]
async fn put_does_not_pin() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let cid = store.put(b"{\"text\":\"hello\"}".to_vec()).await.expect("put failed");
    assert_eq!(node.blob(&cid).as_deref(), Some(&b"{\"text\":\"hello\"}"[..]));
    assert!(node.pinned().is_empty(), "{:?}", node.pinned());
    assert_eq!(node.last_cid_version(), Some(0));
}

#[tokio::test]
async fn put_uses_configured_cid_version() {
    let node = MockIpfsNode::start().await;
    let store = make_store_with(AppConfigData {
        ipfs_api_url: node.api_url(),
        cid_version: 1,
        ..AppConfigData::default()
    });
    let cid = store.put(b"v1 please".to_vec()).await.expect("put failed");
    assert_eq!(node.last_cid_version(), Some(1));
    assert!(cid.starts_with("bafk"), "{cid}");
}

#[tokio::test]
async fn same_bytes_same_cid() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let first = store.put(b"same".to_vec()).await.unwrap();
    let second = store.put(b"same".to_vec()).await.unwrap();
    let other = store.put(b"different".to_vec()).await.unwrap();
    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[tokio::test]
async fn pin_is_idempotent() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let cid = store.put(b"pin me".to_vec()).await.unwrap();
    store.pin(&cid).await.expect("pin failed");
    store.pin(&cid).await.expect("second pin failed");
    assert_eq!(node.pinned(), vec![cid.to_string()]);
    assert_eq!(list_pinned(&store).await.unwrap(), vec![cid]);
}

#[tokio::test]
async fn pin_failure() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let cid = store.put(b"pin me".to_vec()).await.unwrap();
    node.set_fail_pins(true);
    let err = store.pin(&cid).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::PinFailed(_)), "wrong error type: {err:#?}");
    assert!(err.to_string().contains("pinning refused"), "{err}");
}

#[tokio::test]
async fn get_returns_bytes() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let cid = Cid::from_str(&node.pin_raw(b"\x00binary\xff".to_vec())).unwrap();
    assert_eq!(store.get(&cid).await.unwrap(), b"\x00binary\xff");
}

#[tokio::test]
async fn get_unknown_cid() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let cid = Cid::from_str("QmmockNothingHere").unwrap();
    let err = store.get(&cid).await.expect_err("should fail");
    assert!(
        matches!(err, ContentStoreError::NotFound(ref missing) if *missing == cid),
        "wrong error type: {err:#?}",
    );
}

#[tokio::test]
async fn get_bounded() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let exact = Cid::from_str(&node.pin_raw(vec![b'a'; 16])).unwrap();
    let longer = Cid::from_str(&node.pin_raw(vec![b'b'; 17])).unwrap();

    assert_eq!(store.get_bounded(&exact, 16).await.unwrap().len(), 16);
    let err = store.get_bounded(&longer, 16).await.expect_err("should fail");
    assert!(
        matches!(err, ContentStoreError::TooLarge { limit: 16, .. }),
        "wrong error type: {err:#?}",
    );
}

#[tokio::test]
async fn list_pinned_streams_in_store_order() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    let pinned: Vec<Cid> = (0..5)
        .map(|i| Cid::from_str(&node.pin_raw(format!("blob {i}"))).unwrap())
        .collect();
    node.unpin(&pinned[2]);
    let listed = list_pinned(&store).await.expect("listing failed");
    assert_eq!(
        listed,
        [&pinned[..2], &pinned[3..]].concat(),
    );
}

#[tokio::test]
async fn list_pinned_empty() {
    let node = MockIpfsNode::start().await;
    let store = make_store(node.api_url());
    assert!(list_pinned(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_pinned_node_error() {
    let node = MockIpfsNode::start().await;
    node.set_fail_listing(true);
    let store = make_store(node.api_url());
    let err = store.list_pinned().await.err().expect("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn list_pinned_garbled_entry_ends_listing() {
    let node = MockIpfsNode::start().await;
    node.pin_raw("blob");
    node.set_garbled_listing(true);
    let store = make_store(node.api_url());
    let err = list_pinned(&store).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::Unexpected(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn unreachable_node() {
    let store = make_store(unreachable_api_url());
    let cid = Cid::from_str("QmmockNothingHere").unwrap();

    let err = store.put(b"lost".to_vec()).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");
    let err = store.pin(&cid).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");
    let err = store.get(&cid).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");
    let err = store.list_pinned().await.err().expect("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn slow_node_times_out() {
    let node = MockIpfsNode::start().await;
    let cid = Cid::from_str(&node.pin_raw("slow blob")).unwrap();
    node.set_cat_delay(Some(Duration::from_secs(3)));
    let store = make_store_with(AppConfigData {
        ipfs_api_url: node.api_url(),
        store_timeout_ms: 200,
        ..AppConfigData::default()
    });
    let err = store.get(&cid).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn listing_outlives_store_timeout() {
    let node = MockIpfsNode::start().await;
    let first = node.pin_raw("first blob");
    let second = node.pin_raw("second blob");
    let store = make_store(node.api_url());

    let listing = store.list_pinned().await.expect("listing failed");
    tokio::time::sleep(Duration::from_millis(700)).await;
    let pinned: Vec<Cid> = listing.try_collect().await.expect("listing broke off");
    assert_eq!(
        pinned.iter().map(|cid| cid.to_string()).collect::<Vec<_>>(),
        vec![first, second],
    );
}

#[tokio::test]
async fn https_node_urls_are_dialed() {
    let node = MockIpfsNode::start().await;
    // a plain http server on the other end, so the tls handshake fails
    let store = make_store(node.api_url().replacen("http://", "https://", 1));
    let err = store.put(b"over tls".to_vec()).await.expect_err("should fail");
    assert!(matches!(err, ContentStoreError::Unavailable(_)), "wrong error type: {err:#?}");

    let mut chain = Vec::new();
    let mut source: Option<&dyn std::error::Error> = Some(&err);
    while let Some(e) = source {
        chain.push(e.to_string());
        source = e.source();
    }
    assert!(
        chain.iter().all(|message| !message.contains("scheme is not http")),
        "client built without tls: {chain:#?}",
    );
}

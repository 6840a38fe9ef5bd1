//! Reconciling refetch after a commit.

use storefront_sync::{MutationRequest, Outcome, PublishOrigin, RemoteError, RemoteOp};

use crate::support::{self, bag, counts, shawl};

#[tokio::test]
async fn failed_refetch_keeps_patch_and_flags_stale() {
    let h = support::cart(vec![shawl(2), bag(1)]);
    let cart = h.controller.refetch().await.unwrap();
    h.remote
        .fail_next(RemoteOp::FetchCart, RemoteError::Network("gateway timeout".into()));

    let outcome = h.controller.execute(MutationRequest::remove("p2"), cart).await;

    assert_eq!(outcome, Outcome::Committed);
    let entry = h.controller.entry();
    assert!(entry.stale);
    assert_eq!(entry.origin, PublishOrigin::Optimistic);
    assert_eq!(entry.collection.unwrap().ids(), vec!["p1"]);

    // A later successful fetch clears the flag.
    h.controller.load().await.unwrap();
    let entry = h.controller.entry();
    assert!(!entry.stale);
    assert_eq!(entry.origin, PublishOrigin::Fetch);
}

#[tokio::test]
async fn refetch_supersedes_the_optimistic_patch() {
    let h = support::cart(vec![shawl(2)]);
    let cart = h.controller.refetch().await.unwrap();
    // Another device adds a line between our fetch and our mutation.
    h.remote.set_cart(vec![shawl(2), bag(4)]);

    let outcome = h
        .controller
        .execute(MutationRequest::update_quantity("p1", 1), cart)
        .await;

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(
        counts(&h.controller.current().unwrap()),
        vec![("p1".to_string(), 1), ("p2".to_string(), 4)]
    );
}

#[tokio::test]
async fn submit_loads_an_unfetched_collection() {
    let h = support::cart(vec![shawl(2)]);
    assert!(h.controller.current().is_none());

    let outcome = h
        .controller
        .submit(MutationRequest::update_quantity("p1", 4))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(h.remote.calls(RemoteOp::FetchCart), 2);
    assert_eq!(h.controller.current().unwrap().get("p1").unwrap().count, 4);
}

#[tokio::test]
async fn every_publish_bumps_the_version() {
    let h = support::cart(vec![shawl(2)]);
    let fetched = h.controller.refetch().await.unwrap();
    assert_eq!(h.controller.entry().version, 1);

    h.remote
        .fail_next(RemoteOp::UpdateQuantity, RemoteError::Validation("bad count".into()));
    h.controller
        .execute(MutationRequest::update_quantity("p1", 9), fetched.clone())
        .await;
    assert_eq!(h.controller.entry().version, 3);

    h.cache.clear().unwrap();
    let entry = h.controller.entry();
    assert!(entry.collection.is_none());
    assert_eq!(entry.version, 4);
}

//! Overlapping mutations on one collection.

use std::time::Duration;

use storefront_sync::{
    ConcurrencyPolicy, MutationRequest, Outcome, PublishOrigin, RemoteError, RemoteOp,
};

use crate::support::{self, bag, counts, shawl};

#[tokio::test]
async fn serialized_mutations_snapshot_settled_state() {
    let h = support::cart(vec![shawl(2), bag(1)]);
    h.controller.refetch().await.unwrap();
    let hold = h.remote.hold(RemoteOp::RemoveCartItem);
    h.remote
        .fail_next(RemoteOp::RemoveCartItem, RemoteError::Network("timeout".into()));
    let mut updates = h.controller.subscribe();

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.submit(MutationRequest::remove("p1")).await })
    };
    updates
        .wait_for(|entry| entry.origin == PublishOrigin::Optimistic)
        .await
        .unwrap();

    let second = {
        let controller = h.controller.clone();
        tokio::spawn(async move {
            controller
                .submit(MutationRequest::update_quantity("p2", 5))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.remote.calls(RemoteOp::UpdateQuantity), 0);
    // one applying, one waiting
    assert_eq!(h.controller.queue().pending("cart").unwrap(), 2);
    let applying = h.controller.queue().applying("cart").unwrap().unwrap();
    assert_eq!(applying.request, Some(MutationRequest::remove("p1")));

    hold.release();
    assert!(matches!(first.await.unwrap().unwrap(), Outcome::RolledBack { .. }));
    assert_eq!(second.await.unwrap().unwrap(), Outcome::Committed);

    assert_eq!(
        counts(&h.controller.current().unwrap()),
        vec![("p1".to_string(), 2), ("p2".to_string(), 5)]
    );
    assert_eq!(h.controller.queue().pending("cart").unwrap(), 0);
}

#[tokio::test]
async fn unordered_mutations_race_and_last_rollback_wins() {
    let h = support::cart_with_policy(vec![shawl(2), bag(1)], ConcurrencyPolicy::Unordered);
    h.controller.refetch().await.unwrap();
    let hold = h.remote.hold(RemoteOp::RemoveCartItem);
    h.remote
        .fail_next(RemoteOp::RemoveCartItem, RemoteError::Network("timeout".into()));
    let mut updates = h.controller.subscribe();

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.submit(MutationRequest::remove("p1")).await })
    };
    updates
        .wait_for(|entry| entry.origin == PublishOrigin::Optimistic)
        .await
        .unwrap();

    // Runs to completion while the removal is still in flight.
    let second = h
        .controller
        .submit(MutationRequest::update_quantity("p2", 5))
        .await
        .unwrap();
    assert_eq!(second, Outcome::Committed);
    assert_eq!(
        counts(&h.controller.current().unwrap()),
        vec![("p1".to_string(), 2), ("p2".to_string(), 5)]
    );

    hold.release();
    assert!(matches!(first.await.unwrap().unwrap(), Outcome::RolledBack { .. }));

    // The stale snapshot overwrote the committed quantity.
    assert_eq!(
        counts(&h.controller.current().unwrap()),
        vec![("p1".to_string(), 2), ("p2".to_string(), 1)]
    );
    assert_eq!(h.remote.cart_items()[1].count, 5);
}

#[tokio::test]
async fn collections_do_not_block_each_other() {
    let cart = support::cart(vec![shawl(1)]);
    let wishlist = support::wishlist(
        Vec::new(),
        vec![storefront_sync::Product::new("p9", "Canvas Tote", 250.0)],
    );
    // shared queue, separate keys
    let wishlist_controller = std::sync::Arc::new(
        storefront_sync::MutationController::new(
            storefront_sync::WishlistTarget::new(std::sync::Arc::new(wishlist.remote.clone())),
            &wishlist.cache,
            std::sync::Arc::new(wishlist.notifier.clone()),
        )
        .unwrap()
        .with_queue(cart.controller.queue().clone()),
    );
    cart.controller.refetch().await.unwrap();
    let hold = cart.remote.hold(RemoteOp::RemoveCartItem);

    let removal = {
        let controller = cart.controller.clone();
        tokio::spawn(async move { controller.submit(MutationRequest::remove("p1")).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let added = tokio::time::timeout(
        Duration::from_secs(1),
        wishlist_controller.submit(MutationRequest::add_to_wishlist("p9")),
    )
    .await
    .expect("wishlist mutation waited on the cart")
    .unwrap();
    assert_eq!(added, Outcome::Committed);

    hold.release();
    assert_eq!(removal.await.unwrap().unwrap(), Outcome::Committed);
}

//! End-to-end walkthroughs of single mutations.

use storefront_sync::{
    MutationRequest, NotificationLevel, Outcome, Product, PublishOrigin, RemoteError, RemoteOp,
};

use crate::support::{self, counts, shawl};

#[tokio::test]
async fn quantity_update_commits_and_refetches() {
    let h = support::cart(vec![shawl(2)]);
    let cart = h.controller.refetch().await.unwrap();

    let outcome = h
        .controller
        .execute(MutationRequest::update_quantity("p1", 3), cart)
        .await;

    assert_eq!(outcome, Outcome::Committed);
    let entry = h.controller.entry();
    assert_eq!(entry.origin, PublishOrigin::Fetch);
    assert!(!entry.stale);
    let visible = entry.collection.unwrap();
    assert_eq!(counts(&visible), vec![("p1".to_string(), 3)]);
    assert_eq!(visible.get("p1").unwrap().price, 100.0);

    assert_eq!(h.remote.calls(RemoteOp::UpdateQuantity), 1);
    assert_eq!(h.remote.calls(RemoteOp::FetchCart), 2);
    assert_eq!(h.remote.cart_items()[0].count, 3);

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Success);
    assert_eq!(notifications[0].message, "Product quantity updated");
}

#[tokio::test]
async fn failed_remove_reverts_the_cart() {
    let h = support::cart(vec![shawl(2)]);
    let cart = h.controller.refetch().await.unwrap();
    h.remote.fail_next(
        RemoteOp::RemoveCartItem,
        RemoteError::Network("connection refused".into()),
    );

    let outcome = h.controller.execute(MutationRequest::remove("p1"), cart).await;

    assert_eq!(
        outcome,
        Outcome::RolledBack {
            error: RemoteError::Network("connection refused".into())
        }
    );
    assert_eq!(
        counts(&h.controller.current().unwrap()),
        vec![("p1".to_string(), 2)]
    );
    // no reconciling fetch after a rollback
    assert_eq!(h.remote.calls(RemoteOp::FetchCart), 1);

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Failure);
    assert_eq!(
        notifications[0].message,
        "Failed to remove product: check your connection and try again"
    );
}

#[tokio::test]
async fn wishlist_add_shows_placeholder_then_server_item() {
    let h = support::wishlist(Vec::new(), vec![Product::new("p9", "Canvas Tote", 250.0)]);
    let wishlist = h.controller.refetch().await.unwrap();
    assert!(wishlist.is_empty());
    let hold = h.remote.hold(RemoteOp::AddWishlistItem);
    let mut updates = h.controller.subscribe();

    let call = {
        let controller = h.controller.clone();
        tokio::spawn(async move {
            controller
                .execute(MutationRequest::add_to_wishlist("p9"), wishlist)
                .await
        })
    };

    let placeholder = updates
        .wait_for(|entry| entry.origin == PublishOrigin::Optimistic)
        .await
        .unwrap()
        .collection
        .clone()
        .unwrap();
    assert_eq!(placeholder.ids(), vec!["p9"]);
    assert_eq!(placeholder.get("p9").unwrap().title, "");

    hold.release();
    assert_eq!(call.await.unwrap(), Outcome::Committed);

    let reconciled = h.controller.current().unwrap();
    assert_eq!(reconciled.ids(), vec!["p9"]);
    assert_eq!(reconciled.get("p9").unwrap().title, "Canvas Tote");
    assert_eq!(reconciled.get("p9").unwrap().price, 250.0);
    assert_eq!(
        h.notifier.notifications()[0].message,
        "Product added successfully to your Wishlist"
    );
}

#[tokio::test]
async fn wishlist_remove_rolls_back_on_auth_failure() {
    let h = support::wishlist(
        vec![storefront_sync::WishlistItem::new("p9", "Canvas Tote", 250.0)],
        Vec::new(),
    );
    let outcome = {
        h.remote
            .fail_next(RemoteOp::RemoveWishlistItem, RemoteError::Auth("expired".into()));
        h.controller
            .submit(MutationRequest::remove_from_wishlist("p9"))
            .await
            .unwrap()
    };

    assert!(!outcome.is_committed());
    assert_eq!(h.controller.current().unwrap().ids(), vec!["p9"]);
    assert_eq!(
        h.notifier.notifications()[0].message,
        "Error deleting product: please sign in again"
    );
}

//! End-to-end widget flows through the real `Store`
//!
//! Time is paused so the error banner timer can be driven exactly.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use checkout_upsell::mocks::{MockCatalog, MockOrderService};
use checkout_upsell::order_feed::forward_order_lines;
use checkout_upsell::types::{Money, OfferCandidate, OrderLine, PurchasableUnit, PurchasableUnitId, RegionCode};
use checkout_upsell::{
    FetchError, MutationOutcome, UpsellAction, UpsellConfig, UpsellEnvironment, UpsellReducer, UpsellState,
    UpsellStore, ERROR_DISMISS,
};
use checkout_upsell_testing::test_clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_test::assert_ok;

// ============================================================================
// Test Fixtures
// ============================================================================

struct Harness {
    store: UpsellStore,
    catalog: Arc<MockCatalog>,
    orders: Arc<MockOrderService>,
}

fn harness(catalog: MockCatalog, orders: MockOrderService) -> Harness {
    harness_with_state(catalog, orders, UpsellState::new("USD".into(), "en-US".into()))
}

fn harness_with_state(catalog: MockCatalog, orders: MockOrderService, state: UpsellState) -> Harness {
    let catalog = Arc::new(catalog);
    let orders = Arc::new(orders);
    let env = UpsellEnvironment::new(
        catalog.clone(),
        orders.clone(),
        Arc::new(test_clock()),
        UpsellConfig::default(),
    );

    Harness {
        store: UpsellStore::new(state, UpsellReducer::new(), env),
        catalog,
        orders,
    }
}

fn offer(id: &str, unit: &str, amount: &str) -> OfferCandidate {
    OfferCandidate::new(
        id,
        format!("Product {id}"),
        PurchasableUnit {
            id: PurchasableUnitId::new(unit),
            price: Money::new(amount, "USD"),
        },
    )
}

fn add(unit: &str) -> UpsellAction {
    UpsellAction::AddToOrder {
        unit_id: PurchasableUnitId::new(unit),
    }
}

/// Send an action and wait for the effects it started
async fn settle(store: &UpsellStore, action: UpsellAction) {
    let mut handle = assert_ok!(store.send(action).await);
    assert_ok!(handle.wait_with_timeout(Duration::from_secs(5)).await);
}

async fn show_error(store: &UpsellStore) -> bool {
    store.state(|s| s.show_error).await
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test(start_paused = true)]
async fn catalog_failure_settles_to_nothing_shown() {
    let h = harness(
        MockCatalog::new().with_failure(FetchError::Transport("connection refused".into())),
        MockOrderService::new(),
    );

    settle(&h.store, UpsellAction::Activate).await;

    let output = h.store.state(UpsellState::render).await;
    assert!(!output.loading);
    assert_eq!(output.offer, None);
    assert_eq!(h.catalog.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn loading_is_visible_while_fetch_is_outstanding() {
    let h = harness(
        MockCatalog::new()
            .with_offers(vec![offer("P1", "V1", "3.00")])
            .with_latency(Duration::from_millis(200)),
        MockOrderService::new(),
    );

    let mut handle = h.store.send(UpsellAction::Activate).await.unwrap();
    assert!(h.store.state(|s| s.loading).await);

    handle.wait().await;
    assert!(!h.store.state(|s| s.loading).await);
    assert_eq!(h.store.state(|s| s.candidates.len()).await, 1);
}

#[tokio::test(start_paused = true)]
async fn activation_fetches_once_with_upsell_batch() {
    let h = harness(MockCatalog::new(), MockOrderService::new());

    settle(&h.store, UpsellAction::Activate).await;
    settle(&h.store, UpsellAction::Activate).await;
    settle(
        &h.store,
        UpsellAction::OrderLinesChanged {
            lines: vec![OrderLine::new("L1", "V9", 1)],
        },
    )
    .await;

    let queries = h.catalog.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].region, RegionCode::US);
    assert_eq!(queries[0].batch_size, 5);
    assert_eq!(queries[0].tag, "upsell");
}

#[tokio::test(start_paused = true)]
async fn locale_change_refetches_for_new_region_only() {
    let h = harness(MockCatalog::new(), MockOrderService::new());
    settle(&h.store, UpsellAction::Activate).await;

    let french = UpsellAction::LocaleChanged {
        currency: "EUR".into(),
        language: "fr-FR".into(),
    };
    settle(&h.store, french.clone()).await;
    settle(&h.store, french).await;

    let regions: Vec<_> = h.catalog.queries().iter().map(|q| q.region).collect();
    assert_eq!(regions, vec![RegionCode::US, RegionCode::FR]);
}

#[tokio::test(start_paused = true)]
async fn result_for_superseded_region_is_discarded() {
    let catalog = MockCatalog::new().with_latency(Duration::from_millis(100));
    catalog.push_response(Ok(vec![offer("US-1", "V1", "1.00")]));
    catalog.push_response(Ok(vec![offer("DE-1", "V2", "1.00")]));
    let h = harness(catalog, MockOrderService::new());

    let mut first = h.store.send(UpsellAction::Activate).await.unwrap();
    let mut second = h
        .store
        .send(UpsellAction::LocaleChanged {
            currency: "EUR".into(),
            language: "de-DE".into(),
        })
        .await
        .unwrap();
    first.wait().await;
    second.wait().await;

    let ids: Vec<String> = h
        .store
        .state(|s| s.candidates.iter().map(|c| c.id.to_string()).collect())
        .await;
    assert_eq!(ids, vec!["DE-1"]);
    assert!(!h.store.state(|s| s.loading).await);
}

// ============================================================================
// Synchronization and selection
// ============================================================================

#[tokio::test(start_paused = true)]
async fn offer_already_in_order_is_skipped() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P1", "V1", "4.00"), offer("P2", "V2", "10.00")]),
        MockOrderService::new(),
    );

    settle(
        &h.store,
        UpsellAction::OrderLinesChanged {
            lines: vec![OrderLine::new("L1", "V1", 1)],
        },
    )
    .await;
    settle(&h.store, UpsellAction::Activate).await;

    let output = h.store.state(UpsellState::render).await;
    let shown = output.offer.expect("P2 should be offered");
    assert_eq!(shown.id.as_str(), "P2");
    assert_eq!(shown.formatted_price, "$10.00");
}

#[tokio::test(start_paused = true)]
async fn order_feed_drives_selection() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P1", "V1", "4.00"), offer("P2", "V2", "10.00")]),
        MockOrderService::new(),
    );
    settle(&h.store, UpsellAction::Activate).await;

    let (tx, rx) = watch::channel(Vec::new());
    let feed = forward_order_lines(h.store.clone(), rx);
    tx.send_replace(vec![OrderLine::new("L1", "V1", 1), OrderLine::new("L2", "V2", 1)]);
    drop(tx);
    feed.await.unwrap();

    assert_eq!(h.store.state(|s| s.selection().cloned()).await, None);
    assert_eq!(h.catalog.calls(), 1);
}

// ============================================================================
// Mutation and error banner
// ============================================================================

#[tokio::test(start_paused = true)]
async fn failed_add_shows_banner_for_three_seconds() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00")]),
        MockOrderService::new()
            .with_outcome(MutationOutcome::Error {
                message: "invalid merchandise id".into(),
            })
            .with_latency(Duration::from_millis(10)),
    );
    settle(&h.store, UpsellAction::Activate).await;

    let mut handle = h.store.send(add("V2")).await.unwrap();
    assert!(h.store.state(|s| s.adding).await);
    handle.wait().await;

    let before = h.store.state(UpsellState::clone).await;
    assert!(!before.adding);
    assert!(before.show_error);
    assert!(h.store.is_running(&ERROR_DISMISS));

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert!(show_error(&h.store).await);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let after = h.store.state(UpsellState::clone).await;
    assert!(!after.show_error);
    assert!(!h.store.is_running(&ERROR_DISMISS));

    // Nothing else moved when the banner cleared.
    assert_eq!(
        UpsellState {
            show_error: true,
            ..after
        },
        before
    );
    assert_eq!(h.orders.changes()[0].unit_id.as_str(), "V2");
    assert_eq!(h.orders.changes()[0].quantity, 1);
}

#[tokio::test(start_paused = true)]
async fn new_error_restarts_the_banner_timer() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00")]),
        MockOrderService::new().with_outcome(MutationOutcome::Error {
            message: "out of stock".into(),
        }),
    );
    settle(&h.store, UpsellAction::Activate).await;

    settle(&h.store, add("V2")).await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    settle(&h.store, add("V2")).await;

    // First timer would have fired at 3000 ms.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(show_error(&h.store).await);

    // Restarted timer fires at 5000 ms.
    tokio::time::sleep(Duration::from_millis(1501)).await;
    assert!(!show_error(&h.store).await);
    assert_eq!(h.orders.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn guarded_double_submit_issues_one_request() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00")]),
        MockOrderService::new().with_latency(Duration::from_millis(500)),
    );
    settle(&h.store, UpsellAction::Activate).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let output = h.store.state(UpsellState::render).await;
        if let Some(action) = output.add_action() {
            handles.push(h.store.send(action).await.unwrap());
        }
    }
    assert_eq!(handles.len(), 1);

    // A caller that skips the guard is still dropped by the reducer.
    handles.push(h.store.send(add("V2")).await.unwrap());

    futures::future::join_all(handles.iter_mut().map(|handle| handle.wait())).await;
    assert_eq!(h.orders.calls(), 1);
    assert!(!h.store.state(|s| s.adding).await);
}

#[tokio::test(start_paused = true)]
async fn successful_add_broadcasts_updated_order() {
    let lines = vec![OrderLine::new("L1", "V2", 1)];
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00"), offer("P3", "V3", "2.00")]),
        MockOrderService::new().with_outcome(MutationOutcome::Success { lines: lines.clone() }),
    );
    settle(&h.store, UpsellAction::Activate).await;

    let result = h
        .store
        .send_and_wait_for(
            add("V2"),
            |action| matches!(action, UpsellAction::MutationSucceeded { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, UpsellAction::MutationSucceeded { lines });
    while h.store.state(|s| s.adding).await {
        tokio::task::yield_now().await;
    }
    let output = h.store.state(UpsellState::render).await;
    assert!(!output.adding);
    assert!(!output.show_error);
    assert_eq!(output.offer.map(|o| o.id.to_string()), Some("P3".to_string()));
}

#[tokio::test(start_paused = true)]
async fn deactivate_cancels_pending_banner() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00")]),
        MockOrderService::new().with_outcome(MutationOutcome::Error { message: "nope".into() }),
    );
    settle(&h.store, UpsellAction::Activate).await;
    settle(&h.store, add("V2")).await;
    assert!(h.store.is_running(&ERROR_DISMISS));

    settle(&h.store, UpsellAction::Deactivate).await;
    tokio::task::yield_now().await;

    assert!(!show_error(&h.store).await);
    assert!(!h.store.is_running(&ERROR_DISMISS));
    assert!(!h.store.state(|s| s.active).await);
}

#[tokio::test(start_paused = true)]
async fn deactivate_during_failed_add_shows_no_banner() {
    let h = harness(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00")]),
        MockOrderService::new()
            .with_outcome(MutationOutcome::Error { message: "nope".into() })
            .with_latency(Duration::from_millis(100)),
    );
    settle(&h.store, UpsellAction::Activate).await;

    let mut pending = h.store.send(add("V2")).await.unwrap();
    assert!(h.store.state(|s| s.adding).await);
    settle(&h.store, UpsellAction::Deactivate).await;
    assert_ok!(pending.wait_with_timeout(Duration::from_secs(1)).await);

    let state = h.store.state(UpsellState::clone).await;
    assert!(!state.active);
    assert!(!state.adding);
    assert!(!state.show_error);
    assert!(state.last_failure.is_some());
    assert!(!h.store.is_running(&ERROR_DISMISS));
    assert_eq!(h.orders.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_aborts_banner_timer() {
    let h = harness_with_state(
        MockCatalog::new().with_offers(vec![offer("P2", "V2", "10.00")]),
        MockOrderService::new().with_outcome(MutationOutcome::Error { message: "nope".into() }),
        UpsellState::default(),
    );
    settle(&h.store, UpsellAction::Activate).await;
    settle(&h.store, add("V2")).await;

    assert_ok!(h.store.shutdown(Duration::from_secs(1)).await);
    assert!(!h.store.is_running(&ERROR_DISMISS));
    assert!(h.store.send(UpsellAction::Deactivate).await.is_err());
}

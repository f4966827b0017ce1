//! Integration tests for the paged list controller.

mod support;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;

use carecms_admin::controller::{ListStatus, LoadOutcome, PagedListController, RowUpdate};
use carecms_admin::notify::{NotificationBus, NotificationLevel};
use carecms_admin::screens;
use carecms_core::mutation::MutationCommand;
use carecms_core::types::{is_active, record_id, RecordId};

use support::FakeGateway;

fn languages(count: i64) -> Arc<FakeGateway> {
    let gateway = FakeGateway::new();
    gateway.seed_numbered("language_masters", "language_name", "Language", count);
    gateway
}

fn ids(rows: &[carecms_core::types::Record]) -> Vec<RecordId> {
    rows.iter().filter_map(record_id).collect()
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Mounting loads page 1 with the screen's search fields and page size.
#[tokio::test]
async fn mount_loads_first_page() {
    let gateway = languages(27);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    let outcome = controller.mount().await.unwrap();
    assert_eq!(outcome, LoadOutcome::Committed);

    let state = controller.snapshot();
    assert_eq!(state.status, ListStatus::Loaded);
    assert_eq!(state.rows.len(), 10);
    assert_eq!(state.total_count, 27);
    assert_eq!(state.total_pages(), 3);
    assert_eq!(state.serial(0), 1);

    let queries = gateway.queries();
    assert_eq!(queries.len(), 1);
    let body = serde_json::to_value(&queries[0]).unwrap();
    assert_eq!(
        body,
        json!({
            "modelName": "language_masters",
            "search": {"field_name": ["language_name"], "searchKeyword": ""},
            "pagination": {"page": 1, "pageSize": 10},
        })
    );
}

/// Serial numbers continue across pages.
#[tokio::test]
async fn later_pages_continue_serials() {
    let gateway = languages(27);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    controller.set_page(3).await.unwrap();

    let state = controller.snapshot();
    assert_eq!(state.current_page, 3);
    assert_eq!(state.rows.len(), 7);
    assert_eq!(state.serial(0), 21);
    assert_eq!(ids(&state.rows)[0], RecordId::Int(21));
}

/// Changing the page size always goes back to page 1.
#[tokio::test]
async fn page_size_change_resets_to_first_page() {
    let gateway = languages(60);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    controller.set_page(3).await.unwrap();
    controller.set_page_size(25).await.unwrap();

    let state = controller.snapshot();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.page_size, 25);
    assert_eq!(state.rows.len(), 25);

    let last = gateway.queries().pop().unwrap();
    let pagination = last.pagination.unwrap();
    assert_eq!((pagination.page(), pagination.page_size()), (1, 25));
}

/// A new keyword always goes back to page 1.
#[tokio::test]
async fn search_resets_to_first_page() {
    let gateway = languages(30);
    let controller = PagedListController::builder(Arc::clone(&gateway), &screens::LANGUAGES)
        .page_size(5)
        .build();

    controller.set_page(4).await.unwrap();
    controller.search("Language 2").await.unwrap();

    let state = controller.snapshot();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.keyword, "Language 2");
    // "Language 2" and "Language 20".."Language 29"
    assert_eq!(state.total_count, 11);
    assert_eq!(gateway.queries().last().unwrap().keyword(), "Language 2");
}

/// Filters are sent as an equality condition on every query.
#[tokio::test]
async fn builder_filter_goes_into_where_condition() {
    let gateway = FakeGateway::new();
    let controller = PagedListController::builder(Arc::clone(&gateway), &screens::FAQS)
        .filter("is_active", 1)
        .build();

    controller.mount().await.unwrap();

    let query = gateway.queries().pop().unwrap();
    assert_eq!(query.where_condition.unwrap()["is_active"], json!(1));
}

// ---------------------------------------------------------------------------
// Ordering and teardown
// ---------------------------------------------------------------------------

/// A slow response to an older request never overwrites a newer one.
#[tokio::test(start_paused = true)]
async fn stale_responses_are_dropped() {
    let gateway = languages(30);
    gateway.delay_lists([Duration::from_millis(300), Duration::from_millis(10)]);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    let (slow, fast) = tokio::join!(controller.set_page(2), controller.set_page(3));

    assert_eq!(slow.unwrap(), LoadOutcome::Stale);
    assert_eq!(fast.unwrap(), LoadOutcome::Committed);

    let state = controller.snapshot();
    assert_eq!(state.current_page, 3);
    assert_eq!(ids(&state.rows)[0], RecordId::Int(21));
    assert_eq!(state.status, ListStatus::Loaded);
}

/// A slow search for an older keyword never overwrites a newer one.
#[tokio::test(start_paused = true)]
async fn stale_search_results_are_dropped() {
    let gateway = FakeGateway::new();
    gateway.seed(
        "language_masters",
        json!([
            {"id": 1, "language_name": "foo one", "is_active": 1},
            {"id": 2, "language_name": "foo two", "is_active": 1},
            {"id": 3, "language_name": "bar one", "is_active": 1},
        ]),
    );
    gateway.delay_lists([Duration::from_millis(300), Duration::from_millis(10)]);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    let (foo, bar) = tokio::join!(controller.search("foo"), controller.search("bar"));

    assert_eq!(foo.unwrap(), LoadOutcome::Stale);
    assert_eq!(bar.unwrap(), LoadOutcome::Committed);

    let state = controller.snapshot();
    assert_eq!(state.keyword, "bar");
    assert_eq!(state.total_count, 1);
    assert_eq!(ids(&state.rows), vec![RecordId::Int(3)]);
}

/// Unmounting while a load is in flight leaves the state untouched, and
/// nothing is sent afterwards.
#[tokio::test(start_paused = true)]
async fn unmount_cancels_in_flight_and_later_loads() {
    let gateway = languages(30);
    gateway.delay_lists([Duration::from_millis(200)]);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.mount().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.unmount();

    assert_eq!(pending.await.unwrap().unwrap(), LoadOutcome::Cancelled);
    assert!(controller.snapshot().rows.is_empty());

    assert_eq!(controller.set_page(2).await.unwrap(), LoadOutcome::Cancelled);
    assert_eq!(gateway.queries().len(), 1);
}

/// A failed load surfaces an error status; retrying recovers.
#[tokio::test]
async fn failed_load_then_retry() {
    let gateway = languages(3);
    gateway.fail_lists(1);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);

    assert!(controller.mount().await.is_err());
    assert_eq!(
        controller.snapshot().status,
        ListStatus::Error("Internal Server Error".into())
    );

    controller.refresh().await.unwrap();
    let state = controller.snapshot();
    assert_eq!(state.status, ListStatus::Loaded);
    assert_eq!(state.rows.len(), 3);
}

// ---------------------------------------------------------------------------
// Row actions
// ---------------------------------------------------------------------------

/// Toggling patches only the affected row, without a re-query.
#[tokio::test]
async fn toggle_patches_row_in_place() {
    let gateway = languages(3);
    let bus = NotificationBus::default();
    let mut notifications = bus.subscribe();
    let controller = PagedListController::builder(Arc::clone(&gateway), &screens::LANGUAGES)
        .notifications(bus)
        .build();
    controller.mount().await.unwrap();
    let before = controller.snapshot().rows;

    let update = controller.toggle(RecordId::Int(2), false).await.unwrap();
    assert_eq!(update, RowUpdate::Patched);

    let after = controller.snapshot().rows;
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert!(!is_active(&after[1]));
    assert_eq!(after[1]["language_name"], before[1]["language_name"]);

    assert_eq!(gateway.queries().len(), 1);
    assert_eq!(
        gateway.commands(),
        vec![MutationCommand::toggle("language_masters", RecordId::Int(2), false)]
    );
    assert_eq!(
        notifications.recv().await.unwrap().level,
        NotificationLevel::Success
    );
}

/// A rejected toggle leaves the row as it was and publishes the error.
#[tokio::test]
async fn toggle_failure_keeps_row_and_notifies() {
    let gateway = languages(3);
    gateway.fail_upserts_for(RecordId::Int(1));
    let bus = NotificationBus::default();
    let mut notifications = bus.subscribe();
    let controller = PagedListController::builder(Arc::clone(&gateway), &screens::LANGUAGES)
        .notifications(bus)
        .build();
    controller.mount().await.unwrap();
    let before = controller.snapshot().rows;

    let err = controller.toggle(RecordId::Int(1), false).await.unwrap_err();
    assert_eq!(err.user_message(), "Record 1 is locked");
    assert_eq!(controller.snapshot().rows, before);

    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.text, "Record 1 is locked");
}

/// Renaming changes a searched field, so the page is re-queried.
#[tokio::test]
async fn edit_touching_search_field_requeries() {
    let gateway = languages(3);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::LANGUAGES);
    controller.mount().await.unwrap();

    let command = MutationCommand::update("language_masters", RecordId::Int(3))
        .set("language_name", "Castilian");
    let saved = carecms_client::MasterGateway::upsert(&gateway, &command)
        .await
        .unwrap();

    let update = controller.apply_saved(&command, saved).await.unwrap();
    assert_matches!(update, RowUpdate::Requeried(LoadOutcome::Committed));
    assert_eq!(gateway.queries().len(), 2);
    assert_eq!(controller.snapshot().rows[2]["language_name"], json!("Castilian"));
}

// ---------------------------------------------------------------------------
// Infinite scroll
// ---------------------------------------------------------------------------

/// Append-mode screens accumulate pages until everything is loaded.
#[tokio::test]
async fn load_more_appends_until_exhausted() {
    let gateway = FakeGateway::new();
    gateway.seed_numbered("subscription_masters", "name", "Plan", 15);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::SUBSCRIPTIONS);

    controller.mount().await.unwrap();
    assert_eq!(controller.snapshot().rows.len(), 10);

    let more = controller.load_more().await;
    assert_matches!(more, Some(Ok(LoadOutcome::Committed)));
    let state = controller.snapshot();
    assert_eq!(state.rows.len(), 15);
    assert_eq!(state.current_page, 2);

    assert!(controller.load_more().await.is_none());
    assert_eq!(gateway.queries().len(), 2);

    controller.refresh().await.unwrap();
    let state = controller.snapshot();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.rows.len(), 10);
}

fn subscriptions(count: i64) -> Arc<FakeGateway> {
    let gateway = FakeGateway::new();
    gateway.seed_numbered("subscription_masters", "name", "Plan", count);
    gateway
}

fn id_range(from: i64, to: i64) -> Vec<RecordId> {
    (from..=to).map(RecordId::Int).collect()
}

/// A failed append leaves the page counter alone, so the next call
/// fetches the same page again.
#[tokio::test]
async fn failed_load_more_is_retried_from_same_page() {
    let gateway = subscriptions(30);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::SUBSCRIPTIONS);
    controller.mount().await.unwrap();

    gateway.fail_lists(1);
    assert_matches!(controller.load_more().await, Some(Err(_)));
    let state = controller.snapshot();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.rows.len(), 10);

    assert_matches!(controller.load_more().await, Some(Ok(LoadOutcome::Committed)));
    let state = controller.snapshot();
    assert_eq!(state.current_page, 2);
    assert_eq!(ids(&state.rows), id_range(1, 20));

    let retried = gateway.queries()[2].pagination.unwrap();
    assert_eq!(retried.page(), 2);
}

/// Only one append runs at a time; a second request while one is in
/// flight is refused and no page is skipped.
#[tokio::test(start_paused = true)]
async fn overlapping_load_more_does_not_skip_pages() {
    let gateway = subscriptions(30);
    let controller = PagedListController::new(Arc::clone(&gateway), &screens::SUBSCRIPTIONS);
    controller.mount().await.unwrap();
    gateway.delay_lists([Duration::from_millis(300)]);

    let (first, second) = tokio::join!(controller.load_more(), controller.load_more());

    assert_matches!(first, Some(Ok(LoadOutcome::Committed)));
    assert!(second.is_none());
    assert_eq!(ids(&controller.snapshot().rows), id_range(1, 20));

    assert_matches!(controller.load_more().await, Some(Ok(LoadOutcome::Committed)));
    let state = controller.snapshot();
    assert_eq!(ids(&state.rows), id_range(1, 30));
    assert_eq!(state.current_page, 3);
    assert!(!state.has_more());
    assert_eq!(gateway.queries().len(), 3);
}

//! List controller lifecycle: supersession, debouncing, page resets and
//! loading-indicator selection, driven through a scripted source.

mod common;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use agent_admin::list::{
    AgentFilters, ControllerOptions, Debouncer, FetchOutcome, ListController, ListPhase,
    ListSource, LoadingIndicator, Optimistic,
};
use agent_admin::models::agent::Agent;
use agent_admin::models::pagination::{ListQuery, ListResponse};
use agent_admin::{AppError, AppResult};
use common::{agent, page_of, scripted_controller, RecordingNotifier, ScriptedSource};

// ============================================================================
// Supersession
// ============================================================================

async fn run_three_searches(reply_order: [usize; 3]) {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier.clone());

    let mut handles = Vec::new();
    for (i, term) in ["a", "ag", "age"].into_iter().enumerate() {
        handles.push(ctrl.update_filters(|f| f.search = Some(term.into())).unwrap());
        ctrl.source().wait_for_calls(i + 1).await;
    }

    for index in reply_order {
        let name = format!("result-{index}");
        ctrl.source()
            .respond(index, Ok(page_of(1, 12, 1, vec![agent(index as i64, &name)])));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }
    assert_eq!(
        outcomes,
        vec![FetchOutcome::Discarded, FetchOutcome::Discarded, FetchOutcome::Committed]
    );

    // Superseded calls were aborted, not just ignored.
    assert!(ctrl.source().was_cancelled(0));
    assert!(ctrl.source().was_cancelled(1));
    assert!(!ctrl.source().was_cancelled(2));
    assert_eq!(ctrl.source().query(2).filters["search"], "age");

    let view = ctrl.view();
    assert_eq!(view.commits, 1);
    assert_eq!(view.phase, ListPhase::Ready);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].name, "result-2");
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn test_last_search_wins_when_replies_arrive_in_order() {
    run_three_searches([0, 1, 2]).await;
}

#[tokio::test]
async fn test_last_search_wins_when_replies_arrive_reversed() {
    run_three_searches([2, 1, 0]).await;
}

#[tokio::test]
async fn test_superseded_failure_is_not_shown() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier.clone());

    let first = ctrl.refresh();
    ctrl.source().wait_for_calls(1).await;
    let second = ctrl.update_filters(|f| f.is_active = Some(true)).unwrap();
    ctrl.source().wait_for_calls(2).await;

    ctrl.source().respond(0, Err(AppError::Http("connection reset".into())));
    ctrl.source().respond(1, Ok(page_of(1, 12, 0, vec![])));

    assert_eq!(first.await.unwrap(), FetchOutcome::Discarded);
    assert_eq!(second.await.unwrap(), FetchOutcome::Committed);
    assert!(notifier.errors().is_empty());
    assert!(ctrl.view().error.is_none());
}

#[tokio::test]
async fn test_current_failure_surfaces_message_and_keeps_data() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier.clone());

    let handle = ctrl.refresh();
    ctrl.source().wait_for_calls(1).await;
    ctrl.source()
        .respond(0, Ok(page_of(1, 12, 2, vec![agent(1, "one"), agent(2, "two")])));
    handle.await.unwrap();

    let handle = ctrl.set_page(1);
    ctrl.source().wait_for_calls(2).await;
    ctrl.source().respond(
        1,
        Err(AppError::Api {
            status: 500,
            code: None,
            message: "database unavailable".into(),
        }),
    );
    assert_eq!(handle.await.unwrap(), FetchOutcome::Failed);

    let view = ctrl.view();
    assert_eq!(view.phase, ListPhase::Error);
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.loading, LoadingIndicator::None);
    assert_eq!(notifier.errors(), vec!["Failed to load list: database unavailable".to_string()]);
}

// ============================================================================
// Debounce
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_debounced_search_issues_one_fetch_per_burst() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier);
    let weak = ctrl.downgrade();
    let search = Debouncer::spawn(Duration::from_millis(500), move |text: String| {
        weak.update_filters(|f| f.search = Some(text));
    });

    for text in ["r", "re", "rep", "repo"] {
        search.push(text.to_string());
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    tokio::time::sleep(Duration::from_millis(370)).await;
    assert_eq!(ctrl.source().call_count(), 0);

    tokio::time::sleep(Duration::from_millis(20)).await;
    ctrl.source().wait_for_calls(1).await;
    assert_eq!(ctrl.source().call_count(), 1);
    assert_eq!(ctrl.source().query(0).filters["search"], "repo");

    search.push("report".into());
    tokio::time::sleep(Duration::from_millis(600)).await;
    ctrl.source().wait_for_calls(2).await;
    assert_eq!(ctrl.source().call_count(), 2);
    assert_eq!(ctrl.source().query(1).filters["search"], "report");
}

#[tokio::test(start_paused = true)]
async fn test_pending_search_dies_with_the_screen() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier);
    let weak = ctrl.downgrade();
    let search = Debouncer::spawn(Duration::from_millis(500), move |text: String| {
        weak.update_filters(|f| f.search = Some(text));
    });

    search.push("late".into());
    drop(search);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(ctrl.source().call_count(), 0);
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_filter_change_resets_page_before_fetch() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier);

    let handle = ctrl.refresh();
    ctrl.source().wait_for_calls(1).await;
    ctrl.source().respond(0, Ok(page_of(1, 12, 125, vec![agent(1, "a")])));
    handle.await.unwrap();

    let handle = ctrl.set_page(3);
    ctrl.source().wait_for_calls(2).await;
    assert_eq!(ctrl.source().query(1).page, 3);
    ctrl.source().respond(1, Ok(page_of(3, 12, 125, vec![agent(25, "y")])));
    handle.await.unwrap();
    assert_eq!(ctrl.view().pagination.current_page, 3);

    let handle = ctrl.update_filters(|f| f.ai_model_id = Some(4)).unwrap();
    assert_eq!(ctrl.pagination().current_page, 1);
    ctrl.source().wait_for_calls(3).await;
    let query = ctrl.source().query(2);
    assert_eq!(query.page, 1);
    assert_eq!(query.filters["ai_model_id"], 4);
    ctrl.source().respond(2, Ok(page_of(1, 12, 3, vec![agent(2, "b")])));
    assert_eq!(handle.await.unwrap(), FetchOutcome::Committed);
    assert_eq!(ctrl.view().pagination.total_pages, 1);
}

#[tokio::test]
async fn test_page_size_change_resets_page() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier);

    let _ = ctrl.set_page(4);
    ctrl.source().wait_for_calls(1).await;
    let _ = ctrl.set_page_size(24);
    ctrl.source().wait_for_calls(2).await;

    let query = ctrl.source().query(1);
    assert_eq!(query.page, 1);
    assert_eq!(query.page_size, 24);
}

/// Answers every fetch right away with the page it was asked for.
struct EchoSource;

impl ListSource for EchoSource {
    type Item = Agent;
    type Filters = AgentFilters;
    const NAME: &'static str = "Echo";

    fn fetch(
        &self,
        query: ListQuery,
        _cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<Agent>>> + Send {
        async move {
            tokio::task::yield_now().await;
            let row = agent(i64::from(query.page), "echo");
            Ok(page_of(query.page, query.page_size, 120, vec![row]))
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_filter_change_racing_a_commit_still_requests_page_one() {
    let ctrl = ListController::new(
        EchoSource,
        ControllerOptions::default(),
        Arc::new(RecordingNotifier::default()),
    );

    for round in 0..200 {
        let _ = ctrl.set_page(3);
        let handle = ctrl.update_filters(|f| f.ai_model_id = Some(round)).unwrap();
        assert_eq!(handle.await.unwrap(), FetchOutcome::Committed);
        let view = ctrl.view();
        assert_eq!(view.pagination.current_page, 1, "round {round}");
        assert_eq!(view.items[0].id, 1, "round {round}");
    }
}

// ============================================================================
// Optimistic toggle
// ============================================================================

type Reply = oneshot::Sender<AppResult<Agent>>;
type CallFuture = Pin<Box<dyn Future<Output = AppResult<Agent>> + Send>>;

/// A toggle call that resolves when the test sends its reply.
fn pending_call() -> (Reply, impl FnOnce() -> CallFuture) {
    let (tx, rx) = oneshot::channel();
    let call = move || -> CallFuture {
        Box::pin(async move { rx.await.unwrap_or(Err(AppError::Cancelled)) })
    };
    (tx, call)
}

async fn seeded(
    notifier: Arc<RecordingNotifier>,
    name: &str,
    active: bool,
) -> ListController<ScriptedSource> {
    let ctrl = scripted_controller(notifier);
    let mut row = agent(1, name);
    row.is_active = active;
    let handle = ctrl.refresh();
    ctrl.source().wait_for_calls(1).await;
    ctrl.source().respond(0, Ok(page_of(1, 12, 1, vec![row])));
    assert_eq!(handle.await.unwrap(), FetchOutcome::Committed);
    ctrl
}

async fn overlapping_toggles_both_fail(second_settles_first: bool) {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = seeded(notifier.clone(), "one", false).await;

    let (tx_on, call_on) = pending_call();
    let (tx_off, call_off) = pending_call();
    let on = ctrl.toggle_active(&1, true, call_on);
    let off = ctrl.toggle_active(&1, false, call_off);
    let driver = async {
        assert!(!ctrl.find_item(&1).unwrap().is_active);
        let failure = || Err(AppError::Http("connection reset".into()));
        if second_settles_first {
            tx_off.send(failure()).unwrap();
            tokio::task::yield_now().await;
            tx_on.send(failure()).unwrap();
        } else {
            tx_on.send(failure()).unwrap();
            tokio::task::yield_now().await;
            tx_off.send(failure()).unwrap();
        }
    };
    let (on, off, ()) = tokio::join!(on, off, driver);

    assert_eq!(on, Optimistic::RolledBack);
    assert_eq!(off, Optimistic::RolledBack);
    assert!(!ctrl.find_item(&1).unwrap().is_active);
    assert_eq!(notifier.errors().len(), 2);
}

#[tokio::test]
async fn test_overlapping_failed_toggles_end_on_the_confirmed_flag() {
    overlapping_toggles_both_fail(false).await;
}

#[tokio::test]
async fn test_overlapping_failed_toggles_settling_in_reverse_end_on_the_confirmed_flag() {
    overlapping_toggles_both_fail(true).await;
}

#[tokio::test]
async fn test_earlier_toggle_success_is_kept_when_the_later_one_fails() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = seeded(notifier, "one", false).await;

    let (tx_on, call_on) = pending_call();
    let (tx_off, call_off) = pending_call();
    let on = ctrl.toggle_active(&1, true, call_on);
    let off = ctrl.toggle_active(&1, false, call_off);
    let driver = async {
        let mut confirmed = agent(1, "one");
        confirmed.is_active = true;
        tx_on.send(Ok(confirmed)).unwrap();
        tokio::task::yield_now().await;
        tx_off.send(Err(AppError::Http("connection reset".into()))).unwrap();
    };
    let (on, off, ()) = tokio::join!(on, off, driver);

    assert!(matches!(on, Optimistic::Committed(_)));
    assert_eq!(off, Optimistic::RolledBack);
    assert!(ctrl.find_item(&1).unwrap().is_active);
}

#[tokio::test]
async fn test_failed_toggle_keeps_a_record_refetched_meanwhile() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = seeded(notifier.clone(), "old-name", false).await;

    let (tx, call) = pending_call();
    let toggle = ctrl.toggle_active(&1, true, call);
    let driver = async {
        assert!(ctrl.find_item(&1).unwrap().is_active);
        let handle = ctrl.refresh();
        ctrl.source().wait_for_calls(2).await;
        let mut fresh = agent(1, "new-name");
        fresh.is_active = false;
        ctrl.source().respond(1, Ok(page_of(1, 12, 1, vec![fresh])));
        assert_eq!(handle.await.unwrap(), FetchOutcome::Committed);
        tx.send(Err(AppError::Http("connection reset".into()))).unwrap();
    };
    let (outcome, ()) = tokio::join!(toggle, driver);

    assert_eq!(outcome, Optimistic::RolledBack);
    let held = ctrl.find_item(&1).unwrap();
    assert_eq!(held.name, "new-name");
    assert!(!held.is_active);
    assert_eq!(notifier.errors(), vec!["Failed to update status".to_string()]);
}

// ============================================================================
// Loading indicator
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_loading_indicator_selection() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier);
    assert_eq!(ctrl.view().phase, ListPhase::Idle);

    // First fetch: skeleton right away.
    let handle = ctrl.refresh();
    let view = ctrl.view();
    assert_eq!(view.phase, ListPhase::Loading);
    assert_eq!(view.loading, LoadingIndicator::Skeleton);
    ctrl.source().wait_for_calls(1).await;
    ctrl.source().respond(0, Ok(page_of(1, 12, 1, vec![agent(1, "a")])));
    handle.await.unwrap();
    assert_eq!(ctrl.view().loading, LoadingIndicator::None);

    // Fast search: no indicator at any point.
    let handle = ctrl.update_filters(|f| f.search = Some("fast".into())).unwrap();
    assert_eq!(ctrl.view().phase, ListPhase::Refetching);
    assert_eq!(ctrl.view().loading, LoadingIndicator::None);
    ctrl.source().wait_for_calls(2).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(ctrl.view().loading, LoadingIndicator::None);
    ctrl.source().respond(1, Ok(page_of(1, 12, 1, vec![agent(2, "fast")])));
    handle.await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(ctrl.view().loading, LoadingIndicator::None);
    assert_eq!(ctrl.view().items[0].name, "fast");

    // Slow search: overlay only once the grace period has passed.
    let handle = ctrl.update_filters(|f| f.search = Some("slow".into())).unwrap();
    ctrl.source().wait_for_calls(3).await;
    tokio::time::sleep(Duration::from_millis(199)).await;
    assert_eq!(ctrl.view().loading, LoadingIndicator::None);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(ctrl.view().loading, LoadingIndicator::Overlay);
    assert_eq!(ctrl.view().items[0].name, "fast");

    ctrl.source().respond(2, Ok(page_of(1, 12, 1, vec![agent(3, "slow")])));
    handle.await.unwrap();
    let view = ctrl.view();
    assert_eq!(view.loading, LoadingIndicator::None);
    assert_eq!(view.phase, ListPhase::Ready);
    assert_eq!(view.items[0].name, "slow");
}

#[tokio::test]
async fn test_subscribers_see_the_commit() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = scripted_controller(notifier);
    let mut rx = ctrl.subscribe();

    let handle = ctrl.refresh();
    ctrl.source().wait_for_calls(1).await;
    ctrl.source().respond(0, Ok(page_of(1, 12, 1, vec![agent(9, "nine")])));
    handle.await.unwrap();

    rx.changed().await.unwrap();
    let view = rx.borrow_and_update().clone();
    assert_eq!(view.commits, 1);
    assert_eq!(view.items[0].id, 9);
}

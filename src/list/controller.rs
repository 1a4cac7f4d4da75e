//! Race-free list screen controller.
//!
//! One controller drives one list screen: it owns the filter and pagination
//! state, issues cancellable page fetches through a [`RequestGate`], and
//! publishes [`ViewState`] snapshots on a watch channel. Only the most
//! recently issued fetch may ever touch the published state, whatever order
//! responses arrive in.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::list::filters::ListFilters;
use crate::list::gate::{FetchTicket, RequestGate};
use crate::list::optimistic::{ActiveFlag, ListItem, Optimistic, PendingToggles};
use crate::list::pagination::PaginationState;
use crate::models::pagination::{default_sorts, ListQuery, ListResponse, SortField};
use crate::ui::{Notifier, NotifyKind};

/// Backend access for one kind of list.
pub trait ListSource: Send + Sync + 'static {
    type Item: ListItem;
    type Filters: ListFilters;

    /// Used as the log prefix.
    const NAME: &'static str;

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<Self::Item>>> + Send;

    fn sorts(&self) -> Vec<SortField> {
        default_sorts()
    }

    /// Reorder or reshape a committed page before it is published.
    fn post_process(&self, _items: &mut Vec<Self::Item>) {}

    fn load_error_message(&self) -> &'static str {
        "Failed to load list"
    }

    fn update_error_message(&self) -> &'static str {
        "Failed to update status"
    }
}

pub type ItemKey<S> = <<S as ListSource>::Item as ListItem>::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Refetching,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Search,
    Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingIndicator {
    #[default]
    None,
    /// Full placeholder list; nothing has been shown yet.
    Skeleton,
    /// Light overlay on top of the previous page.
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Committed,
    Discarded,
    Failed,
}

/// What the host renders.
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    pub phase: ListPhase,
    pub items: Vec<T>,
    pub pagination: PaginationState,
    pub loading: LoadingIndicator,
    pub error: Option<String>,
    /// Number of responses committed so far.
    pub commits: u64,
    /// Payload the last committed response carried next to `items`.
    pub extra: Map<String, Value>,
}

impl<T> ViewState<T> {
    fn new(pagination: PaginationState) -> Self {
        Self {
            phase: ListPhase::Idle,
            items: Vec::new(),
            pagination,
            loading: LoadingIndicator::None,
            error: None,
            commits: 0,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub page_size: u32,
    pub loading_grace: Duration,
}

impl ControllerOptions {
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            page_size: config.default_page_size,
            loading_grace: config.loading_grace(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from_config(&AdminConfig::default())
    }
}

struct ControllerState<F, K> {
    filters: F,
    pagination: PaginationState,
    /// Filters of the last committed response; `None` until one commits.
    committed_filters: Option<F>,
    overlay_timer: Option<JoinHandle<()>>,
    toggles: PendingToggles<K>,
}

type StateOf<S> = ControllerState<<S as ListSource>::Filters, ItemKey<S>>;

/// A fetch that has been issued but not yet settled.
struct InFlight<F> {
    ticket: FetchTicket,
    kind: LoadKind,
    filters: F,
    query: ListQuery,
}

struct Inner<S: ListSource> {
    source: S,
    gate: RequestGate,
    state: Mutex<StateOf<S>>,
    view_tx: watch::Sender<ViewState<S::Item>>,
    notifier: Arc<dyn Notifier>,
    loading_grace: Duration,
}

impl<S: ListSource> Inner<S> {
    fn lock_state(&self) -> MutexGuard<'_, StateOf<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Steps 1-3 of a fetch: snapshot the inputs, take a ticket, classify,
    /// and arm the overlay timer. The caller holds the state lock across its
    /// own state change and this call, so no commit can land in between.
    fn begin(self: &Arc<Self>, state: &mut StateOf<S>) -> InFlight<S::Filters> {
        let ticket = self.gate.begin_fetch();

        let kind = match &state.committed_filters {
            None => LoadKind::Initial,
            Some(committed) if *committed != state.filters => LoadKind::Search,
            Some(_) => LoadKind::Pagination,
        };

        if let Some(timer) = state.overlay_timer.take() {
            timer.abort();
        }

        let query = ListQuery::new(state.pagination.current_page, state.pagination.page_size)
            .with_sorts(self.source.sorts())
            .with_filters(state.filters.to_wire());

        self.view_tx.send_modify(|view| {
            view.error = None;
            match kind {
                LoadKind::Initial => {
                    view.phase = ListPhase::Loading;
                    view.loading = LoadingIndicator::Skeleton;
                }
                LoadKind::Search | LoadKind::Pagination => {
                    view.phase = ListPhase::Refetching;
                    // An overlay already on screen stays up for the replacement.
                    if view.loading != LoadingIndicator::Overlay {
                        view.loading = LoadingIndicator::None;
                    }
                }
            }
        });

        if kind != LoadKind::Initial {
            let weak = Arc::downgrade(self);
            let grace = self.loading_grace;
            let timer_ticket = ticket.clone();
            state.overlay_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                if let Some(inner) = weak.upgrade() {
                    inner.show_overlay(&timer_ticket);
                }
            }));
        }

        log::debug!(
            "[ListController:{}] Fetch #{} ({:?}) page={} size={}",
            S::NAME,
            ticket.generation(),
            kind,
            query.page,
            query.page_size
        );

        InFlight {
            ticket,
            kind,
            filters: state.filters.clone(),
            query,
        }
    }

    fn show_overlay(&self, ticket: &FetchTicket) {
        let _state = self.lock_state();
        if self.gate.is_current(ticket) {
            self.view_tx
                .send_modify(|view| view.loading = LoadingIndicator::Overlay);
        }
    }

    /// Apply `mutate` and issue the fetch for the resulting state under one
    /// guard.
    fn spawn_fetch_with<M>(self: &Arc<Self>, mutate: M) -> JoinHandle<FetchOutcome>
    where
        M: FnOnce(&mut StateOf<S>),
    {
        let in_flight = {
            let mut state = self.lock_state();
            mutate(&mut *state);
            self.begin(&mut *state)
        };
        self.run(in_flight)
    }

    fn run(self: &Arc<Self>, in_flight: InFlight<S::Filters>) -> JoinHandle<FetchOutcome> {
        let inner = self.clone();
        tokio::spawn(async move {
            let cancel = in_flight.ticket.cancel_token().clone();
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(AppError::Cancelled),
                result = inner.source.fetch(in_flight.query.clone(), cancel.clone()) => result,
            };
            inner.finish(&in_flight, result)
        })
    }

    /// Steps 5-6: settle a fetch. Anything from a superseded ticket is
    /// dropped without touching state.
    fn finish(
        &self,
        in_flight: &InFlight<S::Filters>,
        result: AppResult<ListResponse<S::Item>>,
    ) -> FetchOutcome {
        let mut state = self.lock_state();
        if !self.gate.is_current(&in_flight.ticket) {
            log::debug!(
                "[ListController:{}] Discarded stale fetch #{} ({})",
                S::NAME,
                in_flight.ticket.generation(),
                if result.is_ok() { "response" } else { "error" }
            );
            return FetchOutcome::Discarded;
        }

        if let Some(timer) = state.overlay_timer.take() {
            timer.abort();
        }

        match result {
            Ok(resp) => {
                let server = resp.pagination();
                let mut items = resp.data.items;
                self.source.post_process(&mut items);
                state.pagination.commit(&server);
                state.committed_filters = Some(in_flight.filters.clone());
                let pagination = state.pagination;
                let count = items.len();
                let extra = resp.data.extra;
                self.view_tx.send_modify(|view| {
                    view.phase = ListPhase::Ready;
                    view.items = items;
                    view.pagination = pagination;
                    view.loading = LoadingIndicator::None;
                    view.error = None;
                    view.extra = extra;
                    view.commits += 1;
                });
                log::info!(
                    "[ListController:{}] Committed {} items, page {}/{} ({} total)",
                    S::NAME,
                    count,
                    pagination.current_page,
                    pagination.total_pages,
                    pagination.total_items
                );
                FetchOutcome::Committed
            }
            Err(e) => {
                let message = e.user_message(self.source.load_error_message());
                log::error!("[ListController:{}] Fetch failed: {}", S::NAME, e);
                let initial = in_flight.kind == LoadKind::Initial;
                self.view_tx.send_modify(|view| {
                    view.phase = ListPhase::Error;
                    view.loading = LoadingIndicator::None;
                    view.error = Some(message.clone());
                    if initial {
                        view.items.clear();
                    }
                });
                drop(state);
                self.notifier.notify(NotifyKind::Error, &message);
                FetchOutcome::Failed
            }
        }
    }

    /// `f` runs under the state lock.
    fn update_filters<F>(self: &Arc<Self>, f: F) -> Option<JoinHandle<FetchOutcome>>
    where
        F: FnOnce(&mut S::Filters),
    {
        let in_flight = {
            let mut state = self.lock_state();
            let mut filters = state.filters.clone();
            f(&mut filters);
            if state.filters == filters {
                return None;
            }
            state.filters = filters;
            if state.pagination.on_filter_changed() {
                log::debug!("[ListController:{}] Filters changed, back to page 1", S::NAME);
            }
            self.begin(&mut *state)
        };
        Some(self.run(in_flight))
    }

    fn shutdown(&self) {
        let mut state = self.lock_state();
        self.gate.cancel();
        if let Some(timer) = state.overlay_timer.take() {
            timer.abort();
        }
    }
}

/// Owner handle of a list screen's state. Dropping it tears the screen
/// down: the outstanding fetch is aborted and the overlay timer released.
pub struct ListController<S: ListSource> {
    inner: Arc<Inner<S>>,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, options: ControllerOptions, notifier: Arc<dyn Notifier>) -> Self {
        let pagination = PaginationState::new(options.page_size);
        let (view_tx, _) = watch::channel(ViewState::new(pagination));
        Self {
            inner: Arc::new(Inner {
                source,
                gate: RequestGate::new(),
                state: Mutex::new(ControllerState {
                    filters: S::Filters::default(),
                    pagination,
                    committed_filters: None,
                    overlay_timer: None,
                    toggles: PendingToggles::default(),
                }),
                view_tx,
                notifier,
                loading_grace: options.loading_grace,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Fetch the current page with the current filters.
    pub fn refresh(&self) -> JoinHandle<FetchOutcome> {
        self.inner.spawn_fetch_with(|_| {})
    }

    /// Replace the filters. Equal filters are a no-op; otherwise the page
    /// goes back to 1 and a fetch is issued.
    pub fn set_filters(&self, filters: S::Filters) -> Option<JoinHandle<FetchOutcome>> {
        self.inner.update_filters(|current| *current = filters)
    }

    pub fn update_filters<F>(&self, f: F) -> Option<JoinHandle<FetchOutcome>>
    where
        F: FnOnce(&mut S::Filters),
    {
        self.inner.update_filters(f)
    }

    pub fn set_page(&self, page: u32) -> JoinHandle<FetchOutcome> {
        self.inner
            .spawn_fetch_with(|state| state.pagination.set_page(page))
    }

    pub fn set_page_size(&self, page_size: u32) -> JoinHandle<FetchOutcome> {
        self.inner
            .spawn_fetch_with(|state| state.pagination.set_page_size(page_size))
    }

    pub fn filters(&self) -> S::Filters {
        self.inner.lock_state().filters.clone()
    }

    /// Requested pagination; may run ahead of `view().pagination` while a
    /// fetch is in flight.
    pub fn pagination(&self) -> PaginationState {
        self.inner.lock_state().pagination
    }

    pub fn view(&self) -> ViewState<S::Item> {
        self.inner.view_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<S::Item>> {
        self.inner.view_tx.subscribe()
    }

    /// Handle that does not keep the screen alive, for debouncer sinks.
    pub fn downgrade(&self) -> WeakController<S> {
        WeakController {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Edit the published items in place, e.g. after a local mutation that
    /// needs no refetch.
    pub fn modify_items<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<S::Item>),
    {
        self.inner.view_tx.send_modify(|view| f(&mut view.items));
    }

    pub fn find_item(&self, key: &ItemKey<S>) -> Option<S::Item> {
        self.inner
            .view_tx
            .borrow()
            .items
            .iter()
            .find(|item| item.key() == *key)
            .cloned()
    }
}

impl<S> ListController<S>
where
    S: ListSource,
    S::Item: ActiveFlag,
{
    /// Flip an item's active flag at once, then reconcile with the backend.
    /// On success the server's record replaces the local one. On failure
    /// only the flag goes back, to the last value the backend confirmed, and
    /// only while the item still shows this toggle's value and no newer page
    /// has been committed. Overlapping toggles of one item are reconciled in
    /// start order: the latest one owns the view.
    pub async fn toggle_active<F, Fut>(
        &self,
        key: &ItemKey<S>,
        active: bool,
        call: F,
    ) -> Optimistic<S::Item>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<S::Item>>,
    {
        let ticket = {
            let mut state = self.inner.lock_state();
            let mut ticket = None;
            self.inner.view_tx.send_if_modified(|view| {
                let commits = view.commits;
                match view.items.iter_mut().find(|item| item.key() == *key) {
                    Some(item) => {
                        if state.toggles.is_pending(key) {
                            log::debug!(
                                "[ListController:{}] Toggle of {:?} overlaps a pending one",
                                S::NAME,
                                key
                            );
                        }
                        let current = item.is_active();
                        ticket = Some(state.toggles.start(key.clone(), current, active, commits));
                        item.set_active(active);
                        true
                    }
                    None => false,
                }
            });
            ticket
        };
        let Some(ticket) = ticket else {
            log::warn!("[ListController:{}] Toggle for unknown item {:?}", S::NAME, key);
            return Optimistic::RolledBack;
        };

        let result = call().await;

        let mut state = self.inner.lock_state();
        match result {
            Ok(server) => {
                let settled = state.toggles.finish(&ticket, Some(server.is_active()));
                if settled.latest {
                    let record = server.clone();
                    self.inner.view_tx.send_modify(|view| {
                        if let Some(item) = view.items.iter_mut().find(|item| item.key() == *key) {
                            *item = record;
                        }
                    });
                }
                Optimistic::Committed(server)
            }
            Err(e) => {
                let settled = state.toggles.finish(&ticket, None);
                if settled.latest {
                    self.inner.view_tx.send_if_modified(|view| {
                        if view.commits != ticket.commits {
                            return false;
                        }
                        match view.items.iter_mut().find(|item| item.key() == *key) {
                            Some(item) if item.is_active() == ticket.requested => {
                                item.set_active(settled.confirmed);
                                true
                            }
                            _ => false,
                        }
                    });
                }
                drop(state);
                log::error!(
                    "[ListController:{}] Toggle of {:?} failed, rolled back: {}",
                    S::NAME,
                    key,
                    e
                );
                let message = e.user_message(self.inner.source.update_error_message());
                self.inner.notifier.notify(NotifyKind::Error, &message);
                Optimistic::RolledBack
            }
        }
    }
}

impl<S: ListSource> Drop for ListController<S> {
    fn drop(&mut self) {
        log::debug!("[ListController:{}] Torn down", S::NAME);
        self.inner.shutdown();
    }
}

/// Non-owning controller handle.
pub struct WeakController<S: ListSource> {
    inner: Weak<Inner<S>>,
}

impl<S: ListSource> Clone for WeakController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: ListSource> WeakController<S> {
    /// Same as [`ListController::update_filters`]; does nothing once the
    /// screen is gone.
    pub fn update_filters<F>(&self, f: F) -> Option<JoinHandle<FetchOutcome>>
    where
        F: FnOnce(&mut S::Filters),
    {
        self.inner.upgrade().and_then(|inner| inner.update_filters(f))
    }
}

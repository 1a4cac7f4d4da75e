use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::AgentsApi;
use crate::error::AppResult;
use crate::list::{Debouncer, FetchOutcome, ListController, ListSource, PopularFilters, TimeWindow};
use crate::models::agent::Agent;
use crate::models::pagination::{ListQuery, ListResponse};
use crate::screens::{search_term, settle};
use crate::state::AppState;

/// Every visible agent, busiest first.
pub struct PopularSource {
    api: AgentsApi,
}

impl PopularSource {
    pub fn new(api: AgentsApi) -> Self {
        Self { api }
    }
}

impl ListSource for PopularSource {
    type Item = Agent;
    type Filters = PopularFilters;
    const NAME: &'static str = "Popular";

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<Agent>>> + Send {
        async move { self.api.list_all(&query, &cancel).await }
    }

    /// Weekly message count, descending. `sort_by` is stable, so ties keep
    /// the server's order.
    fn post_process(&self, items: &mut Vec<Agent>) {
        items.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to load popular agents"
    }
}

pub struct PopularScreen {
    controller: ListController<PopularSource>,
    search: Debouncer<String>,
}

impl PopularScreen {
    /// Needs a running tokio runtime for the search debouncer.
    pub fn new(state: &AppState) -> Self {
        let controller = ListController::new(
            PopularSource::new(state.agents.clone()),
            state.controller_options(),
            state.notifier.clone(),
        );
        let weak = controller.downgrade();
        let search = Debouncer::spawn(state.config.search_debounce(), move |text: String| {
            weak.update_filters(|f| f.search = search_term(&text));
        });
        Self { controller, search }
    }

    pub fn controller(&self) -> &ListController<PopularSource> {
        &self.controller
    }

    pub async fn mount(&self) -> AppResult<FetchOutcome> {
        settle(self.controller.refresh()).await
    }

    pub fn set_search(&self, text: &str) {
        self.search.push(text.to_string());
    }

    pub fn set_category(&self, category: Option<String>) -> Option<JoinHandle<FetchOutcome>> {
        let category = category.filter(|c| !c.is_empty() && c != "all");
        self.controller.update_filters(|f| f.category = category)
    }

    pub fn set_time_window(&self, window: TimeWindow) -> Option<JoinHandle<FetchOutcome>> {
        self.controller.update_filters(|f| f.time_window = window)
    }

    /// Clear search, category and time window.
    pub fn reset_filters(&self) -> Option<JoinHandle<FetchOutcome>> {
        self.controller.set_filters(PopularFilters::default())
    }
}

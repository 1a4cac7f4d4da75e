use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::api::AgentsApi;
use crate::error::AppResult;
use crate::list::{AgentFilters, FetchOutcome, ListController, ListSource, Optimistic};
use crate::models::agent::{Agent, AgentForm, AgentSettings};
use crate::models::pagination::{ListQuery, ListResponse};
use crate::screens::settle;
use crate::state::AppState;
use crate::ui::{ConfirmOptions, Confirmer, Notifier, NotifyKind};
use crate::validation::validate_agent_form;

/// The signed-in user's agents.
pub struct AgentsSource {
    api: AgentsApi,
}

impl AgentsSource {
    pub fn new(api: AgentsApi) -> Self {
        Self { api }
    }
}

impl ListSource for AgentsSource {
    type Item = Agent;
    type Filters = AgentFilters;
    const NAME: &'static str = "Agents";

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<Agent>>> + Send {
        async move { self.api.list(&query, &cancel).await }
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to load agents"
    }

    fn update_error_message(&self) -> &'static str {
        "Operation failed, please retry"
    }
}

pub struct AgentsScreen {
    controller: ListController<AgentsSource>,
    api: AgentsApi,
    settings: Mutex<AgentSettings>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
}

impl AgentsScreen {
    pub fn new(state: &AppState) -> Self {
        Self {
            controller: ListController::new(
                AgentsSource::new(state.agents.clone()),
                state.controller_options(),
                state.notifier.clone(),
            ),
            api: state.agents.clone(),
            settings: Mutex::new(AgentSettings::default()),
            notifier: state.notifier.clone(),
            confirmer: state.confirmer.clone(),
        }
    }

    pub fn controller(&self) -> &ListController<AgentsSource> {
        &self.controller
    }

    /// Load the user's settings, then the first page.
    pub async fn mount(&self) -> AppResult<FetchOutcome> {
        match self.api.get_settings().await {
            Ok(map) => {
                let loaded = AgentSettings::from_map(&map);
                log::info!("[AgentsScreen] auto-assign MCP: {}", loaded.auto_assign_mcp);
                *self.settings.lock().unwrap_or_else(PoisonError::into_inner) = loaded;
            }
            Err(e) => log::warn!("[AgentsScreen] Failed to load settings, using defaults: {}", e),
        }
        settle(self.controller.refresh()).await
    }

    pub fn settings(&self) -> AgentSettings {
        *self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn save_settings(&self, settings: AgentSettings) -> AppResult<()> {
        match self.api.set_settings(settings).await {
            Ok(_) => {
                *self.settings.lock().unwrap_or_else(PoisonError::into_inner) = settings;
                self.notifier.notify(NotifyKind::Success, "Settings saved");
                Ok(())
            }
            Err(e) => {
                log::error!("[AgentsScreen] Failed to save settings: {}", e);
                self.notifier
                    .notify(NotifyKind::Error, &e.user_message("Failed to save settings"));
                Err(e)
            }
        }
    }

    pub async fn toggle_active(&self, id: i64, active: bool) -> Optimistic<Agent> {
        let api = &self.api;
        let outcome = self
            .controller
            .toggle_active(&id, active, || api.toggle(id, active))
            .await;
        if let Optimistic::Committed(_) = outcome {
            let message = if active { "Agent enabled" } else { "Agent disabled" };
            self.notifier.notify(NotifyKind::Success, message);
        }
        outcome
    }

    /// Delete after confirmation. `Ok(false)` when the user backs out.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let confirmed = self
            .confirmer
            .confirm(ConfirmOptions::destructive(
                "Delete agent",
                "This permanently deletes the agent and its configuration. This cannot be undone.",
            ))
            .await;
        if !confirmed {
            return Ok(false);
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.controller.modify_items(|items| items.retain(|a| a.id != id));
                self.notifier.notify(NotifyKind::Success, "Agent deleted");
                Ok(true)
            }
            Err(e) => {
                log::error!("[AgentsScreen] Failed to delete agent {}: {}", id, e);
                self.notifier
                    .notify(NotifyKind::Error, &e.user_message("Delete failed, please retry"));
                Err(e)
            }
        }
    }

    /// Validate and create; the list is refetched so the new agent shows up
    /// in server order.
    pub async fn create(&self, form: &AgentForm) -> AppResult<Agent> {
        if let Err(e) = validate_agent_form(form) {
            self.notifier.notify(NotifyKind::Error, &e.user_message(""));
            return Err(e);
        }
        let agent = self
            .api
            .create(&form.to_create_request())
            .await
            .inspect_err(|e| {
                self.notifier
                    .notify(NotifyKind::Error, &e.user_message("Failed to create agent"))
            })?;
        log::info!("[AgentsScreen] Created agent {} ({})", agent.id, agent.name);
        self.notifier.notify(NotifyKind::Success, "Agent created");
        settle(self.controller.refresh()).await?;
        Ok(agent)
    }

    pub async fn update(&self, id: i64, form: &AgentForm) -> AppResult<Agent> {
        if let Err(e) = validate_agent_form(form) {
            self.notifier.notify(NotifyKind::Error, &e.user_message(""));
            return Err(e);
        }
        let agent = self
            .api
            .update(id, &form.to_update_request())
            .await
            .inspect_err(|e| {
                self.notifier
                    .notify(NotifyKind::Error, &e.user_message("Failed to update agent"))
            })?;
        let updated = agent.clone();
        self.controller.modify_items(|items| {
            if let Some(item) = items.iter_mut().find(|a| a.id == id) {
                *item = updated;
            }
        });
        self.notifier.notify(NotifyKind::Success, "Agent updated");
        Ok(agent)
    }
}

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{AgentsApi, McpToolsApi};
use crate::error::AppResult;
use crate::list::{
    Debouncer, FetchOutcome, ListController, ListSource, Optimistic, ToolFilters,
};
use crate::models::agent::Agent;
use crate::models::mcp_tool::{McpTool, McpToolForm, McpToolStats, ToolCategory, ToolType};
use crate::models::pagination::{ListQuery, ListResponse};
use crate::screens::{search_term, settle};
use crate::state::AppState;
use crate::ui::{ConfirmOptions, Confirmer, Notifier, NotifyKind};
use crate::validation::validate_tool_form;

pub struct ToolsSource {
    api: McpToolsApi,
}

impl ToolsSource {
    pub fn new(api: McpToolsApi) -> Self {
        Self { api }
    }
}

impl ListSource for ToolsSource {
    type Item = McpTool;
    type Filters = ToolFilters;
    const NAME: &'static str = "Tools";

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<McpTool>>> + Send {
        async move { self.api.list(&query, &cancel).await }
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to load tools"
    }

    fn update_error_message(&self) -> &'static str {
        "Failed to update tool status"
    }
}

/// Agents whose bindings include `tool_id`.
pub fn agents_using_tool<'a>(agents: &'a [Agent], tool_id: &str) -> Vec<&'a Agent> {
    match tool_id.parse::<i64>() {
        Ok(id) => agents.iter().filter(|a| a.uses_tool(id)).collect(),
        Err(_) => Vec::new(),
    }
}

pub struct ToolsScreen {
    controller: ListController<ToolsSource>,
    search: Debouncer<String>,
    tools_api: McpToolsApi,
    agents_api: AgentsApi,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
}

impl ToolsScreen {
    /// Needs a running tokio runtime for the search debouncer.
    pub fn new(state: &AppState) -> Self {
        let controller = ListController::new(
            ToolsSource::new(state.mcp_tools.clone()),
            state.controller_options(),
            state.notifier.clone(),
        );
        let weak = controller.downgrade();
        let search = Debouncer::spawn(state.config.search_debounce(), move |text: String| {
            weak.update_filters(|f| f.search = search_term(&text));
        });
        Self {
            controller,
            search,
            tools_api: state.mcp_tools.clone(),
            agents_api: state.agents.clone(),
            notifier: state.notifier.clone(),
            confirmer: state.confirmer.clone(),
        }
    }

    pub fn controller(&self) -> &ListController<ToolsSource> {
        &self.controller
    }

    pub async fn mount(&self) -> AppResult<FetchOutcome> {
        settle(self.controller.refresh()).await
    }

    /// Every keystroke of the search box; fetches once typing pauses.
    pub fn set_search(&self, text: &str) {
        self.search.push(text.to_string());
    }

    pub fn set_category(&self, category: Option<ToolCategory>) -> Option<JoinHandle<FetchOutcome>> {
        self.controller.update_filters(|f| f.category = category)
    }

    pub fn set_type(&self, tool_type: Option<ToolType>) -> Option<JoinHandle<FetchOutcome>> {
        self.controller.update_filters(|f| f.tool_type = tool_type)
    }

    pub fn set_active_filter(&self, is_active: Option<bool>) -> Option<JoinHandle<FetchOutcome>> {
        self.controller.update_filters(|f| f.is_active = is_active)
    }

    /// Counters the list endpoint sends next to the page.
    pub fn list_stats(&self) -> Option<McpToolStats> {
        let view = self.controller.view();
        let stats = view.extra.get("stats")?.clone();
        serde_json::from_value(stats)
            .map_err(|e| log::warn!("[ToolsScreen] Ignoring malformed stats: {}", e))
            .ok()
    }

    pub async fn stats(&self) -> AppResult<McpToolStats> {
        self.tools_api.stats().await
    }

    pub async fn toggle_active(&self, id: &str, active: bool) -> Optimistic<McpTool> {
        let api = &self.tools_api;
        let key = id.to_string();
        let outcome = self
            .controller
            .toggle_active(&key, active, || api.toggle(id, active))
            .await;
        if let Optimistic::Committed(_) = outcome {
            let message = if active { "Tool enabled" } else { "Tool disabled" };
            self.notifier.notify(NotifyKind::Success, message);
        }
        outcome
    }

    /// Delete after confirmation. When agents still use the tool the prompt
    /// names them. `Ok(false)` when the user backs out.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.delete_inner(id).await;
        if let Err(e) = &result {
            log::error!("[ToolsScreen] Failed to delete tool {}: {}", id, e);
            self.notifier
                .notify(NotifyKind::Error, &e.user_message("Failed to delete tool, please retry"));
        }
        result
    }

    async fn delete_inner(&self, id: &str) -> AppResult<bool> {
        let all_agents = self.agents_api.collect_all().await?;
        let using = agents_using_tool(&all_agents, id);

        let message = if using.is_empty() {
            "This permanently deletes the tool and its configuration. This cannot be undone."
                .to_string()
        } else {
            let names: Vec<&str> = using.iter().map(|a| a.name.as_str()).collect();
            format!(
                "This tool is used by {} agent(s): {}.\n\nThose agents will lose access to it. Delete anyway?",
                using.len(),
                names.join(", ")
            )
        };
        let confirmed = self
            .confirmer
            .confirm(ConfirmOptions::destructive("Delete MCP tool", message))
            .await;
        if !confirmed {
            return Ok(false);
        }

        self.tools_api.delete(id).await?;
        self.controller.modify_items(|items| items.retain(|t| t.id != id));
        let message = if using.is_empty() {
            "Tool deleted".to_string()
        } else {
            format!("Tool deleted, unbound from {} agent(s)", using.len())
        };
        self.notifier.notify(NotifyKind::Success, &message);
        Ok(true)
    }

    pub async fn create(&self, form: &McpToolForm) -> AppResult<McpTool> {
        self.save(None, form).await
    }

    pub async fn update(&self, id: &str, form: &McpToolForm) -> AppResult<McpTool> {
        self.save(Some(id), form).await
    }

    async fn save(&self, id: Option<&str>, form: &McpToolForm) -> AppResult<McpTool> {
        if let Err(e) = validate_tool_form(form) {
            self.notifier.notify(NotifyKind::Error, &e.user_message(""));
            return Err(e);
        }
        let request = form.to_request();
        let result = match id {
            Some(id) => self.tools_api.update(id, &request).await,
            None => self.tools_api.create(&request).await,
        };
        let tool = match result {
            Ok(tool) => tool,
            Err(e) => {
                let fallback = if id.is_some() {
                    "Failed to update tool"
                } else {
                    "Failed to create tool"
                };
                self.notifier.notify(NotifyKind::Error, &e.user_message(fallback));
                return Err(e);
            }
        };
        log::info!("[ToolsScreen] Saved tool {} ({})", tool.id, tool.name);
        self.notifier.notify(
            NotifyKind::Success,
            if id.is_some() { "Tool updated" } else { "Tool created" },
        );
        settle(self.controller.refresh()).await?;
        Ok(tool)
    }
}

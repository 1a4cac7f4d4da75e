use std::sync::Arc;

use crate::api::{AgentsApi, AiModelsApi, ApiClient, KnowledgeBasesApi, McpToolsApi};
use crate::config::AdminConfig;
use crate::error::AppResult;
use crate::list::ControllerOptions;
use crate::ui::{Confirmer, Notifier};

/// Everything a screen needs: API handles, host UI capabilities and the
/// console configuration.
pub struct AppState {
    pub config: Arc<AdminConfig>,
    /// Shared HTTP client behind every API handle
    pub client: ApiClient,
    pub agents: AgentsApi,
    pub mcp_tools: McpToolsApi,
    pub knowledge_bases: KnowledgeBasesApi,
    pub ai_models: AiModelsApi,
    /// Toast sink provided by the host
    pub notifier: Arc<dyn Notifier>,
    /// Confirmation dialogs provided by the host
    pub confirmer: Arc<dyn Confirmer>,
}

impl AppState {
    pub fn new(
        config: AdminConfig,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> AppResult<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        log::info!("[AppState] Backend at {}", client.base_url());
        Ok(Self {
            config: Arc::new(config),
            agents: AgentsApi::new(client.clone()),
            mcp_tools: McpToolsApi::new(client.clone()),
            knowledge_bases: KnowledgeBasesApi::new(client.clone()),
            ai_models: AiModelsApi::new(client.clone()),
            client,
            notifier,
            confirmer,
        })
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions::from_config(&self.config)
    }
}

// Implement Clone manually to allow state sharing in spawned tasks
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            client: self.client.clone(),
            agents: self.agents.clone(),
            mcp_tools: self.mcp_tools.clone(),
            knowledge_bases: self.knowledge_bases.clone(),
            ai_models: self.ai_models.clone(),
            notifier: Arc::clone(&self.notifier),
            confirmer: Arc::clone(&self.confirmer),
        }
    }
}

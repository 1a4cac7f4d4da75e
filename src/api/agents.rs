use std::collections::HashMap;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::api::client::ApiClient;
use crate::error::AppResult;
use crate::models::agent::{
    Agent, AgentDetail, AgentSettings, CreateAgentRequest, SettingsResponse, UpdateAgentRequest,
};
use crate::models::pagination::{ListQuery, ListResponse, MessageResponse};

/// Page size used when walking every page of `/agents/all`.
const SCAN_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct AgentsApi {
    client: ApiClient,
}

impl AgentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in user's agents.
    pub async fn list(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<Agent>> {
        self.client.list("/agents", query, cancel).await
    }

    /// Every agent visible to the user, not only their own.
    pub async fn list_all(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<Agent>> {
        self.client.list("/agents/all", query, cancel).await
    }

    /// Walk all pages of `/agents/all`.
    pub async fn collect_all(&self) -> AppResult<Vec<Agent>> {
        let cancel = CancellationToken::new();
        let mut page = 1;
        let mut agents = Vec::new();
        loop {
            let resp = self
                .list_all(&ListQuery::new(page, SCAN_PAGE_SIZE), &cancel)
                .await?;
            let fetched = resp.data.items.len();
            agents.extend(resp.data.items);
            if fetched == 0 || u64::from(page) >= resp.total_pages {
                break;
            }
            page += 1;
        }
        log::debug!("[AgentsApi] Collected {} agents across {} pages", agents.len(), page);
        Ok(agents)
    }

    pub async fn get(&self, id: i64) -> AppResult<AgentDetail> {
        self.client.get(&format!("/agents/{id}")).await
    }

    pub async fn create(&self, request: &CreateAgentRequest) -> AppResult<Agent> {
        self.client.post("/agents", request).await
    }

    pub async fn update(&self, id: i64, request: &UpdateAgentRequest) -> AppResult<Agent> {
        self.client.put(&format!("/agents/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/agents/{id}")).await?;
        Ok(())
    }

    pub async fn toggle(&self, id: i64, is_active: bool) -> AppResult<Agent> {
        self.client
            .patch(&format!("/agents/{id}/toggle"), &json!({ "is_active": is_active }))
            .await
    }

    pub async fn get_settings(&self) -> AppResult<HashMap<String, Value>> {
        let resp: SettingsResponse = self.client.get("/agents/settings").await?;
        Ok(resp.into_map())
    }

    pub async fn set_settings(&self, settings: AgentSettings) -> AppResult<String> {
        let resp: MessageResponse = self
            .client
            .post("/agents/settings", &settings.to_map())
            .await?;
        Ok(resp.message)
    }
}

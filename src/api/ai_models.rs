use tokio_util::sync::CancellationToken;

use crate::api::client::ApiClient;
use crate::error::AppResult;
use crate::models::ai_model::{AiModelConfig, CreateAiModelRequest, UpdateAiModelRequest};
use crate::models::pagination::{ListQuery, ListResponse};

#[derive(Debug, Clone)]
pub struct AiModelsApi {
    client: ApiClient,
}

impl AiModelsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<AiModelConfig>> {
        self.client.list("/ai-models", query, cancel).await
    }

    pub async fn get(&self, id: i64) -> AppResult<AiModelConfig> {
        self.client.get(&format!("/ai-models/{id}")).await
    }

    pub async fn create(&self, request: &CreateAiModelRequest) -> AppResult<AiModelConfig> {
        self.client.post("/ai-models", request).await
    }

    pub async fn update(&self, id: i64, request: &UpdateAiModelRequest) -> AppResult<AiModelConfig> {
        self.client.put(&format!("/ai-models/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/ai-models/{id}")).await?;
        Ok(())
    }
}

use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use crate::api::client::ApiClient;
use crate::error::AppResult;
use crate::models::mcp_tool::{McpTool, McpToolRecord, McpToolRequest, McpToolStats, TestToolResponse};
use crate::models::pagination::{ListQuery, ListResponse};

/// MCP tool endpoints. Records are converted to the console's [`McpTool`]
/// shape on the way in.
#[derive(Debug, Clone)]
pub struct McpToolsApi {
    client: ApiClient,
}

impl McpToolsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<McpTool>> {
        let resp: ListResponse<McpToolRecord> = self.client.list("/mcp-tools", query, cancel).await?;
        Ok(resp.map_items(McpTool::from))
    }

    pub async fn get(&self, id: &str) -> AppResult<McpTool> {
        let record: McpToolRecord = self.client.get(&format!("/mcp-tools/{id}")).await?;
        Ok(record.into())
    }

    pub async fn create(&self, request: &McpToolRequest) -> AppResult<McpTool> {
        let record: McpToolRecord = self.client.post("/mcp-tools", request).await?;
        Ok(record.into())
    }

    pub async fn update(&self, id: &str, request: &McpToolRequest) -> AppResult<McpTool> {
        let record: McpToolRecord = self.client.put(&format!("/mcp-tools/{id}"), request).await?;
        Ok(record.into())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.client.delete(&format!("/mcp-tools/{id}")).await?;
        Ok(())
    }

    pub async fn toggle(&self, id: &str, is_active: bool) -> AppResult<McpTool> {
        let record: McpToolRecord = self
            .client
            .patch(&format!("/mcp-tools/{id}/toggle"), &json!({ "is_active": is_active }))
            .await?;
        Ok(record.into())
    }

    pub async fn test(&self, id: &str, test_data: Option<Map<String, Value>>) -> AppResult<TestToolResponse> {
        self.client
            .post(
                &format!("/mcp-tools/{id}/test"),
                &json!({ "test_data": test_data.unwrap_or_default() }),
            )
            .await
    }

    pub async fn stats(&self) -> AppResult<McpToolStats> {
        self.client.get("/mcp-tools/stats").await
    }
}

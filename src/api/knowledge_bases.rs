use tokio_util::sync::CancellationToken;

use crate::api::client::ApiClient;
use crate::error::AppResult;
use crate::models::knowledge_base::{
    CreateKnowledgeBaseRequest, KnowledgeBase, KnowledgeBaseDocument, UpdateKnowledgeBaseRequest,
    UploadDocumentRequest,
};
use crate::models::pagination::{ListQuery, ListResponse};

#[derive(Debug, Clone)]
pub struct KnowledgeBasesApi {
    client: ApiClient,
}

impl KnowledgeBasesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<KnowledgeBase>> {
        self.client.list("/knowledge-bases", query, cancel).await
    }

    pub async fn get(&self, id: i64) -> AppResult<KnowledgeBase> {
        self.client.get(&format!("/knowledge-bases/{id}")).await
    }

    pub async fn create(&self, request: &CreateKnowledgeBaseRequest) -> AppResult<KnowledgeBase> {
        self.client.post("/knowledge-bases", request).await
    }

    pub async fn update(&self, id: i64, request: &UpdateKnowledgeBaseRequest) -> AppResult<KnowledgeBase> {
        self.client.put(&format!("/knowledge-bases/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/knowledge-bases/{id}")).await?;
        Ok(())
    }

    pub async fn documents(
        &self,
        id: i64,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<KnowledgeBaseDocument>> {
        self.client
            .list(&format!("/knowledge-bases/{id}/documents"), query, cancel)
            .await
    }

    pub async fn upload_document(
        &self,
        id: i64,
        request: &UploadDocumentRequest,
    ) -> AppResult<KnowledgeBaseDocument> {
        self.client
            .post(&format!("/knowledge-bases/{id}/documents"), request)
            .await
    }

    pub async fn delete_document(&self, id: i64, doc_id: i64) -> AppResult<()> {
        self.client
            .delete(&format!("/knowledge-bases/{id}/documents/{doc_id}"))
            .await?;
        Ok(())
    }
}

//! List sources for the knowledge base and AI model screens. They have no
//! screen-specific behaviour beyond fetching.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::api::{AiModelsApi, KnowledgeBasesApi};
use crate::error::AppResult;
use crate::list::{AiModelFilters, KnowledgeBaseFilters, ListSource};
use crate::models::ai_model::AiModelConfig;
use crate::models::knowledge_base::KnowledgeBase;
use crate::models::pagination::{ListQuery, ListResponse};

pub struct KnowledgeBasesSource {
    api: KnowledgeBasesApi,
}

impl KnowledgeBasesSource {
    pub fn new(api: KnowledgeBasesApi) -> Self {
        Self { api }
    }
}

impl ListSource for KnowledgeBasesSource {
    type Item = KnowledgeBase;
    type Filters = KnowledgeBaseFilters;
    const NAME: &'static str = "KnowledgeBases";

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<KnowledgeBase>>> + Send {
        async move { self.api.list(&query, &cancel).await }
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to load knowledge bases"
    }
}

pub struct AiModelsSource {
    api: AiModelsApi,
}

impl AiModelsSource {
    pub fn new(api: AiModelsApi) -> Self {
        Self { api }
    }
}

impl ListSource for AiModelsSource {
    type Item = AiModelConfig;
    type Filters = AiModelFilters;
    const NAME: &'static str = "AiModels";

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<AiModelConfig>>> + Send {
        async move { self.api.list(&query, &cancel).await }
    }

    fn load_error_message(&self) -> &'static str {
        "Failed to load models"
    }
}

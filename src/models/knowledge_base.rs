use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::jsonb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub embedding_model: String,
    #[serde(default)]
    pub chunk_size: u32,
    #[serde(default)]
    pub chunk_overlap: u32,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "jsonb::object")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub documents_count: u64,
    #[serde(default)]
    pub total_chunks: Option<u64>,
    #[serde(default)]
    pub processed_chunks: Option<u64>,
    #[serde(default)]
    pub last_document_upload: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    pub description: Option<String>,
    pub embedding_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<u32>,
    pub api_key: Option<String>,
    pub provider: String,
    pub proxy_url: Option<String>,
    /// Sent as a JSON-encoded string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateKnowledgeBaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBaseForm {
    pub name: String,
    pub description: String,
    pub embedding_model: String,
    pub chunk_size: Option<u32>,
    pub chunk_overlap: Option<u32>,
    pub api_key: String,
    pub provider: String,
    pub proxy_url: String,
    /// Raw JSON typed into the metadata editor.
    pub metadata_json: String,
    pub is_active: Option<bool>,
}

fn blank_to_none(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl KnowledgeBaseForm {
    /// Metadata re-encoded compactly; `None` when the editor is empty. Callers
    /// run validation first, so unparsable text is passed through untouched.
    fn metadata_string(&self) -> Option<String> {
        let raw = self.metadata_json.trim();
        if raw.is_empty() {
            return None;
        }
        Some(
            serde_json::from_str::<Value>(raw)
                .map(|v| v.to_string())
                .unwrap_or_else(|_| raw.to_string()),
        )
    }

    pub fn to_create_request(&self) -> CreateKnowledgeBaseRequest {
        CreateKnowledgeBaseRequest {
            name: self.name.trim().to_string(),
            description: blank_to_none(&self.description),
            embedding_model: self.embedding_model.clone(),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            api_key: blank_to_none(&self.api_key),
            provider: self.provider.clone(),
            proxy_url: blank_to_none(&self.proxy_url),
            metadata: self.metadata_string(),
        }
    }

    pub fn to_update_request(&self) -> UpdateKnowledgeBaseRequest {
        UpdateKnowledgeBaseRequest {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            embedding_model: Some(self.embedding_model.clone()),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            api_key: blank_to_none(&self.api_key),
            provider: Some(self.provider.clone()),
            proxy_url: blank_to_none(&self.proxy_url),
            metadata: self.metadata_string(),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processed,
    Processing,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseDocument {
    pub id: i64,
    pub knowledge_base_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, deserialize_with = "jsonb::object")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub chunk_index: u32,
    #[serde(default)]
    pub parent_doc_id: Option<i64>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub chunks_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDocumentRequest {
    pub title: String,
    pub content: String,
    pub file_type: String,
    pub file_size: u64,
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl UploadDocumentRequest {
    pub fn new(title: &str, content: &str, file_type: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            file_type: file_type.to_string(),
            file_size: content.len() as u64,
            file_path: None,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: &Map<String, Value>) -> Self {
        self.metadata = Some(Value::Object(metadata.clone()).to_string());
        self
    }
}

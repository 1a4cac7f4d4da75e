pub mod agents;
pub mod ai_models;
pub mod client;
pub mod knowledge_bases;
pub mod mcp_tools;

pub use agents::AgentsApi;
pub use ai_models::AiModelsApi;
pub use client::ApiClient;
pub use knowledge_bases::KnowledgeBasesApi;
pub use mcp_tools::McpToolsApi;

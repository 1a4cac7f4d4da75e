//! Client-side form checks, run before anything is sent to the backend.

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::agent::AgentForm;
use crate::models::ai_model::AiModelForm;
use crate::models::knowledge_base::KnowledgeBaseForm;
use crate::models::mcp_tool::{ConfigMode, McpToolForm};

fn required(value: &str, message: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

pub fn validate_tool_form(form: &McpToolForm) -> AppResult<()> {
    required(&form.name, "Tool name is required")?;
    required(&form.description, "Tool description is required")?;
    required(&form.mcp_name, "MCP identifier is required")?;
    if form.permissions.is_empty() {
        return Err(AppError::Validation(
            "Select at least one permission".into(),
        ));
    }
    match form.config_mode {
        ConfigMode::Npx => {
            let raw = form.npx_config.trim();
            if !raw.is_empty() {
                match serde_json::from_str::<Value>(raw) {
                    Ok(Value::Object(_)) => {}
                    Ok(_) => {
                        return Err(AppError::Validation(
                            "Configuration must be a JSON object".into(),
                        ))
                    }
                    Err(e) => {
                        return Err(AppError::Validation(format!(
                            "Configuration is not valid JSON: {e}"
                        )))
                    }
                }
            }
        }
        ConfigMode::Url => required(&form.base_url, "Base URL is required")?,
    }
    Ok(())
}

pub fn validate_agent_form(form: &AgentForm) -> AppResult<()> {
    required(&form.name, "Agent name is required")?;
    if !(0.0..=2.0).contains(&form.temperature) {
        return Err(AppError::Validation(
            "Temperature must be between 0 and 2".into(),
        ));
    }
    Ok(())
}

pub fn validate_knowledge_base_form(form: &KnowledgeBaseForm) -> AppResult<()> {
    required(&form.name, "Knowledge base name is required")?;
    required(&form.embedding_model, "Embedding model is required")?;
    required(&form.provider, "Provider is required")?;
    if let (Some(size), Some(overlap)) = (form.chunk_size, form.chunk_overlap) {
        if overlap >= size {
            return Err(AppError::Validation(
                "Chunk overlap must be smaller than chunk size".into(),
            ));
        }
    }
    let raw = form.metadata_json.trim();
    if !raw.is_empty() && serde_json::from_str::<Value>(raw).is_err() {
        return Err(AppError::Validation("Metadata is not valid JSON".into()));
    }
    Ok(())
}

pub fn validate_ai_model_form(form: &AiModelForm) -> AppResult<()> {
    required(&form.name, "Model name is required")?;
    required(&form.provider, "Provider is required")?;
    required(&form.model_name, "Model identifier is required")?;
    if form.max_tokens == 0 {
        return Err(AppError::Validation(
            "Max tokens must be greater than 0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_form() -> McpToolForm {
        McpToolForm {
            name: "Search".into(),
            mcp_name: "search".into(),
            description: "Web search".into(),
            base_url: "https://mcp.example.com".into(),
            ..McpToolForm::default()
        }
    }

    #[test]
    fn test_valid_tool_form_passes() {
        assert!(validate_tool_form(&tool_form()).is_ok());
    }

    #[test]
    fn test_tool_form_requires_a_permission() {
        let form = McpToolForm {
            permissions: vec![],
            ..tool_form()
        };
        let err = validate_tool_form(&form).unwrap_err();
        assert_eq!(err.user_message("ignored"), "Select at least one permission");
    }

    #[test]
    fn test_tool_form_rejects_malformed_npx_json() {
        let form = McpToolForm {
            config_mode: ConfigMode::Npx,
            npx_config: "{\"command\": \"npx\",".into(),
            ..tool_form()
        };
        assert!(matches!(validate_tool_form(&form), Err(AppError::Validation(_))));

        let form = McpToolForm {
            config_mode: ConfigMode::Npx,
            npx_config: "[1, 2]".into(),
            ..tool_form()
        };
        assert!(validate_tool_form(&form).is_err());
    }

    #[test]
    fn test_tool_form_requires_name() {
        let form = McpToolForm {
            name: "  ".into(),
            ..tool_form()
        };
        assert!(validate_tool_form(&form).is_err());
    }

    #[test]
    fn test_agent_temperature_range() {
        let mut form = AgentForm {
            name: "Helper".into(),
            temperature: 0.7,
            ..AgentForm::default()
        };
        assert!(validate_agent_form(&form).is_ok());
        form.temperature = 2.5;
        assert!(validate_agent_form(&form).is_err());
    }

    #[test]
    fn test_knowledge_base_chunk_overlap() {
        let form = KnowledgeBaseForm {
            name: "Docs".into(),
            embedding_model: "text-embedding-3-small".into(),
            provider: "openai".into(),
            chunk_size: Some(500),
            chunk_overlap: Some(500),
            ..KnowledgeBaseForm::default()
        };
        assert!(validate_knowledge_base_form(&form).is_err());
    }

    #[test]
    fn test_ai_model_max_tokens() {
        let mut form = AiModelForm::for_provider("openai");
        form.name = "GPT".into();
        form.model_name = "gpt-4o".into();
        assert!(validate_ai_model_form(&form).is_ok());
        form.max_tokens = 0;
        assert!(validate_ai_model_form(&form).is_err());
    }
}

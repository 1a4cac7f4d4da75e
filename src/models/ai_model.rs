use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiModelConfig {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_default: bool,
    /// Reasoning ("thinking") model.
    #[serde(default)]
    pub is_thinking: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub agent_count: Option<u64>,
    #[serde(default)]
    pub conversation_count: Option<u64>,
    #[serde(default)]
    pub token_usage: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAiModelRequest {
    pub name: String,
    pub provider: String,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub is_enabled: bool,
    pub is_default: bool,
    pub is_thinking: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAiModelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_thinking: Option<bool>,
}

/// Model editor form. New forms start from the provider's catalog defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AiModelForm {
    pub name: String,
    pub provider: String,
    pub model_name: String,
    pub api_key: String,
    pub base_url: String,
    pub proxy_url: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub is_enabled: bool,
    pub is_default: bool,
    pub is_thinking: bool,
}

impl AiModelForm {
    pub fn for_provider(provider: &str) -> Self {
        let defaults = crate::catalog::provider_defaults(provider);
        Self {
            name: String::new(),
            provider: provider.to_string(),
            model_name: String::new(),
            api_key: String::new(),
            base_url: defaults.base_url.to_string(),
            proxy_url: String::new(),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            is_enabled: true,
            is_default: false,
            is_thinking: false,
        }
    }

    pub fn to_create_request(&self) -> CreateAiModelRequest {
        let opt = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        CreateAiModelRequest {
            name: self.name.trim().to_string(),
            provider: self.provider.clone(),
            model_name: self.model_name.trim().to_string(),
            api_key: opt(&self.api_key),
            base_url: opt(&self.base_url),
            proxy_url: opt(&self.proxy_url),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            is_enabled: self.is_enabled,
            is_default: self.is_default,
            is_thinking: self.is_thinking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_starts_from_provider_defaults() {
        let form = AiModelForm::for_provider("anthropic");
        assert_eq!(form.base_url, "https://api.anthropic.com");
        assert_eq!(form.max_tokens, 200_000);

        let unknown = AiModelForm::for_provider("acme");
        assert_eq!(unknown.base_url, "");
        assert_eq!(unknown.max_tokens, 4000);
    }

    #[test]
    fn test_create_request_omits_blank_urls() {
        let mut form = AiModelForm::for_provider("local");
        form.name = "Local llama".into();
        form.model_name = "llama3.2".into();
        form.base_url = " ".into();
        let body = serde_json::to_value(form.to_create_request()).unwrap();
        assert!(body.get("base_url").is_none());
        assert!(body.get("api_key").is_none());
        assert_eq!(body["model_name"], "llama3.2");
    }
}

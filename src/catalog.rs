//! Static option lists for the model, knowledge base and tool editors.

use crate::models::mcp_tool::ToolCategory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderOption {
    pub value: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
    pub models: &'static [&'static str],
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub max_tokens: u32,
    pub temperature: f64,
}

pub const PROVIDERS: &[ProviderOption] = &[
    ProviderOption {
        value: "openai",
        name: "OpenAI",
        base_url: "https://api.openai.com/v1",
        models: &[
            "gpt-5",
            "gpt-5-mini",
            "gpt-4.1",
            "gpt-4.1-mini",
            "gpt-4.1-nano",
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-3.5-turbo",
        ],
        description: "GPT-5 family and derived models",
        icon: "🤖",
        color: "bg-green-100 text-green-800",
        max_tokens: 128_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "anthropic",
        name: "Anthropic",
        base_url: "https://api.anthropic.com",
        models: &[
            "claude-opus-4.1",
            "claude-sonnet-4.5",
            "claude-haiku-4.5",
            "claude-3.7-sonnet",
            "claude-3.5-sonnet",
            "claude-3.5-haiku",
        ],
        description: "Claude 4 family",
        icon: "🧠",
        color: "bg-orange-100 text-orange-800",
        max_tokens: 200_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "google",
        name: "Google",
        base_url: "https://generativelanguage.googleapis.com/v1beta",
        models: &[
            "gemini-2.5-pro",
            "gemini-2.5-flash",
            "gemini-2.5-flash-lite",
            "gemini-2.5-flash-image",
        ],
        description: "Gemini 2.5 family, long context and multimodal",
        icon: "🔍",
        color: "bg-blue-100 text-blue-800",
        max_tokens: 1_048_576,
        temperature: 0.7,
    },
    ProviderOption {
        value: "xai",
        name: "xAI (Grok)",
        base_url: "https://api.x.ai/v1",
        models: &["grok-4", "grok-3", "grok-3-mini", "grok-beta"],
        description: "Grok family with live information access",
        icon: "🚀",
        color: "bg-purple-100 text-purple-800",
        max_tokens: 256_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "meta",
        name: "Meta (Llama)",
        base_url: "https://api.llama-api.com/v1",
        models: &[
            "llama-4-maverick",
            "llama-4-scout",
            "llama-3.3-70b-instruct",
            "llama-3.2-90b-vision-instruct",
            "llama-3.1-405b-instruct",
            "llama-3.1-70b-instruct",
            "llama-3.1-8b-instruct",
        ],
        description: "Open-weight Llama 4 family",
        icon: "🦙",
        color: "bg-indigo-100 text-indigo-800",
        max_tokens: 128_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "deepseek",
        name: "DeepSeek",
        base_url: "https://api.deepseek.com/v1",
        models: &["deepseek-v3", "deepseek-r1", "deepseek-coder-v2", "deepseek-chat"],
        description: "Reasoning models strong at math and code",
        icon: "🔬",
        color: "bg-cyan-100 text-cyan-800",
        max_tokens: 128_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "alibaba",
        name: "Alibaba (Qwen)",
        base_url: "https://dashscope.aliyuncs.com/api/v1",
        models: &[
            "qwen3-235b",
            "qwen2.5-72b-instruct",
            "qwen2.5-32b-instruct",
            "qwen2.5-14b-instruct",
            "qwen2.5-7b-instruct",
        ],
        description: "Qwen 3 family",
        icon: "🌟",
        color: "bg-yellow-100 text-yellow-800",
        max_tokens: 128_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "cohere",
        name: "Cohere",
        base_url: "https://api.cohere.ai/v1",
        models: &["command-a", "command-r-plus", "command-r", "command-nightly"],
        description: "Enterprise-focused models",
        icon: "💼",
        color: "bg-teal-100 text-teal-800",
        max_tokens: 256_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "azure",
        name: "Azure OpenAI",
        base_url: "https://your-resource.openai.azure.com",
        models: &["gpt-5", "gpt-4o", "gpt-4-turbo", "gpt-4", "gpt-3.5-turbo"],
        description: "OpenAI models hosted on Azure",
        icon: "☁️",
        color: "bg-purple-100 text-purple-800",
        max_tokens: 128_000,
        temperature: 0.7,
    },
    ProviderOption {
        value: "local",
        name: "Local models",
        base_url: "http://localhost:11434",
        models: &[
            "llama3.2",
            "llama3.1",
            "qwen2.5",
            "mistral-nemo",
            "gemma2",
            "codellama",
            "deepseek-coder",
        ],
        description: "Self-hosted open models (Ollama and similar)",
        icon: "🏠",
        color: "bg-gray-100 text-gray-800",
        max_tokens: 32_000,
        temperature: 0.7,
    },
];

pub fn find_provider(value: &str) -> Option<&'static ProviderOption> {
    PROVIDERS.iter().find(|p| p.value == value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderInfo {
    pub name: String,
    pub color: &'static str,
    pub icon: &'static str,
}

pub fn provider_info(provider: &str) -> ProviderInfo {
    match find_provider(provider) {
        Some(p) => ProviderInfo {
            name: p.name.to_string(),
            color: p.color,
            icon: p.icon,
        },
        None => ProviderInfo {
            name: provider.to_string(),
            color: "bg-gray-100 text-gray-800",
            icon: "❓",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderDefaults {
    pub max_tokens: u32,
    pub temperature: f64,
    pub base_url: &'static str,
}

pub fn provider_defaults(provider: &str) -> ProviderDefaults {
    match find_provider(provider) {
        Some(p) => ProviderDefaults {
            max_tokens: p.max_tokens,
            temperature: p.temperature,
            base_url: p.base_url,
        },
        None => ProviderDefaults {
            max_tokens: 4000,
            temperature: 0.7,
            base_url: "",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingModel {
    pub value: &'static str,
    pub label: &'static str,
    pub provider: &'static str,
    pub dimensions: u32,
    pub max_tokens: u32,
    pub deprecated: bool,
}

pub const EMBEDDING_MODELS: &[EmbeddingModel] = &[
    EmbeddingModel {
        value: "text-embedding-3-large",
        label: "OpenAI Embedding v3 Large",
        provider: "openai",
        dimensions: 3072,
        max_tokens: 8191,
        deprecated: false,
    },
    EmbeddingModel {
        value: "text-embedding-3-small",
        label: "OpenAI Embedding v3 Small",
        provider: "openai",
        dimensions: 1536,
        max_tokens: 8191,
        deprecated: false,
    },
    EmbeddingModel {
        value: "text-embedding-ada-002",
        label: "OpenAI Ada-002 (Legacy)",
        provider: "openai",
        dimensions: 1536,
        max_tokens: 8191,
        deprecated: true,
    },
    EmbeddingModel {
        value: "gemini-embedding-001",
        label: "Gemini Embedding v1",
        provider: "google",
        dimensions: 3072,
        max_tokens: 8192,
        deprecated: false,
    },
    EmbeddingModel {
        value: "text-embedding-004",
        label: "Google Text Embedding v4 (Legacy)",
        provider: "google",
        dimensions: 768,
        max_tokens: 3072,
        deprecated: true,
    },
    EmbeddingModel {
        value: "embed-english-v3.0",
        label: "Cohere Embed English v3",
        provider: "cohere",
        dimensions: 1024,
        max_tokens: 512,
        deprecated: false,
    },
    EmbeddingModel {
        value: "embed-multilingual-v3.0",
        label: "Cohere Embed Multilingual v3",
        provider: "cohere",
        dimensions: 1024,
        max_tokens: 512,
        deprecated: false,
    },
    EmbeddingModel {
        value: "text-embedding-3-large-azure",
        label: "Azure OpenAI Embedding v3 Large",
        provider: "azure",
        dimensions: 3072,
        max_tokens: 8191,
        deprecated: false,
    },
    EmbeddingModel {
        value: "bge-large-en-v1.5",
        label: "BGE Large EN v1.5",
        provider: "local",
        dimensions: 1024,
        max_tokens: 512,
        deprecated: false,
    },
    EmbeddingModel {
        value: "bge-m3",
        label: "BGE M3",
        provider: "local",
        dimensions: 1024,
        max_tokens: 8192,
        deprecated: false,
    },
    EmbeddingModel {
        value: "sentence-transformers/all-MiniLM-L6-v2",
        label: "all-MiniLM-L6-v2",
        provider: "local",
        dimensions: 384,
        max_tokens: 256,
        deprecated: false,
    },
];

/// Embedding models offered for `provider`, deprecated ones last.
pub fn embedding_models_for(provider: &str) -> Vec<&'static EmbeddingModel> {
    let mut models: Vec<_> = EMBEDDING_MODELS
        .iter()
        .filter(|m| m.provider == provider)
        .collect();
    models.sort_by_key(|m| m.deprecated);
    models
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolCategoryOption {
    pub value: ToolCategory,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

pub const TOOL_CATEGORIES: &[ToolCategoryOption] = &[
    ToolCategoryOption {
        value: ToolCategory::Dootask,
        label: "DooTask",
        description: "Built-in DooTask tools, visible to everyone",
        color: "bg-blue-100 text-blue-800",
    },
    ToolCategoryOption {
        value: ToolCategory::External,
        label: "External",
        description: "Third-party services and APIs",
        color: "bg-green-100 text-green-800",
    },
];

pub fn tool_category(value: ToolCategory) -> Option<&'static ToolCategoryOption> {
    TOOL_CATEGORIES.iter().find(|c| c.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_info_fallback() {
        let info = provider_info("acme");
        assert_eq!(info.name, "acme");
        assert_eq!(info.icon, "❓");
        assert_eq!(provider_info("google").name, "Google");
    }

    #[test]
    fn test_provider_values_are_unique() {
        let mut values: Vec<_> = PROVIDERS.iter().map(|p| p.value).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), PROVIDERS.len());
    }

    #[test]
    fn test_embedding_models_deprecated_last() {
        let models = embedding_models_for("openai");
        assert_eq!(models.len(), 3);
        assert_eq!(models.last().map(|m| m.value), Some("text-embedding-ada-002"));
    }

    #[test]
    fn test_custom_category_has_no_option() {
        assert!(tool_category(ToolCategory::Custom).is_none());
        assert_eq!(tool_category(ToolCategory::Dootask).map(|c| c.label), Some("DooTask"));
    }
}

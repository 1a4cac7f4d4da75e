use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::jsonb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Dootask,
    External,
    Custom,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Dootask => "dootask",
            ToolCategory::External => "external",
            ToolCategory::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Internal,
    External,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Internal => "internal",
            ToolType::External => "external",
        }
    }
}

/// How a tool's connection is configured in the editor: a remote URL plus
/// API key, or a free-form JSON launch config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    Url,
    Npx,
}

/// Transport recorded in `config_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    StreamableHttp,
    Websocket,
    Sse,
    Stdio,
}

impl TransportKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TransportKind::StreamableHttp),
            1 => Some(TransportKind::Websocket),
            2 => Some(TransportKind::Sse),
            3 => Some(TransportKind::Stdio),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigInfoRecord {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub has_api_key: bool,
    #[serde(default)]
    pub config_data: Map<String, Value>,
}

/// A tool exactly as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ToolCategory,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    #[serde(default, deserialize_with = "jsonb::object")]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub mcp_name: Option<String>,
    #[serde(default)]
    pub config_type: Option<u8>,
    #[serde(default)]
    pub total_calls: Option<u64>,
    #[serde(default)]
    pub today_calls: Option<u64>,
    #[serde(default)]
    pub average_response_time: Option<f64>,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub associated_agents: Option<u64>,
    #[serde(default)]
    pub config_info: Option<ConfigInfoRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolStatistics {
    pub total_calls: u64,
    pub today_calls: u64,
    pub average_response_time: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigInfo {
    pub transport: Option<TransportKind>,
    pub has_api_key: bool,
    pub config_data: Map<String, Value>,
}

/// A tool as the console shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct McpTool {
    pub id: String,
    pub name: String,
    pub mcp_name: String,
    pub description: String,
    pub category: ToolCategory,
    pub tool_type: ToolType,
    pub config: Map<String, Value>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub transport: TransportKind,
    pub config_mode: ConfigMode,
    pub api_key: String,
    pub base_url: String,
    /// Pretty-printed config for the JSON editor; empty in URL mode.
    pub npx_config: String,
    pub config_info: Option<ConfigInfo>,
    pub statistics: Option<ToolStatistics>,
}

impl McpTool {
    /// Numeric backend id, if the console id is one.
    pub fn backend_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

fn config_str(config: &Map<String, Value>, key: &str) -> String {
    config
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl From<McpToolRecord> for McpTool {
    fn from(record: McpToolRecord) -> Self {
        let api_key = config_str(&record.config, "apiKey");
        let base_url = config_str(&record.config, "baseUrl");
        let config_mode = if !api_key.is_empty() && !base_url.is_empty() {
            ConfigMode::Url
        } else {
            ConfigMode::Npx
        };
        let npx_config = match config_mode {
            ConfigMode::Npx => serde_json::to_string_pretty(&Value::Object(record.config.clone()))
                .unwrap_or_default(),
            ConfigMode::Url => String::new(),
        };
        let statistics = record.total_calls.map(|total_calls| ToolStatistics {
            total_calls,
            today_calls: record.today_calls.unwrap_or(0),
            average_response_time: record.average_response_time.unwrap_or(0.0),
            success_rate: record.success_rate.unwrap_or(1.0),
        });

        McpTool {
            id: record.id.to_string(),
            name: record.name,
            mcp_name: record.mcp_name.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            category: record.category,
            tool_type: record.tool_type,
            config: record.config,
            permissions: record.permissions,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
            transport: record
                .config_type
                .and_then(TransportKind::from_code)
                .unwrap_or(TransportKind::StreamableHttp),
            config_mode,
            api_key,
            base_url,
            npx_config,
            config_info: record.config_info.map(|info| ConfigInfo {
                transport: TransportKind::from_code(info.kind),
                has_api_key: info.has_api_key,
                config_data: info.config_data,
            }),
            statistics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolRequest {
    pub name: String,
    pub mcp_name: String,
    pub description: String,
    pub category: ToolCategory,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub config: Map<String, Value>,
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// The tool editor's form state.
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolForm {
    pub name: String,
    pub mcp_name: String,
    pub description: String,
    pub category: ToolCategory,
    pub tool_type: ToolType,
    pub config: Map<String, Value>,
    pub permissions: Vec<String>,
    pub is_active: Option<bool>,
    pub config_mode: ConfigMode,
    pub api_key: String,
    pub base_url: String,
    pub npx_config: String,
}

impl Default for McpToolForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            mcp_name: String::new(),
            description: String::new(),
            category: ToolCategory::External,
            tool_type: ToolType::External,
            config: Map::new(),
            permissions: vec!["read".into()],
            is_active: None,
            config_mode: ConfigMode::Url,
            api_key: String::new(),
            base_url: String::new(),
            npx_config: String::new(),
        }
    }
}

impl McpToolForm {
    pub fn from_tool(tool: &McpTool) -> Self {
        Self {
            name: tool.name.clone(),
            mcp_name: tool.mcp_name.clone(),
            description: tool.description.clone(),
            category: tool.category,
            tool_type: tool.tool_type,
            config: tool.config.clone(),
            permissions: tool.permissions.clone(),
            is_active: Some(tool.is_active),
            config_mode: tool.config_mode,
            api_key: tool.api_key.clone(),
            base_url: tool.base_url.clone(),
            npx_config: tool.npx_config.clone(),
        }
    }

    /// Merge the editor's mode-specific fields into `config`. An unparsable
    /// JSON config keeps the existing config untouched.
    pub fn merged_config(&self) -> Map<String, Value> {
        let mut config = self.config.clone();
        match self.config_mode {
            ConfigMode::Url => {
                if !self.api_key.is_empty() {
                    config.insert("apiKey".into(), Value::String(self.api_key.clone()));
                }
                if !self.base_url.is_empty() {
                    config.insert("baseUrl".into(), Value::String(self.base_url.clone()));
                }
            }
            ConfigMode::Npx => {
                if !self.npx_config.trim().is_empty() {
                    match serde_json::from_str::<Map<String, Value>>(&self.npx_config) {
                        Ok(parsed) => config.extend(parsed),
                        Err(e) => log::error!("Failed to parse tool JSON config: {}", e),
                    }
                }
            }
        }
        config
    }

    pub fn to_request(&self) -> McpToolRequest {
        McpToolRequest {
            name: self.name.trim().to_string(),
            mcp_name: self.mcp_name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            tool_type: self.tool_type,
            config: self.merged_config(),
            permissions: self.permissions.clone(),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpToolStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub dootask_tools: u64,
    #[serde(default)]
    pub external_tools: u64,
    #[serde(default)]
    pub custom_tools: u64,
    #[serde(default)]
    pub internal_tools: u64,
    #[serde(default)]
    pub external_type_tools: u64,
    #[serde(default)]
    pub total_calls: u64,
    #[serde(default)]
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestToolResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub test_result: Option<Map<String, Value>>,
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::ai_model::AiModelConfig;
use crate::models::jsonb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub ai_model_id: Option<i64>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default, deserialize_with = "jsonb::id_list")]
    pub tools: Vec<i64>,
    #[serde(default, deserialize_with = "jsonb::id_list")]
    pub knowledge_bases: Vec<i64>,
    #[serde(default, deserialize_with = "jsonb::object")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub ai_model: Option<AiModelConfig>,
    #[serde(default)]
    pub statistics: Option<AgentStatistics>,
    #[serde(default)]
    pub kb_names: Vec<String>,
    #[serde(default)]
    pub tool_names: Vec<String>,
    /// Chat user id of the agent's bot account, used to open a conversation.
    #[serde(default)]
    pub bot_id: Option<i64>,
}

impl Agent {
    /// Display name of the bound model, `unknown` when none is bound.
    pub fn model_name(&self) -> &str {
        self.ai_model
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or("unknown")
    }

    /// Weekly message count; agents without statistics score zero.
    pub fn popularity(&self) -> u64 {
        self.statistics.as_ref().map(|s| s.week_messages).unwrap_or(0)
    }

    pub fn uses_tool(&self, tool_id: i64) -> bool {
        self.tools.contains(&tool_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStatistics {
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub today_messages: u64,
    #[serde(default)]
    pub week_messages: u64,
    #[serde(default)]
    pub average_response_time: f64,
    #[serde(default)]
    pub success_rate: f64,
}

/// Detail payload: the agent plus usage counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDetail {
    #[serde(flatten)]
    pub agent: Agent,
    #[serde(default)]
    pub conversation_count: u64,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub token_usage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub ai_model_id: Option<i64>,
    pub temperature: f64,
    pub tools: Vec<i64>,
    pub knowledge_bases: Vec<i64>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAgentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_bases: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// The agent editor's form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentForm {
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub ai_model_id: Option<i64>,
    pub temperature: f64,
    pub tools: Vec<i64>,
    pub knowledge_bases: Vec<i64>,
    pub metadata: Map<String, Value>,
    pub is_active: Option<bool>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl AgentForm {
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            description: agent.description.clone().unwrap_or_default(),
            prompt: agent.prompt.clone(),
            ai_model_id: agent.ai_model_id,
            temperature: agent.temperature,
            tools: agent.tools.clone(),
            knowledge_bases: agent.knowledge_bases.clone(),
            metadata: agent.metadata.clone(),
            is_active: Some(agent.is_active),
        }
    }

    pub fn to_create_request(&self) -> CreateAgentRequest {
        CreateAgentRequest {
            name: self.name.trim().to_string(),
            description: non_empty(&self.description),
            prompt: non_empty(&self.prompt),
            ai_model_id: self.ai_model_id.filter(|id| *id > 0),
            temperature: self.temperature,
            tools: self.tools.clone(),
            knowledge_bases: self.knowledge_bases.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn to_update_request(&self) -> UpdateAgentRequest {
        UpdateAgentRequest {
            name: Some(self.name.trim().to_string()),
            description: Some(non_empty(&self.description)),
            prompt: Some(self.prompt.clone()),
            ai_model_id: Some(self.ai_model_id.filter(|id| *id > 0)),
            temperature: Some(self.temperature),
            tools: Some(self.tools.clone()),
            knowledge_bases: Some(self.knowledge_bases.clone()),
            metadata: Some(self.metadata.clone()),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<SettingEntry>,
}

impl SettingsResponse {
    pub fn into_map(self) -> HashMap<String, Value> {
        self.data.into_iter().map(|e| (e.key, e.value)).collect()
    }
}

pub const SETTING_AUTO_ASSIGN_MCP: &str = "autoAssignMCP";

/// Per-user console preferences stored under `/agents/settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    pub auto_assign_mcp: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            auto_assign_mcp: true,
        }
    }
}

impl AgentSettings {
    /// Anything but an explicit `"0"` / `0` / `false` keeps auto-assign on.
    pub fn from_map(map: &HashMap<String, Value>) -> Self {
        let auto_assign_mcp = match map.get(SETTING_AUTO_ASSIGN_MCP) {
            Some(Value::String(s)) => s != "0",
            Some(Value::Number(n)) => n.as_i64() != Some(0),
            Some(Value::Bool(b)) => *b,
            _ => true,
        };
        Self { auto_assign_mcp }
    }

    pub fn to_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            SETTING_AUTO_ASSIGN_MCP.into(),
            Value::String(if self.auto_assign_mcp { "1" } else { "0" }.into()),
        );
        map
    }
}

fn default_temperature() -> f64 {
    0.7
}

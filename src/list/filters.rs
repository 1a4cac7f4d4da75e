//! Per-screen filter records and their wire encoding.
//!
//! Every field is optional; an unset field is left out of the request
//! rather than sent as `null` or an empty string.

use serde_json::{Map, Value};

use crate::models::mcp_tool::{ToolCategory, ToolType};

pub trait ListFilters: Clone + PartialEq + Default + Send + Sync + 'static {
    fn to_wire(&self) -> Map<String, Value>;
}

fn put_search(map: &mut Map<String, Value>, search: &Option<String>) {
    if let Some(s) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        map.insert("search".into(), Value::String(s.to_string()));
    }
}

fn put<T: Into<Value> + Clone>(map: &mut Map<String, Value>, key: &str, value: &Option<T>) {
    if let Some(v) = value {
        map.insert(key.into(), v.clone().into());
    }
}

/// No filters at all.
impl ListFilters for () {
    fn to_wire(&self) -> Map<String, Value> {
        Map::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentFilters {
    pub search: Option<String>,
    pub ai_model_id: Option<i64>,
    pub is_active: Option<bool>,
}

impl ListFilters for AgentFilters {
    fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_search(&mut map, &self.search);
        put(&mut map, "ai_model_id", &self.ai_model_id);
        put(&mut map, "is_active", &self.is_active);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolFilters {
    pub search: Option<String>,
    pub category: Option<ToolCategory>,
    pub tool_type: Option<ToolType>,
    pub is_active: Option<bool>,
}

impl ListFilters for ToolFilters {
    fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_search(&mut map, &self.search);
        if let Some(category) = self.category {
            map.insert("category".into(), Value::String(category.as_str().into()));
        }
        if let Some(tool_type) = self.tool_type {
            map.insert("type".into(), Value::String(tool_type.as_str().into()));
        }
        put(&mut map, "is_active", &self.is_active);
        map
    }
}

/// Creation-time window on the popular agents screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    Week,
    Month,
    Quarter,
}

impl TimeWindow {
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeWindow::All => None,
            TimeWindow::Week => Some(7),
            TimeWindow::Month => Some(30),
            TimeWindow::Quarter => Some(90),
        }
    }

    /// Epoch-millis lower bound relative to `now_millis`.
    pub fn lower_bound(&self, now_millis: i64) -> Option<i64> {
        self.days().map(|days| now_millis - days * 24 * 60 * 60 * 1000)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(TimeWindow::All),
            "week" => Some(TimeWindow::Week),
            "month" => Some(TimeWindow::Month),
            "quarter" => Some(TimeWindow::Quarter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopularFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub time_window: TimeWindow,
}

impl PopularFilters {
    pub fn to_wire_at(&self, now_millis: i64) -> Map<String, Value> {
        let mut map = Map::new();
        put_search(&mut map, &self.search);
        if let Some(category) = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
        {
            map.insert("category".into(), Value::String(category.to_string()));
        }
        if let Some(bound) = self.time_window.lower_bound(now_millis) {
            map.insert("create_at".into(), Value::from(bound));
        }
        map
    }
}

impl ListFilters for PopularFilters {
    fn to_wire(&self) -> Map<String, Value> {
        self.to_wire_at(chrono::Utc::now().timestamp_millis())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBaseFilters {
    pub search: Option<String>,
    pub embedding_model: Option<String>,
    pub is_active: Option<bool>,
}

impl ListFilters for KnowledgeBaseFilters {
    fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_search(&mut map, &self.search);
        put(&mut map, "embedding_model", &self.embedding_model);
        put(&mut map, "is_active", &self.is_active);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiModelFilters {
    pub provider: Option<String>,
    pub is_enabled: Option<bool>,
}

impl ListFilters for AiModelFilters {
    fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put(&mut map, "provider", &self.provider);
        put(&mut map, "is_enabled", &self.is_enabled);
        map
    }
}

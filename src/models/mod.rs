pub mod agent;
pub mod ai_model;
pub mod knowledge_base;
pub mod mcp_tool;
pub mod pagination;

/// Lenient readers for the backend's JSONB columns, which arrive either as
/// native JSON or as a JSON document encoded in a string.
pub(crate) mod jsonb {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn decode<T: DeserializeOwned + Default>(value: Value, field: &str) -> T {
        let value = match value {
            Value::Null => return T::default(),
            Value::String(s) if s.trim().is_empty() => return T::default(),
            Value::String(s) => match serde_json::from_str::<Value>(&s) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Failed to parse JSONB field '{}': {}", field, e);
                    return T::default();
                }
            },
            other => other,
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Unexpected shape for JSONB field '{}': {}", field, e);
            T::default()
        })
    }

    /// Id arrays may hold numbers or numeric strings.
    pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Vec<Value> = decode(Value::deserialize(deserializer)?, "id_list");
        Ok(raw
            .into_iter()
            .filter_map(|v| match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect())
    }

    pub fn object<'de, D>(deserializer: D) -> Result<serde_json::Map<String, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(decode(Value::deserialize(deserializer)?, "object"))
    }
}

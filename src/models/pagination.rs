use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub key: String,
    pub desc: bool,
}

impl SortField {
    pub fn desc(key: &str) -> Self {
        Self {
            key: key.into(),
            desc: true,
        }
    }

    pub fn asc(key: &str) -> Self {
        Self {
            key: key.into(),
            desc: false,
        }
    }
}

pub fn default_sorts() -> Vec<SortField> {
    vec![SortField::desc("created_at")]
}

/// One page request against a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub sorts: Vec<SortField>,
    pub filters: Map<String, Value>,
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sorts: default_sorts(),
            filters: Map::new(),
        }
    }

    pub fn with_filters(mut self, filters: Map<String, Value>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sorts(mut self, sorts: Vec<SortField>) -> Self {
        if !sorts.is_empty() {
            self.sorts = sorts;
        }
        self
    }

    /// Query-string form. `sorts` and `filters` travel JSON-encoded; an empty
    /// filter object is left out entirely.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Ok(sorts) = serde_json::to_string(&self.sorts) {
            pairs.push(("sorts".to_string(), sorts));
        }
        if !self.filters.is_empty() {
            pairs.push(("filters".to_string(), Value::Object(self.filters.clone()).to_string()));
        }
        pairs
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(1, 12)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerPagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListData<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Extra per-endpoint payload next to `items` (tool stats, conversation
    /// statistics).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Default for ListData<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    #[serde(default = "ListData::default")]
    pub data: ListData<T>,
}

impl<T> ListResponse<T> {
    pub fn pagination(&self) -> ServerPagination {
        ServerPagination {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    pub fn map_items<U, F>(self, f: F) -> ListResponse<U>
    where
        F: FnMut(T) -> U,
    {
        ListResponse {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            data: ListData {
                items: self.data.items.into_iter().map(f).collect(),
                extra: self.data.extra,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_omit_empty_filters() {
        let pairs = ListQuery::new(2, 12).to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "12".to_string()),
                ("sorts".to_string(), r#"[{"key":"created_at","desc":true}]"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_encode_filters_as_object() {
        let mut filters = Map::new();
        filters.insert("search".into(), json!("bot"));
        let pairs = ListQuery::new(1, 12).with_filters(filters).to_query_pairs();
        assert_eq!(pairs[3], ("filters".to_string(), r#"{"search":"bot"}"#.to_string()));
    }

    #[test]
    fn test_response_keeps_extra_payload() {
        let body = json!({
            "current_page": 1,
            "page_size": 12,
            "total_items": 1,
            "total_pages": 1,
            "data": {"items": [1], "stats": {"total": 1}}
        });
        let resp: ListResponse<u32> = serde_json::from_value(body).unwrap();
        assert_eq!(resp.data.items, vec![1]);
        assert_eq!(resp.data.extra["stats"]["total"], 1);
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_missing_data_reads_as_empty_page() {
        let body = json!({
            "current_page": 3,
            "page_size": 12,
            "total_items": 0,
            "total_pages": 0
        });
        let resp: ListResponse<Named> = serde_json::from_value(body).unwrap();
        assert!(resp.data.items.is_empty());
        assert!(resp.data.extra.is_empty());
        assert_eq!(resp.current_page, 3);
    }
}

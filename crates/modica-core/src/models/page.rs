//! Paginated list responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key-value filter applied to a list request as query parameters.
pub type Filter = BTreeMap<String, String>;

/// One page of model instances, as produced by the list operation.
///
/// `count`, `next`, `previous`, `results`, and `pagesize` come from the
/// backend. `current`, `filter`, `model_name`, and `model_domain` are stamped
/// onto the payload client-side so follow-up page requests can be rebuilt
/// without the caller re-supplying them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<MD> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<MD>,
    #[serde(default)]
    pub current: Option<u32>,
    #[serde(default)]
    pub pagesize: Option<u32>,
    #[serde(default)]
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_server_payload_deserializes() {
        let page: PaginatedResponse<serde_json::Value> =
            serde_json::from_str(r#"{"count":0,"next":null,"previous":null}"#).unwrap();

        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert_eq!(page.current, None);
        assert_eq!(page.pagesize, None);
        assert_eq!(page.model_name, "");
        assert_eq!(page.model_domain, None);
        assert_eq!(page.filter, None);
    }

    #[test]
    fn test_full_server_payload_deserializes() {
        let body = r#"{
            "count": 12,
            "next": "http://localhost/api/models/tickets/?page=3",
            "previous": "http://localhost/api/models/tickets/?page=1",
            "results": [{"id": 1}, {"id": 2}],
            "current": 2,
            "pagesize": 2
        }"#;
        let page: PaginatedResponse<serde_json::Value> = serde_json::from_str(body).unwrap();

        assert_eq!(page.count, 12);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.current, Some(2));
        assert_eq!(page.pagesize, Some(2));
    }
}

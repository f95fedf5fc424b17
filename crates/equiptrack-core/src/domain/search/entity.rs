//! Search request and response types

use serde::{Deserialize, Serialize};

use crate::domain::equipment::EquipmentDetail;
use crate::error::{Error, Result};

/// Largest page a search may request
pub const MAX_PAGE_LIMIT: i64 = 100;
/// Default page size for basic and advanced search
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
/// Longest accepted query, in characters
pub const MAX_QUERY_CHARS: usize = 100;
/// Default and maximum page size for quick search
pub const DEFAULT_QUICK_LIMIT: i64 = 10;
pub const MAX_QUICK_LIMIT: i64 = 50;
/// Default and maximum number of suggestions
pub const DEFAULT_SUGGESTION_LIMIT: i64 = 5;
pub const MAX_SUGGESTION_LIMIT: i64 = 20;

/// A validated `(limit, offset)` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Validate a window: limit in `1..=100`, offset non-negative
    pub fn new(limit: i64, offset: i64) -> Result<Self> {
        check_limit("limit", limit, MAX_PAGE_LIMIT)?;
        if offset < 0 {
            return Err(Error::InvalidInput(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Reject an integer limit outside `1..=max`
pub fn check_limit(name: &str, value: i64, max: i64) -> Result<()> {
    if !(1..=max).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}

/// Reject a query that is empty or longer than `MAX_QUERY_CHARS`
pub fn check_query(query: &str) -> Result<()> {
    let chars = query.chars().count();
    if chars == 0 || chars > MAX_QUERY_CHARS {
        return Err(Error::InvalidInput(format!(
            "query must be between 1 and {} characters, got {}",
            MAX_QUERY_CHARS, chars
        )));
    }
    Ok(())
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Basic filtered search body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub condition_min: Option<i64>,
    #[serde(default)]
    pub condition_max: Option<i64>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            status: None,
            condition_min: None,
            condition_max: None,
        }
    }
}

/// Field-targeted search body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSearchRequest {
    pub query: String,
    #[serde(default)]
    pub search_fields: Option<Vec<String>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl AdvancedSearchRequest {
    pub fn new(query: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            query: query.into(),
            search_fields: Some(fields.iter().map(|f| f.to_string()).collect()),
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// One page of results plus the total for the same predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub results: Vec<EquipmentDetail>,
    pub total_count: i64,
}

/// Search response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<EquipmentDetail>,
    pub total_count: i64,
    pub query: String,
    pub limit: i64,
    pub offset: i64,
}

impl SearchResponse {
    pub fn from_page(page: SearchPage, query: &str, window: Page) -> Self {
        Self {
            results: page.results,
            total_count: page.total_count,
            query: query.to_string(),
            limit: window.limit(),
            offset: window.offset(),
        }
    }
}

/// Autocomplete response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub query: String,
    pub suggestions: Vec<String>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert!(Page::new(1, 0).is_ok());
        assert!(Page::new(100, 5000).is_ok());
        assert!(matches!(Page::new(0, 0), Err(Error::InvalidInput(_))));
        assert!(Page::new(101, 0).is_err());
        assert!(Page::new(10, -1).is_err());
    }

    #[test]
    fn test_query_length_counts_chars() {
        assert!(check_query("a").is_ok());
        assert!(check_query(&"é".repeat(100)).is_ok());
        assert!(check_query(&"é".repeat(101)).is_err());
        assert!(check_query("").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: SearchRequest = serde_json::from_str(r#"{"query": "dell"}"#).unwrap();
        assert_eq!(request, SearchRequest::new("dell"));

        let advanced: AdvancedSearchRequest =
            serde_json::from_str(r#"{"query": "dell", "offset": 10}"#).unwrap();
        assert_eq!(advanced.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(advanced.offset, 10);
        assert!(advanced.search_fields.is_none());
    }
}
